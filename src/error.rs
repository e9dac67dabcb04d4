use std::path::PathBuf;
use thiserror::Error;

/// Exit code for setup, tooling and detection failures.
pub const EXIT_SETUP_UNKNOWN: i32 = 4;

/// Failures of the check pipeline.
///
/// Everything except `MetricUnavailable` is fatal: the run stops and reports
/// `UNKNOWN: <message>` with exit code 4.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("{tool} not found or not executable at {}", .path.display())]
    MissingTool { tool: &'static str, path: PathBuf },

    #[error("unknown controller: {0}")]
    UnknownController(String),

    #[error("no {0} controller found, check that the controller tool version matches the hardware")]
    NoController(&'static str),

    #[error("no wear indicator reported for {0}")]
    MetricUnavailable(String),

    #[error("critical threshold ({critical}) must not exceed warning threshold ({warning})")]
    InvalidThresholds { warning: u32, critical: u32 },

    #[error("configuration error: {0}")]
    Config(String),
}

impl CheckError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CheckError::MetricUnavailable(_) => 3,
            _ => EXIT_SETUP_UNKNOWN,
        }
    }

    /// The single line printed for a fatal failure.
    pub fn status_line(&self) -> String {
        format!("UNKNOWN: {}", self)
    }
}
