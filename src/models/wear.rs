use serde::{Deserialize, Serialize};

/// Remaining-life thresholds in percent. Lower is worse, so `critical`
/// is expected to sit at or below `warning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub warning:  u32,
    pub critical: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { warning: 10, critical: 5 }
    }
}

/// Health class of one drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Ok,
    Warning,
    Critical,
    /// The wear indicator could not be read.
    Unknown,
}

impl Classification {
    pub fn from_wear(wear: Option<u32>, thr: &Thresholds) -> Self {
        match wear {
            None                          => Classification::Unknown,
            Some(v) if v < thr.critical   => Classification::Critical,
            Some(v) if v < thr.warning    => Classification::Warning,
            Some(_)                       => Classification::Ok,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Classification::Ok       => "OK",
            Classification::Warning  => "WARNING",
            Classification::Critical => "CRITICAL",
            Classification::Unknown  => "UNKNOWN",
        }
    }
}

/// What was read for one drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveMetric {
    pub drive_id:         String,
    pub controller_index: usize,
    /// Percent of write endurance left.
    pub wear:             Option<u32>,
    /// Degrees Celsius, NVMe only.
    pub temperature:      Option<i32>,
}
