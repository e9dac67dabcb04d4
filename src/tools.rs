use crate::config::ToolsConfig;
use crate::error::CheckError;
use crate::models::controller::ControllerFamily;
use log::debug;
use nix::unistd::{access, AccessFlags};
use std::path::{Path, PathBuf};

/// Binaries verified to be present for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    /// storcli or tw_cli; `None` for directly attached drives.
    pub controller: Option<PathBuf>,
    pub smartctl:   PathBuf,
    /// Only required when an NVMe device is present.
    pub nvme:       Option<PathBuf>,
    pub lsscsi:     PathBuf,
}

/// Make sure every binary the detected family needs is executable.
/// The first missing one aborts the run.
pub fn check_tools(family: ControllerFamily, nvme_present: bool, tools: &ToolsConfig) -> Result<ToolPaths, CheckError> {
    let controller = match family {
        ControllerFamily::Lsi       => Some(require("storcli", &tools.storcli)?),
        ControllerFamily::ThreeWare => Some(require("tw_cli", &tools.tw_cli)?),
        ControllerFamily::Auto      => None,
    };
    let nvme = if nvme_present { Some(require("nvme", &tools.nvme)?) } else { None };
    let smartctl = require("smartctl", &tools.smartctl)?;

    Ok(ToolPaths { controller, smartctl, nvme, lsscsi: tools.lsscsi.clone() })
}

fn require(tool: &'static str, path: &Path) -> Result<PathBuf, CheckError> {
    if path.is_file() && access(path, AccessFlags::X_OK).is_ok() {
        debug!("{} found at {}", tool, path.display());
        Ok(path.to_path_buf())
    } else {
        Err(CheckError::MissingTool { tool, path: path.to_path_buf() })
    }
}
