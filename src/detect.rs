use crate::collectors::{lspci, ToolRunner};
use crate::error::CheckError;
use crate::models::controller::ControllerFamily;
use log::{debug, warn};
use std::path::Path;

/// Decide which controller family the drives sit behind.
///
/// An explicit `--card` wins. Otherwise any local non-rotational disk means
/// the drives are directly attached; failing that, the first RAID-class PCI
/// device names the vendor.
pub fn detect(
    card:          Option<&str>,
    has_local_ssd: bool,
    runner:        &dyn ToolRunner,
    lspci_path:    &Path,
) -> Result<ControllerFamily, CheckError> {
    if let Some(card) = card {
        return from_override(card);
    }

    if has_local_ssd {
        debug!("non-rotational block device present, using auto");
        return Ok(ControllerFamily::Auto);
    }

    let line = match lspci::raid_controller_line(runner, lspci_path) {
        Ok(l)  => l,
        Err(e) => {
            warn!("lspci failed: {:#}", e);
            None
        }
    };
    let line = line.ok_or_else(|| CheckError::UnknownController("no SSD or RAID controller found".into()))?;
    debug!("RAID controller: {}", line);

    lspci::vendor_family(&line)
        .ok_or_else(|| CheckError::UnknownController(line.trim().to_string()))
}

fn from_override(card: &str) -> Result<ControllerFamily, CheckError> {
    let lower = card.to_lowercase();
    if lower.contains("lsi") {
        Ok(ControllerFamily::Lsi)
    } else if lower.contains("3ware") {
        Ok(ControllerFamily::ThreeWare)
    } else if lower.contains("auto") {
        Ok(ControllerFamily::Auto)
    } else {
        Err(CheckError::UnknownController(card.to_string()))
    }
}
