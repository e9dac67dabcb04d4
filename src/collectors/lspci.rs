use super::ToolRunner;
use crate::models::controller::ControllerFamily;
use anyhow::Result;
use std::path::Path;

/// The first RAID-class PCI device line, if any.
pub fn raid_controller_line(runner: &dyn ToolRunner, lspci: &Path) -> Result<Option<String>> {
    let out = runner.run(lspci, &[])?;
    Ok(first_raid_line(&out).map(str::to_string))
}

pub fn first_raid_line(text: &str) -> Option<&str> {
    text.lines().find(|l| l.contains("RAID"))
}

/// Map a PCI description to the controller family that can manage it.
pub fn vendor_family(line: &str) -> Option<ControllerFamily> {
    let lower = line.to_lowercase();
    if lower.contains("3ware") {
        Some(ControllerFamily::ThreeWare)
    } else if ["lsi", "megaraid", "avago", "broadcom"].iter().any(|v| lower.contains(v)) {
        Some(ControllerFamily::Lsi)
    } else {
        None
    }
}
