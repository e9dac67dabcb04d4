use super::ToolRunner;
use anyhow::Result;
use std::path::Path;

const RAID_VENDORS: [&str; 5] = ["lsi", "avago", "dell", "broadcom", "megaraid"];

/// Run `lsscsi` and resolve the block device behind a controller.
pub fn backing_device(runner: &dyn ToolRunner, lsscsi: &Path, model: &str) -> Result<Option<String>> {
    let out = runner.run(lsscsi, &[])?;
    Ok(find_device(&out, model))
}

/// Prefer the disk whose line names the controller model; otherwise the
/// first disk presented by a known RAID vendor.
///
/// Lines look like `[0:2:0:0]    disk    DELL     PERC H730P Mini  4.30  /dev/sda`.
pub fn find_device(text: &str, model: &str) -> Option<String> {
    let disks: Vec<&str> = text.lines()
        .filter(|l| l.split_whitespace().nth(1) == Some("disk"))
        .collect();

    let keyed = if model.trim().is_empty() {
        None
    } else {
        disks.iter().find(|l| l.contains(model.trim()))
    };

    keyed
        .or_else(|| disks.iter().find(|l| {
            let lower = l.to_lowercase();
            RAID_VENDORS.iter().any(|v| lower.contains(v))
        }))
        .and_then(|l| l.split_whitespace().last())
        .filter(|dev| dev.starts_with("/dev/"))
        .map(str::to_string)
}
