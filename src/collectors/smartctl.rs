use super::ToolRunner;
use anyhow::Result;
use std::path::Path;

/// Media Wearout Indicator (Intel and most enterprise SATA SSDs).
pub const ATTR_MEDIA_WEAROUT: &str = "233";
/// Wear Leveling Count (Samsung and others).
pub const ATTR_WEAR_LEVELING: &str = "177";

/// Run `smartctl -A` against `device` and read the wear indicator.
/// `device_type` is the `-d` value; `None` lets smartctl auto-detect.
pub fn wear_value(
    runner:      &dyn ToolRunner,
    smartctl:    &Path,
    device:      &str,
    device_type: Option<&str>,
) -> Result<Option<u32>> {
    let dtype = device_type.unwrap_or("auto");
    let out = runner.run(smartctl, &["-A", "-d", dtype, device])?;
    Ok(parse_wear(&out))
}

/// Normalized VALUE of the first attribute row for 233 or 177, e.g.
/// `233 Media_Wearout_Indicator 0x0032 090 090 000 Old_age Always - 0` -> 90.
pub fn parse_wear(text: &str) -> Option<u32> {
    text.lines()
        .map(|l| l.split_whitespace().collect::<Vec<_>>())
        .find(|f| f.len() > 3 && (f[0] == ATTR_MEDIA_WEAROUT || f[0] == ATTR_WEAR_LEVELING))
        .and_then(|f| f[3].parse::<u32>().ok())
}
