use super::ToolRunner;
use anyhow::{bail, Result};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static CELSIUS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*°?C").expect("Invalid celsius regex")
});

/// Wear and temperature of one NVMe namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NvmeReading {
    pub wear:        Option<u32>,
    pub temperature: Option<i32>,
}

/// Prefer the vendor `wear_leveling` field from the additional smart log.
/// Drives without that log fall back to `100 - percentage_used` from the
/// standard smart log, which also carries the temperature. Fails only when
/// neither log could be read.
pub fn read(runner: &dyn ToolRunner, nvme: &Path, device: &str) -> Result<NvmeReading> {
    let detailed = runner.run(nvme, &["intel", "smart-log-add", device])
        .map_err(|e| debug!("{}: additional smart log unavailable: {:#}", device, e))
        .ok();
    let log = runner.run(nvme, &["smart-log", device])
        .map_err(|e| debug!("{}: smart log unavailable: {:#}", device, e))
        .ok();

    if detailed.is_none() && log.is_none() {
        bail!("{}: no smart log could be read", device);
    }

    let wear = detailed.as_deref().and_then(parse_wear_leveling).or_else(|| {
        debug!("{}: falling back to percentage_used", device);
        log.as_deref()
            .and_then(parse_percentage_used)
            .map(|used| 100u32.saturating_sub(used))
    });

    Ok(NvmeReading { wear, temperature: log.as_deref().and_then(parse_temperature) })
}

/// `wear_leveling                   : 95%       min: 136, max: 175, avg: 156`
pub fn parse_wear_leveling(text: &str) -> Option<u32> {
    field(text, "wear_leveling").and_then(leading_number)
}

/// `percentage_used                         : 3%`
pub fn parse_percentage_used(text: &str) -> Option<u32> {
    field(text, "percentage_used").and_then(leading_number)
}

/// Celsius from any of `35 C`, `35 °C (308 K)` or `308 K (35°C)`.
/// Zero and negative readings are treated as absent.
pub fn parse_temperature(text: &str) -> Option<i32> {
    let value = field(text, "temperature")?;
    let celsius: i32 = CELSIUS.captures(value)?.get(1)?.as_str().parse().ok()?;
    (celsius > 0).then_some(celsius)
}

/// Value part of the first `key : value` line whose key starts with `key`.
fn field<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    text.lines()
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.trim().starts_with(key))
        .map(|(_, v)| v.trim())
}

fn leading_number(value: &str) -> Option<u32> {
    let digits: String = value.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
