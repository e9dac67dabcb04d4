use super::ToolRunner;
use anyhow::Result;
use regex::Regex;
use std::path::Path;

/// Run `tw_cli show` and return the first controller id (`c0`, `c2`, ...).
pub fn first_controller(runner: &dyn ToolRunner, tw_cli: &Path) -> Result<Option<String>> {
    let out = runner.run(tw_cli, &["show"])?;
    Ok(parse_first_controller(&out))
}

/// Port numbers of drives on `controller` whose line matches `brand`.
pub fn brand_ports(runner: &dyn ToolRunner, tw_cli: &Path, controller: &str, brand: &Regex) -> Result<Vec<String>> {
    let target = format!("/{}", controller);
    let out = runner.run(tw_cli, &[&target, "show"])?;
    Ok(parse_brand_ports(&out, brand))
}

pub fn parse_first_controller(text: &str) -> Option<String> {
    text.lines()
        .filter_map(|l| l.split_whitespace().next())
        .find(|t| is_indexed(t, "c"))
        .map(str::to_string)
}

/// Port rows read `p0    OK    u0   111.79 GB SATA  0   -   INTEL SSDSC2BB120G4`.
/// The returned id is the bare port number, which is what smartctl's
/// `-d 3ware,N` expects.
pub fn parse_brand_ports(text: &str, brand: &Regex) -> Vec<String> {
    text.lines()
        .filter(|l| brand.is_match(l))
        .filter_map(|l| l.split_whitespace().next())
        .filter_map(|t| {
            let t = t.strip_prefix('v').unwrap_or(t);
            if is_indexed(t, "p") { Some(t[1..].to_string()) } else { None }
        })
        .collect()
}

/// Numeric suffix of a controller device such as `c2` -> `2`.
pub fn controller_number(controller: &str) -> &str {
    controller.trim_start_matches(|c: char| !c.is_ascii_digit())
}

fn is_indexed(token: &str, prefix: &str) -> bool {
    token.strip_prefix(prefix)
        .map(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}
