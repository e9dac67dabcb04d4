use super::ToolRunner;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

/// Metadata for one top-level disk device from lsblk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDev {
    pub name:       String,
    pub rotational: bool,
    pub transport:  Option<String>,
}

impl BlockDev {
    pub fn path(&self) -> String {
        format!("/dev/{}", self.name)
    }

    pub fn is_nvme(&self) -> bool {
        self.transport.as_deref() == Some("nvme") || self.name.starts_with("nvme")
    }
}

/// Run `lsblk --json --nodeps` and return the whole-disk devices.
pub fn run_lsblk(runner: &dyn ToolRunner, lsblk: &Path) -> Result<Vec<BlockDev>> {
    let out = runner.run(lsblk, &["--json", "--nodeps", "-o", "NAME,TYPE,ROTA,TRAN"])?;
    parse_lsblk(&out)
}

pub fn parse_lsblk(json: &str) -> Result<Vec<BlockDev>> {
    let v: Value = serde_json::from_str(json).context("lsblk returned invalid JSON")?;
    let devices = v["blockdevices"]
        .as_array()
        .cloned()
        .unwrap_or_default();

    let mut disks = Vec::new();
    for dev in &devices {
        let name     = dev["name"].as_str().unwrap_or("").to_string();
        let dev_type = dev["type"].as_str().unwrap_or("");
        if name.is_empty() { continue; }
        if dev_type != "disk" { continue; }

        let rotational = flag(&dev["rota"]);
        let transport  = str_opt(&dev["tran"]);

        disks.push(BlockDev { name, rotational, transport });
    }
    Ok(disks)
}

/// Solid-state disks not matched by any `exclude` pattern.
/// Patterns ending in `*` match by prefix, anything else must match exactly.
pub fn non_rotational<'a>(disks: &'a [BlockDev], exclude: &[String]) -> Vec<&'a BlockDev> {
    disks.iter()
        .filter(|d| !d.rotational)
        .filter(|d| !exclude.iter().any(|pat| {
            if let Some(p) = pat.strip_suffix('*') { d.name.starts_with(p) }
            else { pat == &d.name }
        }))
        .collect()
}

/// Older util-linux prints ROTA as "0"/"1" strings, newer as booleans.
fn flag(v: &Value) -> bool {
    match v {
        Value::Bool(b)   => *b,
        Value::String(s) => s.trim() == "1",
        Value::Number(n) => n.as_u64() == Some(1),
        _                => false,
    }
}

fn str_opt(v: &Value) -> Option<String> {
    v.as_str()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = r#"{
       "blockdevices": [
          {"name":"sda", "type":"disk", "rota":true, "tran":"sata"},
          {"name":"sdb", "type":"disk", "rota":false, "tran":"sata"},
          {"name":"sr0", "type":"rom", "rota":true, "tran":"sata"},
          {"name":"zram0", "type":"disk", "rota":false, "tran":null},
          {"name":"nvme0n1", "type":"disk", "rota":false, "tran":"nvme"}
       ]
    }"#;

    const LEGACY: &str = r#"{
       "blockdevices": [
          {"name": "sda", "type": "disk", "rota": "0", "tran": "sata"},
          {"name": "sdb", "type": "disk", "rota": "1", "tran": "sas"}
       ]
    }"#;

    fn excludes() -> Vec<String> {
        vec!["loop*".into(), "zram*".into()]
    }

    #[test]
    fn keeps_only_disks() {
        let disks = parse_lsblk(MIXED).unwrap();
        let names: Vec<&str> = disks.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["sda", "sdb", "zram0", "nvme0n1"]);
    }

    #[test]
    fn filters_rotational_and_excluded() {
        let disks = parse_lsblk(MIXED).unwrap();
        let ssd: Vec<String> = non_rotational(&disks, &excludes()).iter().map(|d| d.path()).collect();
        assert_eq!(ssd, ["/dev/sdb", "/dev/nvme0n1"]);
    }

    #[test]
    fn legacy_string_flags() {
        let disks = parse_lsblk(LEGACY).unwrap();
        assert!(!disks[0].rotational);
        assert!(disks[1].rotational);
    }

    #[test]
    fn nvme_detection() {
        let disks = parse_lsblk(MIXED).unwrap();
        assert!(!disks[1].is_nvme());
        assert!(disks[3].is_nvme());
    }

    #[test]
    fn empty_and_invalid_output() {
        assert!(parse_lsblk(r#"{"blockdevices": []}"#).unwrap().is_empty());
        assert!(parse_lsblk("lsblk: unknown column").is_err());
    }
}
