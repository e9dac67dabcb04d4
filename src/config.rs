use crate::error::CheckError;
use crate::models::wear::Thresholds;
use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub thresholds: Thresholds,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub devices: DevicesConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Report OK instead of UNKNOWN when the host has no SSDs at all.
    #[serde(default)]
    pub accept_no_ssd: bool,
}

/// Paths of the external diagnostic tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub storcli:     PathBuf,
    pub tw_cli:      PathBuf,
    pub smartctl:    PathBuf,
    pub nvme:        PathBuf,
    pub lsblk:       PathBuf,
    pub lspci:       PathBuf,
    pub lsscsi:      PathBuf,
    /// Upper bound on any single tool invocation.
    pub timeout_sec: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DevicesConfig {
    /// Glob-style patterns of block devices never treated as SSDs (e.g. "zram*")
    pub exclude: Vec<String>,
    /// Regex a 3ware drive line must match to count as an SSD.
    pub brand: String,
    /// 3ware character devices are `<prefix><controller number>`.
    pub threeware_device_prefix: String,
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            storcli:     "/opt/MegaRAID/storcli/storcli64".into(),
            tw_cli:      "/usr/sbin/tw_cli".into(),
            smartctl:    "/usr/sbin/smartctl".into(),
            nvme:        "/usr/sbin/nvme".into(),
            lsblk:       "/usr/bin/lsblk".into(),
            lspci:       "/usr/bin/lspci".into(),
            lsscsi:      "/usr/bin/lsscsi".into(),
            timeout_sec: 30,
        }
    }
}

impl Default for DevicesConfig {
    fn default() -> Self {
        Self {
            exclude: vec!["loop*".into(), "sr*".into(), "ram*".into(), "zram*".into(), "fd*".into()],
            brand:   "INTEL|Samsung".into(),
            threeware_device_prefix: "/dev/twa".into(),
        }
    }
}

// ── Load ──────────────────────────────────────────────────────────────

impl Config {
    /// Load an explicitly named file (errors are fatal) or the per-user
    /// default (absent means defaults, unreadable is logged and ignored).
    pub fn load(explicit: Option<&Path>) -> Result<Self, CheckError> {
        if let Some(path) = explicit {
            return read_file(path);
        }
        Ok(Config::config_path()
            .map(|p| Config::load_default(&p))
            .unwrap_or_default())
    }

    /// The per-user file: absent means defaults, unreadable is logged and ignored.
    pub fn load_default(path: &Path) -> Self {
        if !path.exists() {
            return Config::default();
        }
        read_file(path).unwrap_or_else(|e| {
            warn!("ignoring {}: {}", path.display(), e);
            Config::default()
        })
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ssdwear").join("ssdwear.toml"))
    }
}

fn read_file(path: &Path) -> Result<Config, CheckError> {
    let text = fs::read_to_string(path)
        .map_err(|e| CheckError::Config(format!("{}: {}", path.display(), e)))?;
    toml::from_str(&text)
        .map_err(|e| CheckError::Config(format!("{}: {}", path.display(), e)))
}

// ── Command-line overrides ────────────────────────────────────────────

/// Values given on the command line; `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub warning:  Option<u32>,
    pub critical: Option<u32>,
    pub card:     Option<String>,
    pub device:   Option<String>,
    pub brand:    Option<String>,
    pub storcli:  Option<PathBuf>,
    pub tw_cli:   Option<PathBuf>,
    pub smartctl: Option<PathBuf>,
    pub nvme:     Option<PathBuf>,
    pub timeout:  Option<u64>,
    pub nossd:    bool,
}

/// Fully resolved, validated settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub thresholds:    Thresholds,
    pub card:          Option<String>,
    pub device_filter: Option<String>,
    pub brand:         Regex,
    pub exclude:       Vec<String>,
    pub threeware_device_prefix: String,
    pub tools:         ToolsConfig,
    pub accept_no_ssd: bool,
}

impl Settings {
    pub fn resolve(mut cfg: Config, o: Overrides) -> Result<Self, CheckError> {
        if let Some(w) = o.warning  { cfg.thresholds.warning = w; }
        if let Some(c) = o.critical { cfg.thresholds.critical = c; }
        if let Some(b) = o.brand    { cfg.devices.brand = b; }
        if let Some(p) = o.storcli  { cfg.tools.storcli = p; }
        if let Some(p) = o.tw_cli   { cfg.tools.tw_cli = p; }
        if let Some(p) = o.smartctl { cfg.tools.smartctl = p; }
        if let Some(p) = o.nvme     { cfg.tools.nvme = p; }
        if let Some(t) = o.timeout  { cfg.tools.timeout_sec = t; }

        let thr = cfg.thresholds;
        if thr.critical > thr.warning {
            return Err(CheckError::InvalidThresholds { warning: thr.warning, critical: thr.critical });
        }

        let brand = Regex::new(&cfg.devices.brand)
            .map_err(|e| CheckError::Config(format!("invalid brand filter: {}", e)))?;

        Ok(Self {
            thresholds:    thr,
            card:          o.card.filter(|c| !c.trim().is_empty()),
            device_filter: o.device.filter(|d| !d.trim().is_empty()),
            brand,
            exclude:       cfg.devices.exclude,
            threeware_device_prefix: cfg.devices.threeware_device_prefix,
            tools:         cfg.tools,
            accept_no_ssd: o.nossd || cfg.general.accept_no_ssd,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.tools.timeout_sec.max(1))
    }

    /// Settings as they would look written back to a config file.
    pub fn to_config(&self) -> Config {
        Config {
            general:    GeneralConfig { accept_no_ssd: self.accept_no_ssd },
            thresholds: self.thresholds,
            tools:      self.tools.clone(),
            devices:    DevicesConfig {
                exclude: self.exclude.clone(),
                brand:   self.brand.as_str().to_string(),
                threeware_device_prefix: self.threeware_device_prefix.clone(),
            },
        }
    }
}
