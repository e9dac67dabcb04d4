mod classify;
mod collectors;
mod config;
mod detect;
mod enumerate;
mod error;
mod models;
mod outcome;
mod pipeline;
mod tools;

use clap::error::ErrorKind;
use clap::Parser;
use collectors::SystemRunner;
use config::{Config, Overrides, Settings};
use error::{CheckError, EXIT_SETUP_UNKNOWN};
use outcome::RunResult;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(
    name = "check_ssd_wear",
    about = "Monitoring check for SSD wear levels on direct-attached drives and behind LSI or 3ware RAID controllers",
    version
)]
struct Cli {
    /// Warning threshold, percent of wear life left [default: 10]
    #[arg(short, long)]
    warning: Option<u32>,

    /// Critical threshold, percent of wear life left [default: 5]
    #[arg(short, long)]
    critical: Option<u32>,

    /// Force the controller type: lsi, 3ware or auto
    #[arg(long)]
    card: Option<String>,

    /// Only check direct-attached devices whose name contains this string
    #[arg(long)]
    device: Option<String>,

    /// Regex a 3ware drive line must match to count as an SSD [default: INTEL|Samsung]
    #[arg(long)]
    brand: Option<String>,

    /// Path to storcli
    #[arg(long)]
    storcli: Option<PathBuf>,

    /// Path to tw_cli
    #[arg(long)]
    twcli: Option<PathBuf>,

    /// Path to smartctl
    #[arg(long)]
    smartctl: Option<PathBuf>,

    /// Path to the nvme CLI
    #[arg(long)]
    nvme: Option<PathBuf>,

    /// Timeout in seconds for each external tool call [default: 30]
    #[arg(long)]
    timeout: Option<u64>,

    /// Read settings from this TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print diagnostic output to stdout
    #[arg(long)]
    debug: bool,

    /// Only test for SSD presence: exit 0 if one is found, 1 otherwise
    #[arg(long)]
    test: bool,

    /// Report OK instead of UNKNOWN when no SSD is found
    #[arg(long)]
    nossd: bool,

    /// Print the check result as JSON
    #[arg(long)]
    json: bool,

    /// Print the resolved settings as TOML and exit
    #[arg(long)]
    show_config: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            warning:  self.warning,
            critical: self.critical,
            card:     self.card.clone(),
            device:   self.device.clone(),
            brand:    self.brand.clone(),
            storcli:  self.storcli.clone(),
            tw_cli:   self.twcli.clone(),
            smartctl: self.smartctl.clone(),
            nvme:     self.nvme.clone(),
            timeout:  self.timeout,
            nossd:    self.nossd,
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(c)  => c,
        Err(e) => match invalid_arguments(&e) {
            Some(line) => {
                println!("{}", line);
                process::exit(EXIT_SETUP_UNKNOWN);
            }
            None => e.exit(),
        },
    };

    init_logging(cli.debug);

    let settings = match Config::load(cli.config.as_deref()).and_then(|c| Settings::resolve(c, cli.overrides())) {
        Ok(s)  => s,
        Err(e) => fail(&e),
    };

    if cli.show_config {
        process::exit(run_show_config(&settings));
    }
    if cli.test {
        process::exit(run_presence(&settings));
    }
    process::exit(run_check(&settings, cli.json));
}

/// Status line for a command line clap rejected. `None` for `--help` and
/// `--version`, which clap prints itself with exit 0.
fn invalid_arguments(err: &clap::Error) -> Option<String> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => None,
        _ => {
            let text = err.to_string();
            let reason = text.lines().next().unwrap_or("").trim_start_matches("error: ");
            Some(format!("UNKNOWN: invalid arguments: {}", reason))
        }
    }
}

/// Logging stays off unless asked for, so the status line is the only output.
fn init_logging(debug: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off"));
    if debug {
        builder
            .filter_level(log::LevelFilter::Debug)
            .target(env_logger::Target::Stdout);
    }
    let _ = builder.try_init();
}

fn fail(err: &CheckError) -> ! {
    println!("{}", err.status_line());
    process::exit(err.exit_code());
}

fn run_show_config(settings: &Settings) -> i32 {
    let path = Config::config_path()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    match toml::to_string_pretty(&settings.to_config()) {
        Ok(text) => {
            println!("# default config path: {}", path);
            println!();
            print!("{}", text);
            0
        }
        Err(e) => fail(&CheckError::Config(e.to_string())),
    }
}

fn run_presence(settings: &Settings) -> i32 {
    let runner = SystemRunner::new(settings.timeout());
    if pipeline::presence(settings, &runner) { 0 } else { 1 }
}

fn run_check(settings: &Settings, json: bool) -> i32 {
    let runner = SystemRunner::new(settings.timeout());
    let result = match pipeline::run_check(settings, &runner) {
        Ok(r)  => r,
        Err(e) => fail(&e),
    };

    if json {
        match json_report(&result) {
            Ok(text) => println!("{}", text),
            Err(e)   => fail(&CheckError::Config(format!("cannot encode report: {}", e))),
        }
    } else {
        println!("{}", result.status_line());
    }
    result.exit_code
}

fn json_report(result: &RunResult) -> serde_json::Result<String> {
    use serde_json::{json, Value};

    let drives: Vec<Value> = result.drives.iter().map(|d| {
        json!({
            "label":            d.label,
            "drive_id":         d.metric.drive_id,
            "controller_index": d.metric.controller_index,
            "wear":             d.metric.wear,
            "temperature":      d.metric.temperature,
            "status":           d.class,
        })
    }).collect();

    let report = json!({
        "timestamp": chrono::Local::now().to_rfc3339(),
        "driver":    result.driver,
        "status":    result.severity.label(),
        "exit_code": result.exit_code,
        "summary":   result.status_line(),
        "perf_data": result.perf_data,
        "drives":    drives,
    });
    serde_json::to_string_pretty(&report)
}
