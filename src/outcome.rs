use crate::classify::DriveOutcome;
use crate::error::EXIT_SETUP_UNKNOWN;
use crate::models::controller::DriverKind;
use crate::models::wear::{Classification, Thresholds};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Ok       => "OK",
            Severity::Warning  => "WARNING",
            Severity::Critical => "CRITICAL",
            Severity::Unknown  => "UNKNOWN",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Severity::Ok       => 0,
            Severity::Warning  => 1,
            Severity::Critical => 2,
            Severity::Unknown  => 3,
        }
    }

    /// Fold one drive into the running severity. Unknown outranks Critical,
    /// so one unreadable drive makes the whole run Unknown.
    pub fn escalate(self, class: Classification) -> Self {
        let next = match class {
            Classification::Ok       => Severity::Ok,
            Classification::Warning  => Severity::Warning,
            Classification::Critical => Severity::Critical,
            Classification::Unknown  => Severity::Unknown,
        };
        self.max(next)
    }
}

/// Everything the monitoring system gets back from one run.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub severity:  Severity,
    pub driver:    DriverKind,
    pub message:   String,
    pub perf_data: Vec<String>,
    pub exit_code: i32,
    pub drives:    Vec<DriveOutcome>,
    /// Set when the run ended because no SSD was found.
    pub no_ssd:    bool,
}

impl RunResult {
    pub fn prefix(&self) -> String {
        if self.no_ssd { self.severity.label().to_string() }
        else { format!("SSD {}", self.severity.label()) }
    }

    /// `<PREFIX>: (<driver>) <fragments> | <perf data>`
    pub fn status_line(&self) -> String {
        let mut line = format!("{}: ({}) {}", self.prefix(), self.driver.label(), self.message);
        if !self.perf_data.is_empty() {
            line.push_str(" | ");
            line.push_str(&self.perf_data.join(" "));
        }
        line
    }
}

/// Combine per-drive outcomes, in enumeration order, into one result.
pub fn aggregate(driver: DriverKind, drives: Vec<DriveOutcome>, thr: &Thresholds) -> RunResult {
    let severity = drives.iter()
        .fold(Severity::Ok, |sev, d| sev.escalate(d.class));

    let message = drives.iter()
        .map(fragment)
        .collect::<Vec<_>>()
        .join(", ");

    let perf_data = drives.iter()
        .flat_map(|d| perf_entries(d, thr))
        .collect();

    RunResult {
        severity,
        driver,
        message,
        perf_data,
        exit_code: severity.exit_code(),
        drives,
        no_ssd: false,
    }
}

/// Outcome when enumeration found no SSD at all.
pub fn no_ssd(driver: DriverKind, accept: bool) -> RunResult {
    let (severity, exit_code) = if accept {
        (Severity::Ok, 0)
    } else {
        (Severity::Unknown, EXIT_SETUP_UNKNOWN)
    };
    RunResult {
        severity,
        driver,
        message:   "no solid-state drives found".into(),
        perf_data: Vec::new(),
        exit_code,
        drives:    Vec::new(),
        no_ssd:    true,
    }
}

fn fragment(d: &DriveOutcome) -> String {
    match (d.metric.wear, d.metric.temperature) {
        (Some(w), Some(t)) => format!("{} WLC/MWI {} temp {}C", d.label, w, t),
        (Some(w), None)    => format!("{} WLC/MWI {}", d.label, w),
        (None, _)          => format!("{} WLC/MWI unavailable", d.label),
    }
}

fn perf_entries(d: &DriveOutcome, thr: &Thresholds) -> Vec<String> {
    let key = format!("c{}_{}", d.metric.controller_index, metric_name(&d.metric.drive_id));
    let mut out = Vec::new();
    if let Some(w) = d.metric.wear {
        out.push(format!("{}={};{};{};0;100", key, w, thr.warning, thr.critical));
    }
    if let Some(t) = d.metric.temperature {
        out.push(format!("{}_temp={}", key, t));
    }
    out
}

/// `/dev/nvme0n1` -> `nvme0n1`; plain ids pass through.
fn metric_name(drive_id: &str) -> &str {
    drive_id.rsplit('/').next().unwrap_or(drive_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::wear::DriveMetric;

    fn drive(id: &str, wear: Option<u32>, temp: Option<i32>) -> DriveOutcome {
        let thr = Thresholds::default();
        DriveOutcome {
            label:  id.to_string(),
            metric: DriveMetric { drive_id: id.into(), controller_index: 0, wear, temperature: temp },
            class:  Classification::from_wear(wear, &thr),
        }
    }

    fn severity_of(classes: &[Classification]) -> Severity {
        classes.iter().fold(Severity::Ok, |s, c| s.escalate(*c))
    }

    #[test]
    fn worst_drive_wins() {
        use Classification::*;
        assert_eq!(severity_of(&[]), Severity::Ok);
        assert_eq!(severity_of(&[Ok, Ok]), Severity::Ok);
        assert_eq!(severity_of(&[Ok, Warning, Ok]), Severity::Warning);
        assert_eq!(severity_of(&[Warning, Critical, Warning]), Severity::Critical);
        assert_eq!(severity_of(&[Critical, Ok]), Severity::Critical);
    }

    #[test]
    fn unknown_outranks_critical() {
        use Classification::*;
        assert_eq!(severity_of(&[Unknown, Critical]), Severity::Unknown);
        assert_eq!(severity_of(&[Critical, Unknown]), Severity::Unknown);
        assert_eq!(severity_of(&[Ok, Unknown, Warning, Critical]), Severity::Unknown);
        assert_eq!(Severity::Unknown.exit_code(), 3);
    }

    #[test]
    fn message_and_perf_data() {
        let result = aggregate(DriverKind::Auto, vec![
            drive("/dev/sda", Some(90), None),
            drive("/dev/nvme0n1", Some(7), Some(38)),
            drive("/dev/sdc", None, None),
        ], &Thresholds::default());

        assert_eq!(result.severity, Severity::Unknown);
        assert_eq!(result.exit_code, 3);
        assert_eq!(
            result.status_line(),
            "SSD UNKNOWN: (auto) /dev/sda WLC/MWI 90, /dev/nvme0n1 WLC/MWI 7 temp 38C, /dev/sdc WLC/MWI unavailable \
             | c0_sda=90;10;5;0;100 c0_nvme0n1=7;10;5;0;100 c0_nvme0n1_temp=38"
        );
    }

    #[test]
    fn raid_drive_keys() {
        let mut d = drive("12", Some(55), None);
        d.label = "c1/12".into();
        d.metric.controller_index = 1;
        let result = aggregate(DriverKind::Megaraid, vec![d], &Thresholds::default());
        assert_eq!(result.status_line(), "SSD OK: (megaraid) c1/12 WLC/MWI 55 | c1_12=55;10;5;0;100");
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn missing_ssd_handling() {
        let accepted = no_ssd(DriverKind::Auto, true);
        assert_eq!(accepted.exit_code, 0);
        assert_eq!(accepted.status_line(), "OK: (auto) no solid-state drives found");

        let rejected = no_ssd(DriverKind::Megaraid, false);
        assert_eq!(rejected.exit_code, 4);
        assert!(rejected.status_line().starts_with("UNKNOWN: "));
    }

    #[test]
    fn exit_code_ignores_drive_order() {
        let thr = Thresholds::default();
        let a = aggregate(DriverKind::Auto, vec![drive("/dev/sda", Some(3), None), drive("/dev/sdb", Some(8), None)], &thr);
        let b = aggregate(DriverKind::Auto, vec![drive("/dev/sdb", Some(8), None), drive("/dev/sda", Some(3), None)], &thr);
        assert_eq!(a.exit_code, 2);
        assert_eq!(a.exit_code, b.exit_code);
    }
}
