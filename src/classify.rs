use crate::collectors::{nvme, smartctl, ToolRunner};
use crate::error::CheckError;
use crate::models::controller::{ControllerRecord, DriverKind};
use crate::models::wear::{Classification, DriveMetric, Thresholds};
use crate::tools::ToolPaths;
use log::debug;

/// Result for one drive, ready for aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveOutcome {
    /// How the drive is named in the status message.
    pub label:  String,
    pub metric: DriveMetric,
    pub class:  Classification,
}

/// Read the wear indicator of one drive and classify it. A drive whose
/// indicator cannot be read is `Unknown`; it never aborts the run.
pub fn classify(
    drive_id:   &str,
    controller: &ControllerRecord,
    driver:     DriverKind,
    thr:        &Thresholds,
    tools:      &ToolPaths,
    runner:     &dyn ToolRunner,
) -> DriveOutcome {
    let (wear, temperature) = match extract(drive_id, controller, driver, tools, runner) {
        Ok(reading) => reading,
        Err(e)      => {
            debug!("{}", e);
            (None, None)
        }
    };

    let label = match driver {
        DriverKind::Auto => drive_id.to_string(),
        _                => format!("{}/{}", controller.label(), drive_id),
    };
    let class = Classification::from_wear(wear, thr);
    debug!("{}: wear {:?} temp {:?} -> {}", label, wear, temperature, class.label());

    DriveOutcome {
        label,
        metric: DriveMetric {
            drive_id:         drive_id.to_string(),
            controller_index: controller.index,
            wear,
            temperature,
        },
        class,
    }
}

/// `/dev/nvme<ctrl>n<ns>`, a whole namespace and not a partition.
pub fn is_nvme_path(drive_id: &str) -> bool {
    let Some(rest) = drive_id.strip_prefix("/dev/nvme") else { return false };
    let Some((ctrl, ns)) = rest.split_once('n') else { return false };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    digits(ctrl) && digits(ns)
}

fn extract(
    drive_id:   &str,
    controller: &ControllerRecord,
    driver:     DriverKind,
    tools:      &ToolPaths,
    runner:     &dyn ToolRunner,
) -> Result<(Option<u32>, Option<i32>), CheckError> {
    let unavailable = || CheckError::MetricUnavailable(drive_id.to_string());

    if driver == DriverKind::Auto && is_nvme_path(drive_id) {
        let nvme_path = tools.nvme.as_deref().ok_or_else(unavailable)?;
        let reading = nvme::read(runner, nvme_path, drive_id).map_err(|e| {
            debug!("{}: {:#}", drive_id, e);
            unavailable()
        })?;
        return match reading.wear {
            Some(w) => Ok((Some(w), reading.temperature)),
            None    => Err(unavailable()),
        };
    }

    let (device, device_type) = match driver.smart_device_type(drive_id) {
        None        => (drive_id, None),
        Some(dtype) => {
            if controller.block_device.is_empty() {
                debug!("{}: controller {} has no block device", drive_id, controller.label());
                return Err(unavailable());
            }
            (controller.block_device.as_str(), Some(dtype))
        }
    };

    let wear = smartctl::wear_value(runner, &tools.smartctl, device, device_type.as_deref())
        .map_err(|e| {
            debug!("{}: {:#}", drive_id, e);
            unavailable()
        })?
        .ok_or_else(unavailable)?;
    Ok((Some(wear), None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::fake::FakeRunner;

    const SMARTCTL: &str = "/usr/sbin/smartctl";
    const NVME: &str = "/usr/sbin/nvme";

    fn tools() -> ToolPaths {
        ToolPaths {
            controller: Some("/opt/MegaRAID/storcli/storcli64".into()),
            smartctl:   SMARTCTL.into(),
            nvme:       Some(NVME.into()),
            lsscsi:     "/usr/bin/lsscsi".into(),
        }
    }

    fn controller(id: &str, dev: &str) -> ControllerRecord {
        ControllerRecord { index: 0, controller_id: id.into(), block_device: dev.into(), drive_ids: vec![] }
    }

    fn attr_233(value: &str) -> String {
        format!("233 Media_Wearout_Indicator 0x0032   {v}   {v}   000    Old_age   Always       -       0\n", v = value)
    }

    #[test]
    fn nvme_paths() {
        assert!(is_nvme_path("/dev/nvme0n1"));
        assert!(is_nvme_path("/dev/nvme12n3"));
        assert!(!is_nvme_path("/dev/nvme0n1p1"));
        assert!(!is_nvme_path("/dev/sda"));
        assert!(!is_nvme_path("7"));
        assert!(!is_nvme_path("/dev/nvme0"));
        assert!(!is_nvme_path("/dev/nvmen1"));
        assert!(!is_nvme_path("/dev/nvme0n"));
    }

    #[test]
    fn direct_sata_drive() {
        let runner = FakeRunner::new().respond(&format!("{} -A -d auto /dev/sda", SMARTCTL), &attr_233("090"));
        let out = classify("/dev/sda", &controller("0", "/dev/sda"), DriverKind::Auto, &Thresholds::default(), &tools(), &runner);
        assert_eq!(out.label, "/dev/sda");
        assert_eq!(out.metric.wear, Some(90));
        assert_eq!(out.metric.temperature, None);
        assert_eq!(out.class, Classification::Ok);
    }

    #[test]
    fn megaraid_uses_sat_passthrough() {
        let runner = FakeRunner::new()
            .respond(&format!("{} -A -d sat+megaraid,12 /dev/sdb", SMARTCTL), "177 Wear_Leveling_Count 0x0013 004 004 000 Pre-fail Always - 3900\n");
        let out = classify("12", &controller("1", "/dev/sdb"), DriverKind::Megaraid, &Thresholds::default(), &tools(), &runner);
        assert_eq!(out.label, "c1/12");
        assert_eq!(out.metric.wear, Some(4));
        assert_eq!(out.class, Classification::Critical);
    }

    #[test]
    fn threeware_addressing() {
        let runner = FakeRunner::new().respond(&format!("{} -A -d 3ware,2 /dev/twa0", SMARTCTL), &attr_233("008"));
        let out = classify("2", &controller("c0", "/dev/twa0"), DriverKind::ThreeWare, &Thresholds::default(), &tools(), &runner);
        assert_eq!(out.label, "c0/2");
        assert_eq!(out.class, Classification::Warning);
    }

    #[test]
    fn nvme_reports_temperature() {
        let runner = FakeRunner::new()
            .respond(&format!("{} intel smart-log-add /dev/nvme0n1", NVME), "wear_leveling : 97%  min: 10, max: 12, avg: 11\n")
            .respond(&format!("{} smart-log /dev/nvme0n1", NVME), "temperature : 41 C\npercentage_used : 2%\n");
        let out = classify("/dev/nvme0n1", &controller("0", "/dev/nvme0n1"), DriverKind::Auto, &Thresholds::default(), &tools(), &runner);
        assert_eq!(out.metric.wear, Some(97));
        assert_eq!(out.metric.temperature, Some(41));
        assert!(!runner.invoked(SMARTCTL));
    }

    #[test]
    fn unreadable_drive_is_unknown() {
        let runner = FakeRunner::new().respond(&format!("{} -A -d auto /dev/sdc", SMARTCTL), "  9 Power_On_Hours 0x0032 100 100 000 Old_age Always - 1\n");
        let out = classify("/dev/sdc", &controller("0", "/dev/sdc"), DriverKind::Auto, &Thresholds::default(), &tools(), &runner);
        assert_eq!(out.metric.wear, None);
        assert_eq!(out.class, Classification::Unknown);

        let silent = FakeRunner::new();
        let out = classify("/dev/sdd", &controller("0", "/dev/sdd"), DriverKind::Auto, &Thresholds::default(), &tools(), &silent);
        assert_eq!(out.class, Classification::Unknown);
    }

    #[test]
    fn raid_drive_without_block_device_is_unknown() {
        let runner = FakeRunner::new();
        let out = classify("3", &controller("0", ""), DriverKind::Megaraid, &Thresholds::default(), &tools(), &runner);
        assert_eq!(out.class, Classification::Unknown);
        assert!(runner.calls().is_empty());
    }
}
