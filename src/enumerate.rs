use crate::collectors::lsblk::BlockDev;
use crate::collectors::{lsscsi, storcli, tw_cli, ToolRunner};
use crate::config::Settings;
use crate::error::CheckError;
use crate::models::controller::{ControllerFamily, ControllerRecord, DriverKind};
use crate::tools::ToolPaths;
use log::{debug, warn};

/// List the controllers of `family` and the SSD identifiers behind each.
/// Records come back in discovery order with `index` matching position.
pub fn enumerate(
    family:   ControllerFamily,
    tools:    &ToolPaths,
    settings: &Settings,
    local:    &[&BlockDev],
    runner:   &dyn ToolRunner,
) -> Result<(DriverKind, Vec<ControllerRecord>), CheckError> {
    let controllers = match family {
        ControllerFamily::Lsi       => megaraid(tools, runner)?,
        ControllerFamily::ThreeWare => threeware(tools, settings, runner)?,
        ControllerFamily::Auto      => vec![direct(local, settings.device_filter.as_deref())],
    };
    for c in &controllers {
        debug!("controller {} (id {}) on {:?}: drives {:?}", c.index, c.controller_id, c.block_device, c.drive_ids);
    }
    Ok((family.driver(), controllers))
}

fn megaraid(tools: &ToolPaths, runner: &dyn ToolRunner) -> Result<Vec<ControllerRecord>, CheckError> {
    let storcli_path = tools.controller.as_deref()
        .ok_or(CheckError::NoController("LSI"))?;

    let found = storcli::list_controllers(runner, storcli_path).unwrap_or_else(|e| {
        warn!("storcli show failed: {:#}", e);
        Vec::new()
    });
    if found.is_empty() {
        return Err(CheckError::NoController("LSI"));
    }

    let records = found.iter().enumerate().map(|(index, ctrl)| {
        let block_device = lsscsi::backing_device(runner, &tools.lsscsi, &ctrl.model)
            .unwrap_or_else(|e| {
                warn!("lsscsi failed: {:#}", e);
                None
            })
            .unwrap_or_default();
        let drive_ids = storcli::ssd_device_ids(runner, storcli_path, &ctrl.id)
            .unwrap_or_else(|e| {
                warn!("storcli /c{} failed: {:#}", ctrl.id, e);
                Vec::new()
            });
        ControllerRecord { index, controller_id: ctrl.id.clone(), block_device, drive_ids }
    }).collect();
    Ok(records)
}

fn threeware(tools: &ToolPaths, settings: &Settings, runner: &dyn ToolRunner) -> Result<Vec<ControllerRecord>, CheckError> {
    let tw_cli_path = tools.controller.as_deref()
        .ok_or(CheckError::NoController("3ware"))?;

    let controller = tw_cli::first_controller(runner, tw_cli_path)
        .unwrap_or_else(|e| {
            warn!("tw_cli show failed: {:#}", e);
            None
        })
        .ok_or(CheckError::NoController("3ware"))?;

    let block_device = format!("{}{}", settings.threeware_device_prefix, tw_cli::controller_number(&controller));
    let drive_ids = tw_cli::brand_ports(runner, tw_cli_path, &controller, &settings.brand)
        .unwrap_or_else(|e| {
            warn!("tw_cli /{} failed: {:#}", controller, e);
            Vec::new()
        });

    Ok(vec![ControllerRecord { index: 0, controller_id: controller, block_device, drive_ids }])
}

/// Directly attached drives: one synthetic controller whose drive ids are
/// the device paths themselves.
fn direct(local: &[&BlockDev], device_filter: Option<&str>) -> ControllerRecord {
    let drive_ids: Vec<String> = local.iter()
        .filter(|d| device_filter.map_or(true, |f| d.name.contains(f) || d.path().contains(f)))
        .map(|d| d.path())
        .collect();
    ControllerRecord {
        index:         0,
        controller_id: "0".into(),
        block_device:  drive_ids.first().cloned().unwrap_or_default(),
        drive_ids,
    }
}
