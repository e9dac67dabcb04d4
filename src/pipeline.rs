//! Detection -> tool check -> enumeration -> presence -> classification
//! -> aggregation, run strictly in that order.

use crate::classify::{classify, DriveOutcome};
use crate::collectors::lsblk::{self, BlockDev};
use crate::collectors::ToolRunner;
use crate::config::Settings;
use crate::detect::detect;
use crate::enumerate::enumerate;
use crate::error::CheckError;
use crate::models::controller::{has_solid_state, ControllerRecord, DriverKind};
use crate::outcome::{self, RunResult};
use crate::tools::{check_tools, ToolPaths};
use log::{debug, warn};

/// What the setup stages found, before any drive is queried.
#[derive(Debug, Clone)]
pub struct Discovery {
    pub driver:      DriverKind,
    pub controllers: Vec<ControllerRecord>,
    pub tools:       ToolPaths,
}

pub fn discover(settings: &Settings, runner: &dyn ToolRunner) -> Result<Discovery, CheckError> {
    let inventory: Vec<BlockDev> = lsblk::run_lsblk(runner, &settings.tools.lsblk).unwrap_or_else(|e| {
        warn!("lsblk failed: {:#}", e);
        Vec::new()
    });
    let local = lsblk::non_rotational(&inventory, &settings.exclude);
    debug!("non-rotational devices: {:?}", local.iter().map(|d| d.path()).collect::<Vec<_>>());

    let family = detect(settings.card.as_deref(), !local.is_empty(), runner, &settings.tools.lspci)?;
    debug!("controller family: {}", family.label());

    let nvme_present = local.iter().any(|d| d.is_nvme());
    let tools = check_tools(family, nvme_present, &settings.tools)?;

    let (driver, controllers) = enumerate(family, &tools, settings, &local, runner)?;
    Ok(Discovery { driver, controllers, tools })
}

/// The full check: one classification per SSD, folded into a single result.
pub fn run_check(settings: &Settings, runner: &dyn ToolRunner) -> Result<RunResult, CheckError> {
    let found = discover(settings, runner)?;

    if !has_solid_state(&found.controllers) {
        debug!("no solid-state drive ids on any controller");
        return Ok(outcome::no_ssd(found.driver, settings.accept_no_ssd));
    }

    let drives: Vec<DriveOutcome> = found.controllers.iter()
        .flat_map(|ctrl| ctrl.solid_state_ids().map(move |id| (ctrl, id)))
        .map(|(ctrl, id)| classify(id, ctrl, found.driver, &settings.thresholds, &found.tools, runner))
        .collect();

    Ok(outcome::aggregate(found.driver, drives, &settings.thresholds))
}

/// `--test` mode: is there any SSD this check could look at?
/// Every failure along the way counts as "no".
pub fn presence(settings: &Settings, runner: &dyn ToolRunner) -> bool {
    match discover(settings, runner) {
        Ok(found) => has_solid_state(&found.controllers),
        Err(e)    => {
            debug!("presence check failed: {}", e);
            false
        }
    }
}
