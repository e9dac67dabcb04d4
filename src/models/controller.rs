use serde::Serialize;

/// Which storage path the drives are reached through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerFamily {
    /// LSI / Avago / Broadcom MegaRAID, driven by storcli.
    Lsi,
    /// 3ware, driven by tw_cli.
    ThreeWare,
    /// Directly attached drives, no RAID tool needed.
    Auto,
}

impl ControllerFamily {
    pub fn label(&self) -> &'static str {
        match self {
            ControllerFamily::Lsi       => "LSI",
            ControllerFamily::ThreeWare => "3ware",
            ControllerFamily::Auto      => "auto",
        }
    }

    /// The SMART tool convention drives of this family are queried with.
    pub fn driver(&self) -> DriverKind {
        match self {
            ControllerFamily::Lsi       => DriverKind::Megaraid,
            ControllerFamily::ThreeWare => DriverKind::ThreeWare,
            ControllerFamily::Auto      => DriverKind::Auto,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    Megaraid,
    #[serde(rename = "3ware")]
    ThreeWare,
    Auto,
}

impl DriverKind {
    pub fn label(&self) -> &'static str {
        match self {
            DriverKind::Megaraid  => "megaraid",
            DriverKind::ThreeWare => "3ware",
            DriverKind::Auto      => "auto",
        }
    }

    /// `-d` argument for smartctl when addressing a drive behind a controller.
    /// Plain `megaraid` passthrough misreads SATA SSDs, so `sat+megaraid` is used.
    pub fn smart_device_type(&self, drive_id: &str) -> Option<String> {
        match self {
            DriverKind::Megaraid  => Some(format!("sat+megaraid,{}", drive_id)),
            DriverKind::ThreeWare => Some(format!("3ware,{}", drive_id)),
            DriverKind::Auto      => None,
        }
    }
}

/// One controller found during enumeration. `index` is its position in
/// discovery order; `controller_id` is whatever the controller tool calls it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerRecord {
    pub index:         usize,
    pub controller_id: String,
    /// Empty when the backing device could not be resolved.
    pub block_device:  String,
    pub drive_ids:     Vec<String>,
}

impl ControllerRecord {
    /// Drive ids with blank entries dropped.
    pub fn solid_state_ids(&self) -> impl Iterator<Item = &str> {
        self.drive_ids.iter().map(|d| d.trim()).filter(|d| !d.is_empty())
    }

    /// Controller name as operators know it: `c0`, `c2`, ...
    pub fn label(&self) -> String {
        if self.controller_id.starts_with('c') { self.controller_id.clone() }
        else { format!("c{}", self.controller_id) }
    }
}

/// True when at least one controller lists a non-blank drive id.
pub fn has_solid_state(controllers: &[ControllerRecord]) -> bool {
    controllers.iter().any(|c| c.solid_state_ids().next().is_some())
}
