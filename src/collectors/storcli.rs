use super::ToolRunner;
use anyhow::Result;
use std::path::Path;

/// One row of the storcli system overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorcliController {
    pub id:    String,
    pub model: String,
}

/// Run `storcli show` and list the controllers it knows about.
pub fn list_controllers(runner: &dyn ToolRunner, storcli: &Path) -> Result<Vec<StorcliController>> {
    let out = runner.run(storcli, &["show"])?;
    Ok(parse_overview(&out))
}

/// Device ids of the SSDs attached to controller `id`.
pub fn ssd_device_ids(runner: &dyn ToolRunner, storcli: &Path, id: &str) -> Result<Vec<String>> {
    let target = format!("/c{}/eall/sall", id);
    let out = runner.run(storcli, &[&target, "show"])?;
    Ok(parse_ssd_ids(&out))
}

/// Rows under the `Ctl Model ...` header: numeric controller id, then the
/// model name up to the first numeric column (Ports).
pub fn parse_overview(text: &str) -> Vec<StorcliController> {
    let mut in_table = false;
    let mut controllers = Vec::new();

    for line in text.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.first() == Some(&"Ctl") && tokens.get(1) == Some(&"Model") {
            in_table = true;
            continue;
        }
        if !in_table { continue; }
        if tokens.is_empty() {
            in_table = false;
            continue;
        }
        if tokens[0].starts_with('-') { continue; }
        if tokens[0].parse::<u32>().is_err() { continue; }

        let model: Vec<&str> = tokens[1..].iter()
            .take_while(|t| t.parse::<u32>().is_err())
            .copied()
            .collect();
        controllers.push(StorcliController {
            id:    tokens[0].to_string(),
            model: model.join(" "),
        });
    }
    controllers
}

/// PD list rows look like
/// `32:0      0 Onln   0 446.625 GB SATA SSD N   N  512B SSDSC2KB480G8R  U  -`;
/// the DID is the second column and the medium must be `SSD`.
pub fn parse_ssd_ids(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            let f: Vec<&str> = line.split_whitespace().collect();
            if f.len() < 3 { return None; }
            if !f[0].contains(':') { return None; }
            if !f.iter().any(|t| *t == "SSD") { return None; }
            f[1].parse::<u32>().ok().map(|_| f[1].to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const OVERVIEW: &str = "\
CLI Version = 007.1017.0000.0000 May 10, 2019
Operating system = Linux 5.4.0-42-generic
Status Code = 0
Status = Success
Description = None

Number of Controllers = 2
Host Name = db01
Operating System  = Linux 5.4.0-42-generic

System Overview :
===============

-------------------------------------------------------------------------------------
Ctl Model             Ports PDs DGs DNOpt VDs VNOpt BBU sPR DS  EHS ASOs Hlth
-------------------------------------------------------------------------------------
  0 PERC H730P Mini       8   4   1     0   1     0 Opt On  1&2 Y      3 Opt
  1 MR9361-8i             8   2   1     0   1     0 Opt On  1&2 Y      3 Opt
-------------------------------------------------------------------------------------

Ctl=Controller Index|DGs=Drive groups|VDs=Virtual drives|Fld=Failed
";

    const PD_LIST: &str = "\
Controller = 0
Status = Success
Description = Show Drive Information Succeeded.

Drive Information :
=================

-------------------------------------------------------------------------------
EID:Slt DID State DG       Size Intf Med SED PI SeSz Model                 Sp Type
-------------------------------------------------------------------------------
32:0      0 Onln   0 446.625 GB SATA SSD N   N  512B SSDSC2KB480G8R        U  -
32:1      1 Onln   0 446.625 GB SATA SSD N   N  512B SSDSC2KB480G8R        U  -
32:2      4 Onln   1   1.817 TB SAS  HDD N   N  512B ST2000NM0045          U  -
32:3     12 Onln   1 893.750 GB SATA SSD N   N  512B MZ7LH960HAJR0D3       U  -
-------------------------------------------------------------------------------

EID=Enclosure Device ID|Slt=Slot No.|DID=Device ID|DG=DriveGroup
";

    #[test]
    fn overview_rows() {
        let ctrls = parse_overview(OVERVIEW);
        assert_eq!(ctrls, vec![
            StorcliController { id: "0".into(), model: "PERC H730P Mini".into() },
            StorcliController { id: "1".into(), model: "MR9361-8i".into() },
        ]);
    }

    #[test]
    fn overview_without_controllers() {
        let text = "Number of Controllers = 0\nHost Name = db01\n";
        assert!(parse_overview(text).is_empty());
    }

    #[test]
    fn only_ssd_dids() {
        assert_eq!(parse_ssd_ids(PD_LIST), ["0", "1", "12"]);
    }

    #[test]
    fn parsing_is_repeatable() {
        assert_eq!(parse_ssd_ids(PD_LIST), parse_ssd_ids(PD_LIST));
        assert_eq!(parse_overview(OVERVIEW), parse_overview(OVERVIEW));
    }
}
