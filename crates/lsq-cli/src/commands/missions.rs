use std::cmp::Ordering;

use comfy_table::{ContentArrangement, Table};
use lsq_core::Distro;

use super::Context;

pub fn run(ctx: &Context, distro: Option<&str>) -> Result<(), String> {
    let distro = distro
        .map(|name| {
            Distro::parse(name).ok_or_else(|| {
                format!("unknown distro '{name}' (try ubuntu, fedora, arch, opensuse)")
            })
        })
        .transpose()?;
    let session = super::open_session(ctx)?;
    let current = session.progress().current_mission;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    let mut header = vec![
        "#".to_string(),
        "Mission".to_string(),
        "Distro".to_string(),
        "Term".to_string(),
    ];
    if let Some(d) = distro {
        header.push(format!("{d} ({})", d.package_manager()));
    }
    header.push("Status".to_string());
    table.set_header(header);

    for (i, mission) in session.catalog().missions().iter().enumerate() {
        let status = match i.cmp(&current) {
            Ordering::Less => "passed",
            Ordering::Equal => "current",
            Ordering::Greater => "locked",
        };
        let mut row = vec![
            (i + 1).to_string(),
            mission.title.clone(),
            mission.distro.to_string(),
            mission.term.word.clone(),
        ];
        if let Some(d) = distro {
            row.push(
                mission
                    .command_for(d)
                    .map(|c| c.command.clone())
                    .unwrap_or_else(|| "—".to_string()),
            );
        }
        row.push(status.to_string());
        table.add_row(row);
    }

    println!("{table}");
    println!();
    println!("  {} missions", session.catalog().mission_count());

    Ok(())
}
