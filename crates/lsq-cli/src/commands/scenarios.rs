use comfy_table::{ContentArrangement, Table};

use super::Context;

pub fn run(ctx: &Context) -> Result<(), String> {
    let catalog = super::load_catalog(ctx)?;

    if catalog.scenarios().is_empty() {
        println!("  No scenarios found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Scenario", "Distro", "Steps"]);

    for (i, s) in catalog.scenarios().iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            s.title.clone(),
            s.distro.to_string(),
            s.len().to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  Start one with `scenario <number>` inside `lsq play`.");

    Ok(())
}
