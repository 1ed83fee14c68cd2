use comfy_table::{ContentArrangement, Table};

use super::Context;

pub fn run(ctx: &Context, query: Option<&str>) -> Result<(), String> {
    let session = super::open_session(ctx)?;
    let entries = session.glossary(query.unwrap_or(""));

    if entries.is_empty() {
        match query {
            Some(q) => println!("  No unlocked terms match '{q}'."),
            None => println!("  No terms unlocked yet. Pass a mission to learn one."),
        }
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Term", "Meaning", "Learned in"]);
    for e in &entries {
        table.add_row(vec![&e.word, &e.meaning, &e.mission]);
    }

    println!("{table}");
    println!();
    println!("  {} terms", entries.len());

    Ok(())
}
