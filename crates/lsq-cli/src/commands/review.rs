use comfy_table::{ContentArrangement, Table};

use super::Context;

pub fn run(ctx: &Context, clear: bool) -> Result<(), String> {
    let mut session = super::open_session(ctx)?;
    let items = session.review_items();

    if items.is_empty() {
        println!("  No mistakes to review.");
    } else {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["#", "Id", "Mission", "Question", "Answer"]);
        for (i, m) in items.iter().enumerate() {
            table.add_row(vec![
                (i + 1).to_string(),
                m.id.clone(),
                m.title.clone(),
                m.question.clone(),
                m.answer.clone(),
            ]);
        }
        println!("{table}");
        println!();
        println!("  {} to review", items.len());
        if !clear {
            println!("  Retry them with `review <number>` inside `lsq play` (no XP).");
        }
    }

    if clear {
        session.clear_mistakes();
        super::warn_unsaved(&session);
        println!("  Review queue cleared.");
    }

    Ok(())
}
