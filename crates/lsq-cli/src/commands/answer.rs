use colored::Colorize;
use lsq_engine::AnswerOutcome;

use super::Context;

pub fn run(ctx: &Context, choice: &str) -> Result<(), String> {
    let mut session = super::open_session(ctx)?;

    let Some(mission) = session.current_mission() else {
        println!("  All missions complete. Run `lsq reset` to start over.");
        return Ok(());
    };
    let selected = match choice.trim().parse::<usize>() {
        Ok(n) => mission.option(n).map(str::to_string).ok_or_else(|| {
            format!(
                "option {n} does not exist (choose 1-{})",
                mission.options.len()
            )
        })?,
        Err(_) => {
            let text = choice.trim();
            mission
                .options
                .iter()
                .find(|o| o.as_str() == text)
                .cloned()
                .ok_or_else(|| {
                    format!(
                        "'{text}' is not one of the options (choose 1-{} or the exact option text)",
                        mission.options.len()
                    )
                })?
        }
    };

    let outcome = session.submit_answer(&selected);
    match &outcome {
        AnswerOutcome::Correct {
            level, leveled_up, ..
        } => {
            println!("{}", outcome.feedback().unwrap_or_default().green());
            if *leveled_up {
                println!("{}", format!("⭐ Level up! You reached level {level}.").bold());
            }
        }
        AnswerOutcome::Incorrect { .. } => {
            println!("{}", outcome.feedback().unwrap_or_default().red());
            if let Some(m) = session.current_mission() {
                println!("  Hint: {}", m.command);
            }
        }
        AnswerOutcome::Ignored | AnswerOutcome::Busy => {
            println!("  Nothing to answer right now.");
        }
    }

    let events = session.settle();
    super::print_events(&session, &events);
    super::warn_unsaved(&session);
    Ok(())
}
