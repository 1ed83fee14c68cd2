use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Instant;

use colored::Colorize;
use lsq_engine::{FileStore, Session};

use super::Context;

pub fn run(ctx: &Context) -> Result<(), String> {
    let mut session = super::open_session(ctx)?;
    let snap = session.progress();

    println!("  {} Linux Service Quest", "Starting".bold());
    println!(
        "  Level {} | {} XP | {}/{} missions",
        snap.level, snap.xp, snap.current_mission, snap.mission_count
    );
    println!("  Type 'help' for commands, 'quit' to exit.\n");
    println!("{}", session.prompt());

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();
    let mut clock = Instant::now();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        catch_up(&mut session, &mut clock);
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match session.process(input) {
            Ok(output) => {
                if !output.is_empty() {
                    println!("{output}\n");
                }
                if matches!(input.to_lowercase().as_str(), "quit" | "q" | "exit") {
                    break;
                }
            }
            Err(e) => {
                println!("{}\n", e.to_string().yellow());
            }
        }
        super::warn_unsaved(&session);

        while session.is_busy() {
            if let Some(due) = session.next_due() {
                thread::sleep(due);
            }
            catch_up(&mut session, &mut clock);
        }
    }

    session.shutdown();
    Ok(())
}

/// Tick the session by the wall-clock time since the last call.
fn catch_up(session: &mut Session<FileStore>, clock: &mut Instant) {
    let now = Instant::now();
    let events = session.tick(now.duration_since(*clock));
    *clock = now;
    super::print_events(session, &events);
}
