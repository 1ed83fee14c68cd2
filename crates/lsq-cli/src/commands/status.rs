use colored::Colorize;

use super::Context;

pub fn run(ctx: &Context) -> Result<(), String> {
    let session = super::open_session(ctx)?;
    let snap = session.progress();

    println!("  {} {}", "Level".bold(), snap.level);
    println!("  {} {}", "XP".bold(), snap.xp);
    println!(
        "  {} {}/{} ({}%)",
        "Missions".bold(),
        snap.current_mission,
        snap.mission_count,
        snap.progress_percent
    );
    println!("  {} {}", "Review".bold(), session.mistakes().len());

    match session.current_mission() {
        Some(m) => println!("  {} {} [{}]", "Next".bold(), m.title, m.distro),
        None => println!("  {}", "All missions complete!".green()),
    }

    Ok(())
}
