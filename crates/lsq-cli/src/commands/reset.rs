use super::Context;

pub fn run(ctx: &Context) -> Result<(), String> {
    let mut session = super::open_session(ctx)?;
    session.reset();
    super::warn_unsaved(&session);
    println!("  Progress reset.");
    Ok(())
}
