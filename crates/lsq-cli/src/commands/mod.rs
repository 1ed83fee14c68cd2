pub mod answer;
pub mod check;
pub mod glossary;
pub mod missions;
pub mod play;
pub mod reset;
pub mod review;
pub mod scenarios;
pub mod status;

use std::path::PathBuf;

use colored::Colorize;
use lsq_core::Catalog;
use lsq_engine::{EngineConfig, FileStore, Session, SessionEvent};
use tracing::debug;

/// Options shared by every subcommand.
pub struct Context {
    pub data: PathBuf,
    pub catalog: Option<PathBuf>,
    pub fast: bool,
}

impl Context {
    fn config(&self) -> EngineConfig {
        if self.fast {
            EngineConfig::default().instant()
        } else {
            EngineConfig::default()
        }
    }
}

/// Load the custom catalog if one was given, else the built-in one.
fn load_catalog(ctx: &Context) -> Result<Catalog, String> {
    let catalog = match &ctx.catalog {
        Some(path) => Catalog::load(path),
        None => Catalog::builtin(),
    }
    .map_err(|e| format!("cannot load catalog: {e}"))?;
    for warning in catalog.warnings() {
        eprintln!("  {}", warning.to_string().yellow());
    }
    Ok(catalog)
}

/// Open a session on the progress file.
fn open_session(ctx: &Context) -> Result<Session<FileStore>, String> {
    let catalog = load_catalog(ctx)?;
    debug!(data = %ctx.data.display(), fast = ctx.fast, "opening session");
    let store = FileStore::open(&ctx.data);
    Ok(Session::new(catalog, store, ctx.config()))
}

/// Print whatever the fired events have to say.
fn print_events(session: &Session<FileStore>, events: &[SessionEvent]) {
    for event in events {
        if let Some(text) = session.render_event(event) {
            println!("{text}");
        }
    }
}

/// Warn if the last write did not reach the progress file.
fn warn_unsaved(session: &Session<FileStore>) {
    if session.unsaved() {
        eprintln!(
            "  {} progress not saved to {}",
            "warning:".yellow().bold(),
            session.store().path().display()
        );
    }
}
