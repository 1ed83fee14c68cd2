//! CLI frontend for the Linux Service Quest learning engine.

mod commands;
mod telemetry;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::Context;

#[derive(Parser)]
#[command(
    name = "lsq",
    about = "Linux Service Quest: learn systemd service management by playing",
    version,
    propagate_version = true
)]
struct Cli {
    /// Progress file
    #[arg(long, global = true, default_value = "lsq-progress.json")]
    data: PathBuf,

    /// Custom catalog JSON (default: the built-in missions)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Skip the feedback pauses between questions
    #[arg(long, global = true)]
    fast: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively
    Play,

    /// Show level, XP and progress
    Status,

    /// Answer the current mission
    Answer {
        /// Option number (1-based) or the exact option text
        choice: String,
    },

    /// List missions and which are passed
    Missions {
        /// Show each mission's command for this distro
        #[arg(short, long)]
        distro: Option<String>,
    },

    /// List scenarios
    Scenarios,

    /// Show unlocked terms
    Glossary {
        /// Only terms whose word or meaning contains this
        query: Option<String>,
    },

    /// Show missed missions
    Review {
        /// Empty the review queue afterwards
        #[arg(long)]
        clear: bool,
    },

    /// Wipe all progress
    Reset,

    /// Validate a catalog file
    Check {
        /// Catalog JSON to validate
        file: PathBuf,
    },
}

fn main() {
    telemetry::init_tracing();
    let cli = Cli::parse();
    let ctx = Context {
        data: cli.data,
        catalog: cli.catalog,
        fast: cli.fast,
    };

    let result = match cli.command {
        Commands::Play => commands::play::run(&ctx),
        Commands::Status => commands::status::run(&ctx),
        Commands::Answer { choice } => commands::answer::run(&ctx, &choice),
        Commands::Missions { distro } => commands::missions::run(&ctx, distro.as_deref()),
        Commands::Scenarios => commands::scenarios::run(&ctx),
        Commands::Glossary { query } => commands::glossary::run(&ctx, query.as_deref()),
        Commands::Review { clear } => commands::review::run(&ctx, clear),
        Commands::Reset => commands::reset::run(&ctx),
        Commands::Check { file } => commands::check::run(&file),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
