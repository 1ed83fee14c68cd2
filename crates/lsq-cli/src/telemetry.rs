//! Logging setup.
//!
//! `LSQ_LOG` takes an `EnvFilter` directive (e.g. `debug` or
//! `warn,lsq_engine=debug`). Logs go to stderr so they never mix with
//! command output.

use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("LSQ_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
