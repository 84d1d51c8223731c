//! loyalty - customer points ledger
//!
//! Entry point for the `loyalty` command.

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use loyalty_cli::{run, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // --log-level wins over RUST_LOG
    let filter = match cli.log_level.as_deref() {
        Some(directive) => EnvFilter::try_new(directive)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,loyalty=debug".into()),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}
