//! Command-line front end for the loyalty ledger.
//!
//! The `loyalty` binary opens a ledger over the configured storage backend,
//! runs one command, and prints the result as text or JSON.
//!
//! # Configuration
//!
//! Environment variables, each overridable by a flag of the same purpose:
//!
//! - `LOYALTY_DATA_DIR` / `--data-dir`: where slots are stored (default `.loyalty`)
//! - `LOYALTY_BACKEND` / `--backend`: `file`, `memory`, or `rocksdb`
//! - `LOYALTY_CONFIG` / `--config`: JSON file with custom `tiers` (default `loyalty.json`)

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod render;

use std::io::Write;

use loyalty_ledger::LedgerStore;

pub use cli::{AdjustArgs, Cli, Command};
pub use config::{Backend, CliConfig};
pub use render::OutputFormat;

/// Resolve configuration, open the ledger, and run the parsed command.
///
/// # Errors
///
/// Returns an error if configuration is invalid, storage cannot be opened,
/// or the command fails.
pub fn run(cli: Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    let format = cli.output_format();
    let config = CliConfig::from_env().with_overrides(cli.data_dir, cli.backend, cli.config);

    tracing::debug!(
        data_dir = %config.data_dir.display(),
        backend = %config.backend,
        config_path = %config.config_path.display(),
        "Configuration loaded"
    );

    let policy = config.load_tiers()?;
    let store = config.open_store()?;
    let mut ledger = LedgerStore::open(store).with_policy(policy);

    commands::execute(&mut ledger, cli.command, format, out)
}
