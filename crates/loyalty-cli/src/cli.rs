//! Command-line arguments.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use loyalty_core::CustomerId;

use crate::config::Backend;
use crate::render::OutputFormat;

/// loyalty - customer points ledger
#[derive(Parser, Debug)]
#[command(name = "loyalty")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Log filter (trace, debug, info, warn, error, or a full directive)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Data directory (overrides `LOYALTY_DATA_DIR`)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Storage backend: file, memory, or rocksdb (overrides `LOYALTY_BACKEND`)
    #[arg(long, global = true)]
    pub backend: Option<Backend>,

    /// Tier configuration file (overrides `LOYALTY_CONFIG`)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// How results should be printed.
    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List customers, optionally filtered
    #[command(alias = "ls")]
    Customers {
        /// Case-insensitive match on name or email
        #[arg(short, long)]
        search: Option<String>,

        /// Only customers in this tier ("All" for every tier)
        #[arg(short, long)]
        tier: Option<String>,
    },

    /// Show a customer's tier standing and transaction history
    Show {
        /// Customer id
        id: CustomerId,
    },

    /// Enroll a new customer with a zero balance
    AddCustomer {
        /// Full name
        #[arg(long)]
        name: String,

        /// Contact email
        #[arg(long)]
        email: String,

        /// Postal address
        #[arg(long)]
        address: Option<String>,

        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<NaiveDate>,
    },

    /// Credit points to a customer
    Earn(AdjustArgs),

    /// Redeem points from a customer
    Redeem {
        #[command(flatten)]
        adjust: AdjustArgs,

        /// Redeem even if the balance is too low (the balance stops at zero)
        #[arg(long)]
        allow_clamp: bool,
    },

    /// Edit a customer's name, address, or date of birth
    UpdateProfile {
        /// Customer id
        id: CustomerId,

        /// New full name
        #[arg(long)]
        name: Option<String>,

        /// New postal address
        #[arg(long, conflicts_with = "clear_address")]
        address: Option<String>,

        /// Remove the postal address
        #[arg(long)]
        clear_address: bool,

        /// New date of birth (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_dob")]
        dob: Option<NaiveDate>,

        /// Remove the date of birth
        #[arg(long)]
        clear_dob: bool,
    },

    /// Program-wide figures, top customers, and recent activity
    Dashboard,

    /// The rewards catalog, cheapest first
    Rewards,

    /// Write the customer list as CSV
    Export {
        /// Output path (default: customers_<today>.csv)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Arguments shared by `earn` and `redeem`.
#[derive(Args, Debug)]
pub struct AdjustArgs {
    /// Customer id
    pub id: CustomerId,

    /// Number of points (must be positive)
    #[arg(allow_negative_numbers = true)]
    pub amount: i64,

    /// Note recorded with the transaction
    #[arg(short, long, default_value = "")]
    pub note: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const OLIVIA: &str = "01HF8Z2K3M000000000000C001";

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_earn_with_note() {
        let cli = Cli::try_parse_from(["loyalty", "earn", OLIVIA, "150", "--note", "bonus"]).unwrap();
        let Command::Earn(args) = cli.command else {
            panic!("expected earn");
        };
        assert_eq!(args.id.to_string(), OLIVIA);
        assert_eq!(args.amount, 150);
        assert_eq!(args.note, "bonus");
    }

    #[test]
    fn negative_amounts_reach_validation() {
        let cli = Cli::try_parse_from(["loyalty", "redeem", OLIVIA, "-5"]).unwrap();
        let Command::Redeem { adjust, allow_clamp } = cli.command else {
            panic!("expected redeem");
        };
        assert_eq!(adjust.amount, -5);
        assert!(!allow_clamp);
    }

    #[test]
    fn accepts_older_ids_but_not_blank_ones() {
        let cli = Cli::try_parse_from(["loyalty", "show", "c_123"]).unwrap();
        let Command::Show { id } = cli.command else {
            panic!("expected show");
        };
        assert!(id.is_legacy());
        assert!(Cli::try_parse_from(["loyalty", "show", " "]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["loyalty", "dashboard", "--json", "--backend", "memory"]).unwrap();
        assert_eq!(cli.output_format(), OutputFormat::Json);
        assert_eq!(cli.backend, Some(Backend::Memory));
    }

    #[test]
    fn clear_and_set_address_conflict() {
        let result = Cli::try_parse_from([
            "loyalty",
            "update-profile",
            OLIVIA,
            "--address",
            "x",
            "--clear-address",
        ]);
        assert!(result.is_err());
    }
}
