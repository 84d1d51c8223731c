//! Command execution against an open ledger.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use loyalty_core::{rewards_by_cost, Customer, CustomerId, NewCustomer, ProfileUpdate, Reward};
use loyalty_ledger::{export_file_name, today, Adjustment, CustomerFilter, LedgerStore};
use loyalty_store::BlobStore;

use crate::cli::{AdjustArgs, Command};
use crate::render::{self, OutputFormat};

/// A customer with their current tier, as listed by `customers`.
#[derive(Debug, Serialize)]
struct CustomerRow<'a> {
    #[serde(flatten)]
    customer: &'a Customer,
    tier: &'a str,
}

/// A catalog entry with the tier label shown next to it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RewardRow<'a> {
    #[serde(flatten)]
    reward: &'a Reward,
    required_tier: String,
}

/// Run one command and print its result to `out`.
///
/// # Errors
///
/// Returns an error if the command is refused (unknown customer, invalid
/// input, redemption above the balance), storage fails, or output cannot be
/// written.
pub fn execute<S: BlobStore>(
    ledger: &mut LedgerStore<S>,
    command: Command,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::Customers { search, tier } => {
            list_customers(ledger, &CustomerFilter { query: search, tier }, format, out)
        }
        Command::Show { id } => show_customer(ledger, &id, format, out),
        Command::AddCustomer {
            name,
            email,
            address,
            dob,
        } => {
            let fields = NewCustomer {
                name,
                email,
                address,
                dob,
            };
            add_customer(ledger, fields, format, out)
        }
        Command::Earn(args) => earn(ledger, &args, format, out),
        Command::Redeem {
            adjust,
            allow_clamp,
        } => redeem(ledger, &adjust, allow_clamp, format, out),
        Command::UpdateProfile {
            id,
            name,
            address,
            clear_address,
            dob,
            clear_dob,
        } => {
            let current = find_customer(ledger, &id)?;
            let update = ProfileUpdate {
                name: name.unwrap_or_else(|| current.name.clone()),
                address: if clear_address {
                    None
                } else {
                    address.or_else(|| current.address.clone())
                },
                dob: if clear_dob { None } else { dob.or(current.dob) },
            };
            update_profile(ledger, &id, &update, format, out)
        }
        Command::Dashboard => dashboard(ledger, format, out),
        Command::Rewards => list_rewards(ledger, format, out),
        Command::Export { out: path } => export(ledger, path, format, out),
    }
}

fn find_customer<'a, S: BlobStore>(
    ledger: &'a LedgerStore<S>,
    id: &CustomerId,
) -> Result<&'a Customer> {
    ledger
        .customer(id)
        .with_context(|| format!("no customer with id {id}"))
}

fn list_customers<S: BlobStore>(
    ledger: &LedgerStore<S>,
    filter: &CustomerFilter,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let matches = ledger.search(filter);
    tracing::debug!(matches = matches.len(), ?filter, "Customer search");

    match format {
        OutputFormat::Json => {
            let rows: Vec<CustomerRow<'_>> = matches
                .iter()
                .map(|c| CustomerRow {
                    customer: c,
                    tier: &ledger.policy().tier_of(c.points).name,
                })
                .collect();
            render::json(out, &rows)?;
        }
        OutputFormat::Text => render::customer_table(out, &matches, ledger.policy())?,
    }
    Ok(())
}

fn show_customer<S: BlobStore>(
    ledger: &LedgerStore<S>,
    id: &CustomerId,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let summary = ledger
        .summary(id)
        .with_context(|| format!("no customer with id {id}"))?;
    let history = ledger.history(id);

    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({ "summary": summary, "history": history });
            render::json(out, &body)?;
        }
        OutputFormat::Text => render::customer_detail(out, &summary, &history)?,
    }
    Ok(())
}

fn add_customer<S: BlobStore>(
    ledger: &mut LedgerStore<S>,
    fields: NewCustomer,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let customer = ledger.add_customer(fields)?;
    match format {
        OutputFormat::Json => render::json(out, &customer)?,
        OutputFormat::Text => writeln!(out, "Enrolled {} ({})", customer.name, customer.id)?,
    }
    Ok(())
}

fn earn<S: BlobStore>(
    ledger: &mut LedgerStore<S>,
    args: &AdjustArgs,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    find_customer(ledger, &args.id)?;
    let adjustment = ledger
        .add_points(&args.id, args.amount, &args.note)?
        .with_context(|| format!("no customer with id {}", args.id))?;
    print_adjustment(ledger, &adjustment, format, out)
}

fn redeem<S: BlobStore>(
    ledger: &mut LedgerStore<S>,
    args: &AdjustArgs,
    allow_clamp: bool,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let customer = find_customer(ledger, &args.id)?;
    if !allow_clamp {
        if let Ok(requested) = u64::try_from(args.amount) {
            if requested > customer.points {
                bail!(
                    "{} has {} points, not enough to redeem {requested} (pass --allow-clamp to redeem anyway)",
                    customer.name,
                    customer.points
                );
            }
        }
    }

    let adjustment = ledger
        .subtract_points(&args.id, args.amount, &args.note)?
        .with_context(|| format!("no customer with id {}", args.id))?;
    print_adjustment(ledger, &adjustment, format, out)
}

fn print_adjustment<S: BlobStore>(
    ledger: &LedgerStore<S>,
    adjustment: &Adjustment,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    if format == OutputFormat::Json {
        render::json(out, adjustment)?;
        return Ok(());
    }

    let tx = &adjustment.transaction;
    let name = ledger
        .customer(&tx.customer_id)
        .map_or("customer", |c| c.name.as_str());
    writeln!(
        out,
        "{} {} points for {name}: {} -> {} ({})",
        capitalized(&tx.kind.to_string()),
        tx.amount,
        adjustment.balance_before,
        adjustment.balance_after,
        ledger.policy().tier_of(adjustment.balance_after).name
    )?;
    if adjustment.was_clamped() {
        writeln!(
            out,
            "Balance covered only {} of {} points; it is now zero.",
            adjustment.applied(),
            tx.amount
        )?;
    }
    Ok(())
}

fn update_profile<S: BlobStore>(
    ledger: &mut LedgerStore<S>,
    id: &CustomerId,
    update: &ProfileUpdate,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let customer = ledger
        .update_profile(id, update)?
        .with_context(|| format!("no customer with id {id}"))?;
    match format {
        OutputFormat::Json => render::json(out, &customer)?,
        OutputFormat::Text => writeln!(out, "Updated profile for {} ({})", customer.name, customer.id)?,
    }
    Ok(())
}

fn dashboard<S: BlobStore>(
    ledger: &LedgerStore<S>,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let stats = ledger.dashboard();
    match format {
        OutputFormat::Json => render::json(out, &stats)?,
        OutputFormat::Text => render::dashboard(out, &stats, ledger.customers())?,
    }
    Ok(())
}

fn list_rewards<S: BlobStore>(
    ledger: &LedgerStore<S>,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let rewards = rewards_by_cost(ledger.rewards());
    match format {
        OutputFormat::Json => {
            let rows: Vec<RewardRow<'_>> = rewards
                .iter()
                .map(|r| RewardRow {
                    reward: r,
                    required_tier: ledger.policy().required_tier(r.points_cost).plus_label(),
                })
                .collect();
            render::json(out, &rows)?;
        }
        OutputFormat::Text => render::rewards(out, &rewards, ledger.policy())?,
    }
    Ok(())
}

fn export<S: BlobStore>(
    ledger: &LedgerStore<S>,
    path: Option<PathBuf>,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let path = path.unwrap_or_else(|| PathBuf::from(export_file_name(today())));
    std::fs::write(&path, ledger.export_csv())
        .with_context(|| format!("writing {}", path.display()))?;

    let count = ledger.customers().len();
    tracing::info!(path = %path.display(), customers = count, "Customers exported");

    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({ "path": path, "customers": count });
            render::json(out, &body)?;
        }
        OutputFormat::Text => writeln!(out, "Exported {count} customers to {}", path.display())?,
    }
    Ok(())
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use loyalty_store::MemoryStore;
    use tempfile::TempDir;

    use crate::cli::Cli;

    const OLIVIA: &str = "01HF8Z2K3M000000000000C001";
    const SOFIA: &str = "01HF8Z2K3M000000000000C005";

    fn seeded() -> LedgerStore<MemoryStore> {
        LedgerStore::open(MemoryStore::new())
    }

    fn run(ledger: &mut LedgerStore<MemoryStore>, args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("loyalty").chain(args.iter().copied()))?;
        let format = cli.output_format();
        let mut out = Vec::new();
        execute(ledger, cli.command, format, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    fn points(ledger: &LedgerStore<MemoryStore>, id: &str) -> u64 {
        ledger.customer(&id.parse().unwrap()).unwrap().points
    }

    #[test]
    fn earn_updates_balance_and_reports_tier() {
        let mut ledger = seeded();
        let text = run(&mut ledger, &["earn", SOFIA, "400", "--note", "Spring promo"]).unwrap();

        assert_eq!(points(&ledger, SOFIA), 550);
        assert!(text.contains("150 -> 550 (Silver)"), "{text}");
        assert_eq!(ledger.transactions()[0].note, "Spring promo");
    }

    #[test]
    fn redeem_above_balance_is_refused() {
        let mut ledger = seeded();
        let before = ledger.transactions().len();

        let err = run(&mut ledger, &["redeem", SOFIA, "500"]).unwrap_err();

        assert!(err.to_string().contains("--allow-clamp"));
        assert_eq!(points(&ledger, SOFIA), 150);
        assert_eq!(ledger.transactions().len(), before);
    }

    #[test]
    fn redeem_with_allow_clamp_stops_at_zero() {
        let mut ledger = seeded();
        let text = run(&mut ledger, &["redeem", SOFIA, "500", "--allow-clamp"]).unwrap();

        assert_eq!(points(&ledger, SOFIA), 0);
        assert_eq!(ledger.transactions()[0].amount, 500);
        assert!(text.contains("covered only 150 of 500"), "{text}");
    }

    #[test]
    fn non_positive_amount_is_an_error() {
        let mut ledger = seeded();
        assert!(run(&mut ledger, &["earn", OLIVIA, "0"]).is_err());
        assert!(run(&mut ledger, &["redeem", OLIVIA, "-10"]).is_err());
        assert_eq!(points(&ledger, OLIVIA), 1250);
    }

    #[test]
    fn unknown_customer_is_reported() {
        let mut ledger = seeded();
        let stranger = CustomerId::generate().to_string();
        let err = run(&mut ledger, &["earn", &stranger, "10"]).unwrap_err();
        assert!(err.to_string().contains("no customer"));
    }

    #[test]
    fn customers_filters_by_tier_as_json() {
        let mut ledger = seeded();
        let text = run(&mut ledger, &["customers", "--tier", "silver", "--json"]).unwrap();
        let rows: serde_json::Value = serde_json::from_str(&text).unwrap();

        let names: Vec<_> = rows
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["Daniel Okafor", "Marcus Chen"]);
        assert_eq!(rows[0]["tier"], "Silver");
        assert_eq!(rows[0]["joinDate"], "2024-08-11");
    }

    #[test]
    fn add_customer_then_show() {
        let mut ledger = seeded();
        run(
            &mut ledger,
            &["add-customer", "--name", "Ada Lovelace", "--email", "ada@engine.org"],
        )
        .unwrap();

        let id = ledger.customers()[0].id.to_string();
        let text = run(&mut ledger, &["show", &id]).unwrap();
        assert!(text.starts_with("Ada Lovelace <ada@engine.org>"));
        assert!(text.contains("No transactions yet."));
    }

    #[test]
    fn update_profile_keeps_unspecified_fields() {
        let mut ledger = seeded();
        run(&mut ledger, &["update-profile", OLIVIA, "--name", "Olivia B."]).unwrap();

        let olivia = ledger.customer(&OLIVIA.parse().unwrap()).unwrap();
        assert_eq!(olivia.name, "Olivia B.");
        assert_eq!(olivia.address.as_deref(), Some("1 Harbor Lane, Portland, ME"));
        assert!(olivia.dob.is_some());

        run(&mut ledger, &["update-profile", OLIVIA, "--clear-address"]).unwrap();
        let olivia = ledger.customer(&OLIVIA.parse().unwrap()).unwrap();
        assert_eq!(olivia.address, None);
        assert_eq!(olivia.name, "Olivia B.");
    }

    #[test]
    fn rewards_are_listed_cheapest_first_with_tier_labels() {
        let mut ledger = seeded();
        let text = run(&mut ledger, &["rewards", "--json"]).unwrap();
        let rows: serde_json::Value = serde_json::from_str(&text).unwrap();
        let rows = rows.as_array().unwrap();

        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0]["pointsCost"], 150);
        assert_eq!(rows[0]["requiredTier"], "Bronze+");
        assert_eq!(rows[5]["requiredTier"], "Gold+");
    }

    #[test]
    fn dashboard_json_has_totals() {
        let mut ledger = seeded();
        let text = run(&mut ledger, &["dashboard", "--json"]).unwrap();
        let stats: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(stats["customerCount"], 6);
        assert_eq!(stats["totalPoints"], 3340);
        assert_eq!(stats["topCustomers"][0]["name"], "Olivia Bennett");
    }

    #[test]
    fn export_writes_csv_file() {
        let mut ledger = seeded();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let text = run(&mut ledger, &["export", "--out", path.to_str().unwrap()]).unwrap();

        assert!(text.starts_with("Exported 6 customers"));
        let csv = std::fs::read_to_string(&path).unwrap();
        assert_eq!(csv.lines().count(), 7);
        assert!(csv.starts_with("\"Name\",\"Email\""));
    }

    #[test]
    fn capitalizes_kind() {
        assert_eq!(capitalized("earned"), "Earned");
        assert_eq!(capitalized(""), "");
    }
}
