//! Output rendering: aligned text for terminals, pretty JSON for scripts.

use std::io::{self, Write};

use serde::Serialize;

use loyalty_core::{Customer, PointsTransaction, Reward, TierPolicy};
use loyalty_ledger::{CustomerSummary, DashboardStats};

/// How command results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Write a value as pretty JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

/// The customer list as a table.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn customer_table(
    out: &mut dyn Write,
    customers: &[&Customer],
    policy: &TierPolicy,
) -> io::Result<()> {
    if customers.is_empty() {
        return writeln!(out, "No customers found.");
    }

    writeln!(
        out,
        "{:<26}  {:<22}  {:<30}  {:>7}  {:<8}  JOINED",
        "ID", "NAME", "EMAIL", "POINTS", "TIER"
    )?;
    for c in customers {
        writeln!(
            out,
            "{:<26}  {:<22}  {:<30}  {:>7}  {:<8}  {}",
            c.id,
            c.name,
            c.email,
            c.points,
            policy.tier_of(c.points).name,
            c.join_date
        )?;
    }
    Ok(())
}

/// One customer's profile, standing, and history.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn customer_detail(
    out: &mut dyn Write,
    summary: &CustomerSummary<'_>,
    history: &[&PointsTransaction],
) -> io::Result<()> {
    let c = summary.customer;
    writeln!(out, "{} <{}>", c.name, c.email)?;
    writeln!(out, "  id        {}", c.id)?;
    writeln!(out, "  joined    {}", c.join_date)?;
    if let Some(address) = &c.address {
        writeln!(out, "  address   {address}")?;
    }
    if let Some(dob) = c.dob {
        writeln!(out, "  born      {dob}")?;
    }
    writeln!(out, "  points    {} ({})", c.points, summary.tier.name)?;
    match (summary.next_tier, summary.points_to_next) {
        (Some(next), Some(needed)) => writeln!(
            out,
            "  next      {} in {needed} points ({}%)",
            next.name, summary.progress
        )?,
        _ => writeln!(out, "  next      top tier reached")?,
    }
    writeln!(out, "  earned    {}", summary.total_earned)?;
    writeln!(out, "  redeemed  {}", summary.total_redeemed)?;

    writeln!(out)?;
    if history.is_empty() {
        return writeln!(out, "No transactions yet.");
    }
    writeln!(out, "History")?;
    for tx in history {
        transaction_line(out, tx, None)?;
    }
    Ok(())
}

/// Program-wide figures.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn dashboard(
    out: &mut dyn Write,
    stats: &DashboardStats<'_>,
    customers: &[Customer],
) -> io::Result<()> {
    writeln!(out, "Customers       {}", stats.customer_count)?;
    writeln!(out, "Points held     {}", stats.total_points)?;
    writeln!(out, "Points earned   {}", stats.total_earned)?;
    writeln!(out, "Points redeemed {}", stats.total_redeemed)?;

    writeln!(out)?;
    writeln!(out, "Tiers")?;
    for count in &stats.tier_counts {
        writeln!(out, "  {:<8} {}", count.tier.name, count.customers)?;
    }

    writeln!(out)?;
    writeln!(out, "Top customers")?;
    for (rank, c) in stats.top_customers.iter().enumerate() {
        writeln!(out, "  {}. {:<22} {:>7}", rank + 1, c.name, c.points)?;
    }

    writeln!(out)?;
    writeln!(out, "Recent activity")?;
    for tx in &stats.recent_transactions {
        let name = customers
            .iter()
            .find(|c| c.id == tx.customer_id)
            .map(|c| c.name.as_str());
        transaction_line(out, tx, name)?;
    }
    Ok(())
}

/// The rewards catalog with the tier each reward is aimed at.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn rewards(out: &mut dyn Write, rewards: &[&Reward], policy: &TierPolicy) -> io::Result<()> {
    for r in rewards {
        writeln!(
            out,
            "{} {:<18} {:>6} pts  {:<8} {}",
            r.icon,
            r.name,
            r.points_cost,
            policy.required_tier(r.points_cost).plus_label(),
            r.description
        )?;
    }
    Ok(())
}

fn transaction_line(
    out: &mut dyn Write,
    tx: &PointsTransaction,
    customer: Option<&str>,
) -> io::Result<()> {
    let signed = format!("{}{}", tx.kind.sign(), tx.amount);
    match customer {
        Some(name) => writeln!(out, "  {}  {signed:>7}  {name:<22} {}", tx.date, tx.note),
        None => writeln!(out, "  {}  {signed:>7}  {}", tx.date, tx.note),
    }
}
