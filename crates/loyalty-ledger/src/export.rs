//! CSV export of the customer list.

use chrono::NaiveDate;

use loyalty_core::{total_for, Customer, PointsTransaction, TierPolicy, TransactionKind};

/// Column headers, in output order.
pub const CSV_HEADERS: [&str; 7] = [
    "Name",
    "Email",
    "Join Date",
    "Points",
    "Tier",
    "Total Earned",
    "Total Redeemed",
];

/// Render customers as CSV, one row per customer in stored order.
///
/// Every value is double-quoted; embedded quotes are doubled. Rows are joined
/// with `\n` and there is no trailing newline.
#[must_use]
pub fn export_customers_csv(
    customers: &[Customer],
    transactions: &[PointsTransaction],
    policy: &TierPolicy,
) -> String {
    let mut rows = Vec::with_capacity(customers.len() + 1);
    rows.push(csv_row(CSV_HEADERS));

    for customer in customers {
        let earned = total_for(transactions, &customer.id, TransactionKind::Earned);
        let redeemed = total_for(transactions, &customer.id, TransactionKind::Redeemed);
        rows.push(csv_row([
            customer.name.clone(),
            customer.email.clone(),
            customer.join_date.to_string(),
            customer.points.to_string(),
            policy.tier_of(customer.points).name.clone(),
            earned.to_string(),
            redeemed.to_string(),
        ]));
    }

    rows.join("\n")
}

/// Download name for an export made on `date`, e.g. `customers_2024-06-01.csv`.
#[must_use]
pub fn export_file_name(date: NaiveDate) -> String {
    format!("customers_{}.csv", date.format("%Y-%m-%d"))
}

fn csv_row<I>(fields: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fields
        .into_iter()
        .map(|f| format!("\"{}\"", f.as_ref().replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",")
}
