//! Read-side views over the ledger: customer standing, dashboard figures, and
//! customer search.
//!
//! Everything here borrows from the ledger's collections and keeps their stored
//! order; nothing is re-sorted by date.

use serde::Serialize;

use loyalty_core::{total_for, Customer, PointsTransaction, TierBand, TierPolicy, TransactionKind};

/// How many customers the dashboard ranks.
pub const TOP_CUSTOMERS: usize = 5;

/// How many transactions the dashboard lists.
pub const RECENT_TRANSACTIONS: usize = 5;

/// A customer's tier standing and lifetime totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary<'a> {
    /// The customer record.
    pub customer: &'a Customer,
    /// Current tier.
    pub tier: &'a TierBand,
    /// Next tier up, if any.
    pub next_tier: Option<&'a TierBand>,
    /// Percent of the way to the next tier (100 at the top).
    pub progress: u8,
    /// Points still needed for the next tier.
    pub points_to_next: Option<u64>,
    /// Sum of all earned transactions.
    pub total_earned: u64,
    /// Sum of all redeemed transactions, as recorded.
    pub total_redeemed: u64,
}

impl<'a> CustomerSummary<'a> {
    /// Summarize one customer.
    #[must_use]
    pub fn for_customer(
        customer: &'a Customer,
        transactions: &'a [PointsTransaction],
        policy: &'a TierPolicy,
    ) -> Self {
        Self {
            customer,
            tier: policy.tier_of(customer.points),
            next_tier: policy.next_tier_of(customer.points),
            progress: policy.progress_to_next(customer.points),
            points_to_next: policy.points_to_next(customer.points),
            total_earned: total_for(transactions, &customer.id, TransactionKind::Earned),
            total_redeemed: total_for(transactions, &customer.id, TransactionKind::Redeemed),
        }
    }
}

/// Number of customers currently in a tier.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierCount<'a> {
    /// The tier.
    pub tier: &'a TierBand,
    /// Customers whose balance falls in it.
    pub customers: usize,
}

/// Program-wide figures.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats<'a> {
    /// Enrolled customers.
    pub customer_count: usize,
    /// Sum of all current balances.
    pub total_points: u64,
    /// Sum of all earned transactions.
    pub total_earned: u64,
    /// Sum of all redeemed transactions.
    pub total_redeemed: u64,
    /// Customers per tier, lowest tier first.
    pub tier_counts: Vec<TierCount<'a>>,
    /// Highest balances first; ties keep stored order.
    pub top_customers: Vec<&'a Customer>,
    /// Most recent transactions in stored order.
    pub recent_transactions: Vec<&'a PointsTransaction>,
}

impl<'a> DashboardStats<'a> {
    /// Compute the dashboard.
    #[must_use]
    pub fn compute(
        customers: &'a [Customer],
        transactions: &'a [PointsTransaction],
        policy: &'a TierPolicy,
    ) -> Self {
        let sum_kind = |kind: TransactionKind| {
            transactions
                .iter()
                .filter(|t| t.kind == kind)
                .map(|t| t.amount)
                .fold(0, u64::saturating_add)
        };

        let tier_counts = policy
            .bands()
            .iter()
            .map(|tier| TierCount {
                tier,
                customers: customers
                    .iter()
                    .filter(|c| policy.tier_of(c.points).name == tier.name)
                    .count(),
            })
            .collect();

        let mut top_customers: Vec<&Customer> = customers.iter().collect();
        top_customers.sort_by(|a, b| b.points.cmp(&a.points));
        top_customers.truncate(TOP_CUSTOMERS);

        Self {
            customer_count: customers.len(),
            total_points: customers
                .iter()
                .map(|c| c.points)
                .fold(0, u64::saturating_add),
            total_earned: sum_kind(TransactionKind::Earned),
            total_redeemed: sum_kind(TransactionKind::Redeemed),
            tier_counts,
            top_customers,
            recent_transactions: transactions.iter().take(RECENT_TRANSACTIONS).collect(),
        }
    }
}

/// Search criteria for the customer list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerFilter {
    /// Case-insensitive substring of name or email.
    pub query: Option<String>,
    /// Tier name; `None` or `"All"` matches every tier.
    pub tier: Option<String>,
}

impl CustomerFilter {
    /// Filter on a search string.
    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Filter on a tier name.
    #[must_use]
    pub fn tier(mut self, tier: impl Into<String>) -> Self {
        self.tier = Some(tier.into());
        self
    }

    /// Customers matching the filter, in stored order.
    #[must_use]
    pub fn apply<'a>(&self, customers: &'a [Customer], policy: &TierPolicy) -> Vec<&'a Customer> {
        let query = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty());
        let tier = self
            .tier
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("all"));

        customers
            .iter()
            .filter(|c| query.map_or(true, |q| c.matches(q)))
            .filter(|c| {
                tier.map_or(true, |t| policy.tier_of(c.points).name.eq_ignore_ascii_case(t))
            })
            .collect()
    }
}
