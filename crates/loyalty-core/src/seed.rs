//! Seed dataset used when durable storage holds nothing usable.
//!
//! The data ships inside the binary as JSON in the same shape as stored slots.
//! Collections are in stored order: newest customers and transactions first.

use serde::de::DeserializeOwned;

use crate::{Customer, PointsTransaction, Reward};

const CUSTOMERS_JSON: &str = include_str!("../seed/customers.json");
const TRANSACTIONS_JSON: &str = include_str!("../seed/transactions.json");
const REWARDS_JSON: &str = include_str!("../seed/rewards.json");

/// Seed customers.
#[must_use]
pub fn customers() -> Vec<Customer> {
    parse("customers", CUSTOMERS_JSON)
}

/// Seed transactions, most recent first.
#[must_use]
pub fn transactions() -> Vec<PointsTransaction> {
    parse("transactions", TRANSACTIONS_JSON)
}

/// Seed rewards catalog.
#[must_use]
pub fn rewards() -> Vec<Reward> {
    parse("rewards", REWARDS_JSON)
}

fn parse<T: DeserializeOwned>(name: &str, raw: &str) -> Vec<T> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::error!(seed = name, error = %e, "Bundled seed data is malformed");
        Vec::new()
    })
}
