//! Points transaction types for the loyalty ledger.
//!
//! Every change to a customer's balance is justified by a transaction record.
//! Records are immutable once created.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{LoyaltyError, Result};
use crate::{CustomerId, TransactionId};

/// Note recorded when an adjustment is made without one.
pub const DEFAULT_NOTE: &str = "Manual adjustment";

/// A single earn or redeem event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsTransaction {
    /// Unique transaction ID (ULID for time-ordering).
    pub id: TransactionId,

    /// The customer whose balance was affected.
    pub customer_id: CustomerId,

    /// Whether points were earned or redeemed.
    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Points requested. Always positive; the sign comes from `kind`.
    #[serde(deserialize_with = "positive_amount")]
    pub amount: u64,

    /// Free-text reason.
    pub note: String,

    /// Calendar date of the transaction.
    pub date: NaiveDate,
}

impl PointsTransaction {
    /// Create a new earn transaction.
    #[must_use]
    pub fn earned(customer_id: CustomerId, amount: PointsAmount, note: &str, date: NaiveDate) -> Self {
        Self::new(customer_id, TransactionKind::Earned, amount, note, date)
    }

    /// Create a new redeem transaction.
    #[must_use]
    pub fn redeemed(customer_id: CustomerId, amount: PointsAmount, note: &str, date: NaiveDate) -> Self {
        Self::new(customer_id, TransactionKind::Redeemed, amount, note, date)
    }

    fn new(
        customer_id: CustomerId,
        kind: TransactionKind,
        amount: PointsAmount,
        note: &str,
        date: NaiveDate,
    ) -> Self {
        let note = note.trim();
        Self {
            id: TransactionId::generate(),
            customer_id,
            kind,
            amount: amount.get(),
            note: if note.is_empty() {
                DEFAULT_NOTE.to_string()
            } else {
                note.to_string()
            },
            date,
        }
    }
}

/// Stored amounts go through [`PointsAmount`] so a zero or negative record
/// fails to load.
fn positive_amount<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
    PointsAmount::deserialize(deserializer).map(PointsAmount::get)
}

/// Direction of a points transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Points added to the balance.
    Earned,

    /// Points taken from the balance.
    Redeemed,
}

impl TransactionKind {
    /// Sign used when displaying an amount of this kind.
    #[must_use]
    pub const fn sign(self) -> char {
        match self {
            Self::Earned => '+',
            Self::Redeemed => '-',
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Earned => f.write_str("earned"),
            Self::Redeemed => f.write_str("redeemed"),
        }
    }
}

/// A validated, strictly positive number of points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u64")]
pub struct PointsAmount(u64);

impl PointsAmount {
    /// Validate a raw amount.
    ///
    /// # Errors
    ///
    /// Returns [`LoyaltyError::InvalidAmount`] for zero or negative input.
    pub fn new(raw: i64) -> Result<Self> {
        match u64::try_from(raw) {
            Ok(value) if value > 0 => Ok(Self(value)),
            _ => Err(LoyaltyError::InvalidAmount(format!(
                "{raw} is not a positive number of points"
            ))),
        }
    }

    /// The amount as an unsigned integer.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<i64> for PointsAmount {
    type Error = LoyaltyError;

    fn try_from(raw: i64) -> Result<Self> {
        Self::new(raw)
    }
}

impl From<PointsAmount> for u64 {
    fn from(amount: PointsAmount) -> Self {
        amount.0
    }
}

impl FromStr for PointsAmount {
    type Err = LoyaltyError;

    fn from_str(s: &str) -> Result<Self> {
        let raw: i64 = s
            .trim()
            .parse()
            .map_err(|_| LoyaltyError::InvalidAmount(format!("{s:?} is not a whole number")))?;
        Self::new(raw)
    }
}

impl fmt::Display for PointsAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sum the amounts of one kind of transaction for a customer.
#[must_use]
pub fn total_for<'a>(
    transactions: impl IntoIterator<Item = &'a PointsTransaction>,
    customer_id: &CustomerId,
    kind: TransactionKind,
) -> u64 {
    transactions
        .into_iter()
        .filter(|t| t.customer_id == *customer_id && t.kind == kind)
        .map(|t| t.amount)
        .fold(0, u64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn earned_transaction() {
        let customer_id = CustomerId::generate();
        let amount = PointsAmount::new(150).unwrap();
        let tx = PointsTransaction::earned(customer_id.clone(), amount, "bonus", today());

        assert_eq!(tx.kind, TransactionKind::Earned);
        assert_eq!(tx.amount, 150);
        assert_eq!(tx.note, "bonus");
        assert_eq!(tx.customer_id, customer_id);
    }

    #[test]
    fn blank_note_gets_default() {
        let amount = PointsAmount::new(5).unwrap();
        let tx = PointsTransaction::redeemed(CustomerId::generate(), amount, "   ", today());
        assert_eq!(tx.note, DEFAULT_NOTE);
        assert_eq!(tx.kind.sign(), '-');
    }

    #[test]
    fn amount_must_be_positive() {
        assert!(PointsAmount::new(1).is_ok());
        assert!(matches!(PointsAmount::new(0), Err(LoyaltyError::InvalidAmount(_))));
        assert!(PointsAmount::new(-20).is_err());
    }

    #[test]
    fn amount_parses_from_form_input() {
        assert_eq!("  42 ".parse::<PointsAmount>().unwrap().get(), 42);
        assert!("abc".parse::<PointsAmount>().is_err());
        assert!("".parse::<PointsAmount>().is_err());
        assert!("-3".parse::<PointsAmount>().is_err());
        assert!("2.5".parse::<PointsAmount>().is_err());
    }

    #[test]
    fn stored_amount_must_be_positive() {
        let record = |amount: &str| {
            format!(
                r#"{{"id":"01HF8Z2K3M000000000000T001","customerId":"c_1","type":"earned","amount":{amount},"note":"n","date":"2024-06-01"}}"#
            )
        };
        let tx: PointsTransaction = serde_json::from_str(&record("40")).unwrap();
        assert_eq!(tx.amount, 40);
        assert!(serde_json::from_str::<PointsTransaction>(&record("0")).is_err());
        assert!(serde_json::from_str::<PointsTransaction>(&record("-5")).is_err());
    }

    #[test]
    fn kind_serializes_under_type_key() {
        let tx = PointsTransaction::earned(CustomerId::generate(), PointsAmount::new(7).unwrap(), "x", today());
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["type"], "earned");
        assert_eq!(value["date"], "2024-06-01");
        assert!(value.get("customerId").is_some());
    }

    #[test]
    fn totals_by_customer_and_kind() {
        let a = CustomerId::generate();
        let b = CustomerId::generate();
        let amt = |n| PointsAmount::new(n).unwrap();
        let txs = vec![
            PointsTransaction::earned(a.clone(), amt(100), "", today()),
            PointsTransaction::earned(a.clone(), amt(50), "", today()),
            PointsTransaction::redeemed(a.clone(), amt(30), "", today()),
            PointsTransaction::earned(b.clone(), amt(999), "", today()),
        ];
        assert_eq!(total_for(&txs, &a, TransactionKind::Earned), 150);
        assert_eq!(total_for(&txs, &a, TransactionKind::Redeemed), 30);
        assert_eq!(total_for(&txs, &b, TransactionKind::Redeemed), 0);
    }
}
