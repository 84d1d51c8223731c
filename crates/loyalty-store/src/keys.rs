//! Slot keys.
//!
//! Keys are fixed strings shared with earlier front-end versions, so data
//! they stored is picked up unchanged.

use std::fmt;

use crate::error::{Result, StoreError};

/// The collections the ledger persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Customer records.
    Customers,
    /// Points transactions, most recent first.
    Transactions,
    /// Rewards catalog (read-only).
    Rewards,
}

impl Slot {
    /// Every slot, in load order.
    pub const ALL: [Slot; 3] = [Slot::Customers, Slot::Transactions, Slot::Rewards];

    /// The storage key for this slot.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Customers => "rp_customers",
            Self::Transactions => "rp_transactions",
            Self::Rewards => "rp_rewards",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Check that a key is safe to use as a file name.
///
/// # Errors
///
/// Returns [`StoreError::InvalidKey`] for empty keys or keys with characters
/// other than ASCII letters, digits, `_`, and `-`.
pub fn validate_key(key: &str) -> Result<()> {
    let ok = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_keys_are_stable() {
        assert_eq!(Slot::Customers.key(), "rp_customers");
        assert_eq!(Slot::Transactions.key(), "rp_transactions");
        assert_eq!(Slot::Rewards.key(), "rp_rewards");
    }

    #[test]
    fn slot_keys_are_valid() {
        for slot in Slot::ALL {
            validate_key(slot.key()).unwrap();
        }
    }

    #[test]
    fn rejects_path_like_keys() {
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("with space").is_err());
    }
}
