//! Identifier types for the loyalty ledger.
//!
//! Customers and transactions get ULIDs, which are unique without
//! coordination and sort roughly by creation time. Catalog rewards get UUIDs.
//!
//! Ids are opaque to the ledger. Records written before ULIDs were introduced
//! carry ids such as `c_1700000000000`; any non-empty id string that is not a
//! ULID/UUID is kept verbatim so those records stay readable.
//!
//! All three share one macro so that parsing, display, and the serde string
//! form behave the same way; only the inner value type differs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;
use uuid::Uuid;

/// A generated value, or an id string carried over from older records.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Repr<T> {
    Native(T),
    Legacy(Box<str>),
}

impl<T: fmt::Display> fmt::Display for Repr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(value) => fmt::Display::fmt(value, f),
            Self::Legacy(raw) => f.write_str(raw),
        }
    }
}

/// Define a string-serialized identifier newtype.
///
/// `$parse` turns trimmed input into the inner value or `None`, in which case
/// the input is kept as a legacy id.
macro_rules! id_type {
    (
        $(#[$meta:meta])*
        $name:ident($inner:ty) {
            generate: $generate:expr,
            parse: $parse:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Repr<$inner>);

        impl $name {
            /// Wrap an existing value.
            #[must_use]
            pub const fn new(inner: $inner) -> Self {
                Self(Repr::Native(inner))
            }

            /// A fresh, unique identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(Repr::Native($generate))
            }

            /// The wrapped value, or `None` for a legacy id.
            #[must_use]
            pub const fn native(&self) -> Option<&$inner> {
                match &self.0 {
                    Repr::Native(value) => Some(value),
                    Repr::Legacy(_) => None,
                }
            }

            /// Whether this id came from an older record format.
            #[must_use]
            pub const fn is_legacy(&self) -> bool {
                matches!(self.0, Repr::Legacy(_))
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                if s.is_empty() {
                    return Err(IdError::Empty);
                }
                let parse: fn(&str) -> Option<$inner> = $parse;
                Ok(Self(parse(s).map_or_else(|| Repr::Legacy(s.into()), Repr::Native)))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&format_args!("{}", self.0)).finish()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0.to_string()
            }
        }
    };
}

id_type! {
    /// A customer identifier (ULID), assigned when the customer is enrolled.
    CustomerId(Ulid) {
        generate: Ulid::new(),
        parse: |s| Ulid::from_string(s).ok(),
    }
}

id_type! {
    /// A points transaction identifier (ULID).
    ///
    /// Time-ordered, so ids of later transactions usually sort after earlier ones.
    TransactionId(Ulid) {
        generate: Ulid::new(),
        parse: |s| Ulid::from_string(s).ok(),
    }
}

id_type! {
    /// A rewards catalog entry identifier (UUID).
    RewardId(Uuid) {
        generate: Uuid::new_v4(),
        parse: |s| Uuid::parse_str(s).ok(),
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is empty or only whitespace.
    #[error("identifier is empty")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_id_parses_its_display_form() {
        let id = CustomerId::generate();
        let parsed = CustomerId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn customer_id_serializes_as_plain_string() {
        let id = CustomerId::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let parsed: CustomerId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = TransactionId::generate();
        let b = TransactionId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn debug_names_the_type() {
        let id: CustomerId = "01HF8Z2K3M000000000000C001".parse().unwrap();
        assert_eq!(format!("{id:?}"), "CustomerId(01HF8Z2K3M000000000000C001)");
        assert_eq!(id.native().unwrap().to_string(), id.to_string());
    }

    #[test]
    fn legacy_timestamp_ids_are_kept_verbatim() {
        let id = CustomerId::from_str(" c_1700000000000 ").unwrap();
        assert!(id.is_legacy());
        assert!(id.native().is_none());
        assert_eq!(id.to_string(), "c_1700000000000");

        let tx: TransactionId = serde_json::from_str("\"t_1700000000000\"").unwrap();
        assert_eq!(serde_json::to_string(&tx).unwrap(), "\"t_1700000000000\"");
    }

    #[test]
    fn blank_ids_are_rejected() {
        assert_eq!(CustomerId::from_str("   "), Err(IdError::Empty));
        assert!(serde_json::from_str::<RewardId>("\"\"").is_err());
    }

    #[test]
    fn reward_id_parses_with_surrounding_whitespace() {
        let id = RewardId::generate();
        let parsed: RewardId = format!("  {id} ").parse().unwrap();
        assert_eq!(id, parsed);
        assert!(!parsed.is_legacy());
        assert!(RewardId::from_str("r1").unwrap().is_legacy());
    }
}
