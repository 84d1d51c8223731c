//! Column family definitions for the `RocksDB` backend.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Slot documents, keyed by slot key. Value is the UTF-8 JSON document.
    pub const SLOTS: &str = "slots";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::SLOTS]
}
