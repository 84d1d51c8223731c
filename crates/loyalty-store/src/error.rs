//! Error types for loyalty slot storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Filesystem operation failed.
    #[error("io error on {path}: {source}")]
    Io {
        /// The file or directory involved.
        path: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Stored bytes are not valid UTF-8 text.
    #[error("slot {key} does not hold text")]
    NotText {
        /// The slot key.
        key: String,
    },

    /// Key cannot be used as a slot name.
    #[error("invalid slot key: {0}")]
    InvalidKey(String),
}
