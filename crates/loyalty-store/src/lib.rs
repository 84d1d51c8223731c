//! Durable slot storage for the loyalty ledger.
//!
//! The ledger persists each collection as one JSON document under a fixed key
//! (a *slot*). This crate defines the [`BlobStore`] port the ledger writes
//! through, and the backends that implement it:
//!
//! - [`MemoryStore`]: process-local map, used by tests and throwaway sessions
//! - [`FileStore`]: one `<key>.json` file per slot in a data directory
//! - `RocksStore`: a `slots` column family in `RocksDB` (feature `rocksdb-backend`)
//!
//! # Example
//!
//! ```no_run
//! use loyalty_store::{BlobStore, FileStore, Slot};
//!
//! let store = FileStore::open("/tmp/loyalty-data").unwrap();
//! store.write(Slot::Customers.key(), "[]").unwrap();
//! let raw = store.read(Slot::Customers.key()).unwrap();
//! assert_eq!(raw.as_deref(), Some("[]"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod file;
pub mod keys;
pub mod memory;
#[cfg(feature = "rocksdb-backend")]
pub mod rocks;
#[cfg(feature = "rocksdb-backend")]
pub mod schema;

pub use error::{Result, StoreError};
pub use file::FileStore;
pub use keys::Slot;
pub use memory::MemoryStore;
#[cfg(feature = "rocksdb-backend")]
pub use rocks::RocksStore;

/// A durable key-value store of text blobs.
///
/// Reads and writes are synchronous; a successful `write` must be visible to
/// the next `read` of the same key.
pub trait BlobStore: Send + Sync {
    /// Read the blob stored under `key`, or `None` if nothing was ever written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

impl<S: BlobStore + ?Sized> BlobStore for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }
}

impl<S: BlobStore + ?Sized> BlobStore for std::sync::Arc<S> {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }
}
