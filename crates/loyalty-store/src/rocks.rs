//! `RocksDB` storage backend.
//!
//! Slots live in the `slots` column family, one key per slot. Writes are
//! synced to the WAL before returning so that a reported success survives a
//! crash.

use std::path::Path;
use std::sync::Arc;

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, MultiThreaded, Options,
    WriteOptions,
};

use crate::error::{Result, StoreError};
use crate::keys::validate_key;
use crate::schema::{all_column_families, cf};
use crate::BlobStore;

type Db = DBWithThreadMode<MultiThreaded>;

/// A [`BlobStore`] backed by a `RocksDB` database.
pub struct RocksStore {
    db: Arc<Db>,
}

impl RocksStore {
    /// Open or create a database at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let families = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()));

        let db = Db::open_cf_descriptors(&opts, path, families).map_err(db_error)?;

        tracing::debug!(path = %path.display(), "Opened RocksDB store");
        Ok(Self { db: Arc::new(db) })
    }

    fn slots(&self) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(cf::SLOTS)
            .ok_or_else(|| StoreError::Database(format!("missing column family {}", cf::SLOTS)))
    }
}

fn db_error(e: rocksdb::Error) -> StoreError {
    StoreError::Database(e.into_string())
}

impl BlobStore for RocksStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let Some(bytes) = self.db.get_cf(&self.slots()?, key).map_err(db_error)? else {
            return Ok(None);
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|_| StoreError::NotText { key: key.to_string() })
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        let mut opts = WriteOptions::default();
        opts.set_sync(true);
        self.db
            .put_cf_opt(&self.slots()?, key, value, &opts)
            .map_err(db_error)?;
        tracing::debug!(key, bytes = value.len(), "Slot written");
        Ok(())
    }
}
