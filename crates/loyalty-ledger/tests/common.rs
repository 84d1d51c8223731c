//! Common test utilities for ledger integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::TempDir;

use loyalty_core::{CustomerId, NewCustomer};
use loyalty_ledger::LedgerStore;
use loyalty_store::{BlobStore, FileStore, MemoryStore, Slot, StoreError};

/// Test harness holding a file-backed ledger and its data directory.
pub struct TestHarness {
    /// The ledger under test.
    pub ledger: LedgerStore<FileStore>,
    /// Temporary data directory (kept alive for test duration).
    pub temp_dir: TempDir,
}

impl TestHarness {
    /// A ledger over a fresh, empty data directory (loads the seed dataset).
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FileStore::open(temp_dir.path()).expect("Failed to open store");
        Self {
            ledger: LedgerStore::open(store),
            temp_dir,
        }
    }

    /// A ledger whose customer and transaction slots start out empty.
    pub fn empty() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FileStore::open(temp_dir.path()).expect("Failed to open store");
        store.write(Slot::Customers.key(), "[]").unwrap();
        store.write(Slot::Transactions.key(), "[]").unwrap();
        Self {
            ledger: LedgerStore::open(store),
            temp_dir,
        }
    }

    /// Open a second ledger over the same directory, as a restarted process would.
    pub fn reopen(&self) -> LedgerStore<FileStore> {
        LedgerStore::open(FileStore::open(self.temp_dir.path()).unwrap())
    }

    /// Enroll a customer and give them an opening balance.
    pub fn customer_with_points(&mut self, name: &str, points: i64) -> CustomerId {
        let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
        let id = self
            .ledger
            .add_customer(NewCustomer::new(name, email))
            .unwrap()
            .id;
        if points > 0 {
            self.ledger.add_points(&id, points, "Opening balance").unwrap();
        }
        id
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// A store whose writes can be switched to fail.
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_writes: AtomicBool,
    pub fail_key: std::sync::Mutex<Option<&'static str>>,
    /// Writes left before every write fails; `usize::MAX` means unlimited.
    pub writes_left: AtomicUsize,
}

impl Default for FlakyStore {
    fn default() -> Self {
        Self {
            inner: MemoryStore::default(),
            fail_writes: AtomicBool::new(false),
            fail_key: std::sync::Mutex::new(None),
            writes_left: AtomicUsize::new(usize::MAX),
        }
    }
}

impl FlakyStore {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Let `n` more writes succeed, then fail every write.
    pub fn fail_after(&self, n: usize) {
        self.writes_left.store(n, Ordering::SeqCst);
    }

    /// Make every write fail.
    pub fn fail_all_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Make writes to one slot fail.
    pub fn fail_slot(&self, slot: Slot) {
        *self.fail_key.lock().unwrap() = Some(slot.key());
    }
}

impl BlobStore for FlakyStore {
    fn read(&self, key: &str) -> loyalty_store::Result<Option<String>> {
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: &str) -> loyalty_store::Result<()> {
        let slot_fails = *self.fail_key.lock().unwrap() == Some(key);
        let exhausted = self
            .writes_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| match n {
                usize::MAX => Some(n),
                0 => None,
                _ => Some(n - 1),
            })
            .is_err();
        if self.fail_writes.load(Ordering::SeqCst) || slot_fails || exhausted {
            return Err(StoreError::Database("disk full".into()));
        }
        self.inner.write(key, value)
    }
}
