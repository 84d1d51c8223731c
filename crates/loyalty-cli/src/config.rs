//! CLI configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use loyalty_core::{LoyaltyError, Result, TierPolicy};
use loyalty_store::{BlobStore, FileStore, MemoryStore};

/// Storage backend for the ledger slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    /// One JSON file per slot in the data directory.
    #[default]
    File,
    /// Process memory. Every command starts from the seed dataset.
    Memory,
    /// A `RocksDB` database under the data directory.
    Rocksdb,
}

impl FromStr for Backend {
    type Err = LoyaltyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            "rocksdb" | "rocks" => Ok(Self::Rocksdb),
            other => Err(LoyaltyError::Configuration(format!(
                "unknown storage backend {other:?} (expected file, memory, or rocksdb)"
            ))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Memory => f.write_str("memory"),
            Self::Rocksdb => f.write_str("rocksdb"),
        }
    }
}

/// CLI configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Directory holding the slot files or database (default: ".loyalty").
    pub data_dir: PathBuf,

    /// Storage backend (default: file).
    pub backend: Backend,

    /// Optional JSON file with custom tiers (default: "loyalty.json").
    pub config_path: PathBuf,
}

/// Config file structure.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    tiers: Option<TierPolicy>,
}

impl CliConfig {
    /// Load configuration from `LOYALTY_DATA_DIR`, `LOYALTY_BACKEND`, and `LOYALTY_CONFIG`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let backend = match var("LOYALTY_BACKEND") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(value = %raw, error = %e, "Ignoring LOYALTY_BACKEND");
                defaults.backend
            }),
            None => defaults.backend,
        };

        Self {
            data_dir: var("LOYALTY_DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
            backend,
            config_path: var("LOYALTY_CONFIG").map_or(defaults.config_path, PathBuf::from),
        }
    }

    /// Apply command-line flags on top of the environment.
    #[must_use]
    pub fn with_overrides(
        mut self,
        data_dir: Option<PathBuf>,
        backend: Option<Backend>,
        config_path: Option<PathBuf>,
    ) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if let Some(backend) = backend {
            self.backend = backend;
        }
        if let Some(path) = config_path {
            self.config_path = path;
        }
        self
    }

    /// The tier policy from the config file, or the standard policy if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`LoyaltyError::Configuration`] if the file exists but cannot be
    /// read or holds an invalid tier list.
    pub fn load_tiers(&self) -> Result<TierPolicy> {
        let Some(file) = load_config_file(&self.config_path)? else {
            tracing::debug!(path = %self.config_path.display(), "No config file, using standard tiers");
            return Ok(TierPolicy::standard());
        };

        match file.tiers {
            Some(policy) => {
                tracing::info!(
                    path = %self.config_path.display(),
                    tiers = policy.bands().len(),
                    "Loaded custom tiers"
                );
                Ok(policy)
            }
            None => Ok(TierPolicy::standard()),
        }
    }

    /// Open the configured storage backend.
    ///
    /// # Errors
    ///
    /// Returns [`LoyaltyError::Storage`] if the backend cannot be opened, or
    /// [`LoyaltyError::Configuration`] if it was not compiled in.
    pub fn open_store(&self) -> Result<Box<dyn BlobStore>> {
        match self.backend {
            Backend::File => {
                let store = FileStore::open(&self.data_dir)
                    .map_err(|e| LoyaltyError::Storage(e.to_string()))?;
                Ok(Box::new(store))
            }
            Backend::Memory => Ok(Box::new(MemoryStore::new())),
            Backend::Rocksdb => open_rocks(&self.data_dir),
        }
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: ".loyalty".into(),
            backend: Backend::File,
            config_path: "loyalty.json".into(),
        }
    }
}

#[cfg(feature = "rocksdb-backend")]
fn open_rocks(data_dir: &Path) -> Result<Box<dyn BlobStore>> {
    let path = data_dir.join("rocksdb");
    tracing::info!(path = %path.display(), "Opening RocksDB store");
    let store = loyalty_store::RocksStore::open(&path)
        .map_err(|e| LoyaltyError::Storage(e.to_string()))?;
    Ok(Box::new(store))
}

#[cfg(not(feature = "rocksdb-backend"))]
fn open_rocks(_data_dir: &Path) -> Result<Box<dyn BlobStore>> {
    Err(LoyaltyError::Configuration(
        "rocksdb backend is not compiled in (build with --features rocksdb-backend)".into(),
    ))
}

/// Load the config file, or `None` if it does not exist.
fn load_config_file(path: &Path) -> Result<Option<ConfigFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path).map_err(|e| {
        LoyaltyError::Configuration(format!("reading {}: {e}", path.display()))
    })?;
    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|e| LoyaltyError::Configuration(format!("parsing {}: {e}", path.display())))
}
