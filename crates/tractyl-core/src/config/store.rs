// Tractyl Config Store
// Loads and saves the pointer config through a byte-oriented storage backend

use std::collections::HashMap;

use super::{PointerConfig, CONFIG_SIZE};

/// Storage key under which the pointer config record is kept
pub const CONFIG_KEY: &str = "kb";

/// Errors reported by a storage backend
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("no record stored under {0:?}")]
    Missing(String),

    #[error("storage write failed: {0}")]
    WriteFailed(String),

    #[error("storage read failed: {0}")]
    ReadFailed(String),
}

/// Byte-oriented persistent store (EEPROM, flash page, file...)
pub trait Storage {
    fn read(&self, key: &str) -> Result<Vec<u8>, StorageError>;
    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;
}

/// In-memory storage, used by the simulator and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    records: HashMap<String, Vec<u8>>,
    fail_writes: bool,
    writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following write fail, to exercise fire-and-forget saves
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Raw record under `key`, if any
    pub fn record(&self, key: &str) -> Option<&[u8]> {
        self.records.get(key).map(|v| v.as_slice())
    }

    /// Store a raw record directly, bypassing the config layer
    pub fn insert(&mut self, key: &str, bytes: &[u8]) {
        self.records.insert(key.to_string(), bytes.to_vec());
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.records
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::Missing(key.to_string()))
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::WriteFailed(format!(
                "{} bytes to {:?} rejected",
                bytes.len(),
                key
            )));
        }
        self.records.insert(key.to_string(), bytes.to_vec());
        self.writes += 1;
        Ok(())
    }
}

/// Config persistence policy on top of a [`Storage`] backend.
///
/// `load` and `save` are asymmetric: `save` writes the record
/// verbatim, mode flags included, while `load` always comes back with the
/// mode flags cleared. Only the DPI steps survive a reboot.
#[derive(Debug)]
pub struct ConfigStore<S: Storage> {
    storage: S,
}

impl<S: Storage> ConfigStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Read the stored config with every transient flag forced off.
    ///
    /// A missing, unreadable or wrongly sized record yields the zeroed config.
    pub fn load(&self) -> PointerConfig {
        let mut config = match self.storage.read(CONFIG_KEY) {
            Ok(bytes) => match PointerConfig::from_slice(&bytes) {
                Some(config) => config,
                None => {
                    log::warn!(
                        "stored config has {} bytes, expected {}; using defaults",
                        bytes.len(),
                        CONFIG_SIZE
                    );
                    PointerConfig::default()
                }
            },
            Err(e) => {
                log::debug!("no stored config ({}); using defaults", e);
                PointerConfig::default()
            }
        };
        config.clear_transient();
        config
    }

    /// Write the config verbatim. Failures are logged and otherwise ignored;
    /// the in-memory config stays authoritative.
    pub fn save(&mut self, config: &PointerConfig) {
        if let Err(e) = self.storage.write(CONFIG_KEY, &config.to_bytes()) {
            log::warn!("failed to persist pointer config: {}", e);
        }
    }

    /// Zero the config and write it through
    pub fn reset_to_default(&mut self) -> PointerConfig {
        let config = PointerConfig::default();
        self.save(&config);
        config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}
