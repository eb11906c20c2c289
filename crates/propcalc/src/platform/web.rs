//! Web persistence using browser LocalStorage.

use gloo_storage::errors::StorageError;
use gloo_storage::{LocalStorage, Storage};
use propcalc_core::{PersistedState, Persistence, PersistenceError};

/// Namespaced LocalStorage key holding the persisted scenario list
pub const STORAGE_KEY: &str = "propcalc.scenarios";

/// Stores the scenario list as JSON under a single LocalStorage key
#[derive(Debug, Clone)]
pub struct LocalStoragePersistence {
    key: String,
}

impl Default for LocalStoragePersistence {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStoragePersistence {
    pub fn new() -> Self {
        Self::with_key(STORAGE_KEY)
    }

    pub fn with_key(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Persistence for LocalStoragePersistence {
    fn load(&self) -> Result<Option<PersistedState>, PersistenceError> {
        match LocalStorage::get::<serde_json::Value>(&self.key) {
            Ok(value) => PersistedState::from_value(value).map(Some),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(StorageError::SerdeError(e)) => Err(PersistenceError::Parse(e.to_string())),
            Err(e) => Err(PersistenceError::NotAvailable(e.to_string())),
        }
    }

    fn save(&self, state: &PersistedState) -> Result<(), PersistenceError> {
        LocalStorage::set(&self.key, state).map_err(|e| match e {
            StorageError::SerdeError(e) => PersistenceError::Serialize(e.to_string()),
            other => PersistenceError::Io(format!("Failed to save scenarios: {}", other)),
        })
    }
}
