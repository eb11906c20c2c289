//! Persistence capability for the scenario store
//!
//! The store never touches storage directly. Hosts inject a [`Persistence`]
//! implementation: browser LocalStorage, a file in the data directory, or the
//! in-memory [`MemoryPersistence`] used by tests.
//!
//! State is saved as a versioned JSON envelope:
//!
//! ```json
//! { "version": 1, "nextId": 4, "scenarios": [ { "id": 1, ... } ] }
//! ```
//!
//! A bare JSON array of scenarios (the unversioned legacy layout) is accepted
//! on load and migrated.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::model::Scenario;

/// Schema version written by this build
pub const CURRENT_VERSION: u32 = 1;

/// Everything the store persists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub version: u32,
    /// Next id to hand out; ids are never reused
    pub next_id: u64,
    pub scenarios: Vec<Scenario>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self::empty()
    }
}

impl PersistedState {
    pub fn empty() -> Self {
        Self {
            version: CURRENT_VERSION,
            next_id: 1,
            scenarios: Vec::new(),
        }
    }

    pub fn to_json(&self) -> Result<String, PersistenceError> {
        serde_json::to_string(self).map_err(|e| PersistenceError::Serialize(e.to_string()))
    }

    /// Decode stored JSON, migrating the legacy layout when needed
    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| PersistenceError::Parse(e.to_string()))?;
        Self::from_value(value)
    }

    /// Decode an already-parsed JSON document
    pub fn from_value(value: serde_json::Value) -> Result<Self, PersistenceError> {
        let mut state = if value.is_array() {
            let scenarios: Vec<Scenario> = serde_json::from_value(value)
                .map_err(|e| PersistenceError::Parse(e.to_string()))?;
            tracing::debug!(
                count = scenarios.len(),
                "Migrating unversioned scenario list"
            );
            PersistedState {
                version: CURRENT_VERSION,
                next_id: 1,
                scenarios,
            }
        } else {
            let version = value
                .get("version")
                .and_then(serde_json::Value::as_u64)
                .ok_or_else(|| PersistenceError::Parse("missing schema version".to_string()))?;
            if version > u64::from(CURRENT_VERSION) {
                return Err(PersistenceError::UnsupportedVersion {
                    found: version,
                    supported: CURRENT_VERSION,
                });
            }
            serde_json::from_value(value).map_err(|e| PersistenceError::Parse(e.to_string()))?
        };

        // Never hand out an id that is already stored
        let max_id = state.scenarios.iter().map(|s| s.id.0).max().unwrap_or(0);
        state.next_id = state.next_id.max(max_id + 1);
        state.version = CURRENT_VERSION;
        Ok(state)
    }
}

/// Key-value persistence boundary for the scenario store
pub trait Persistence {
    /// Load the stored state; `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<PersistedState>, PersistenceError>;

    fn save(&self, state: &PersistedState) -> Result<(), PersistenceError>;

    /// Block until every accepted save has reached storage.
    ///
    /// Synchronous backends have nothing to wait for.
    fn flush(&self) -> Result<(), PersistenceError> {
        Ok(())
    }
}

impl<P: Persistence + ?Sized> Persistence for &P {
    fn load(&self) -> Result<Option<PersistedState>, PersistenceError> {
        (**self).load()
    }

    fn save(&self, state: &PersistedState) -> Result<(), PersistenceError> {
        (**self).save(state)
    }

    fn flush(&self) -> Result<(), PersistenceError> {
        (**self).flush()
    }
}

impl<P: Persistence + ?Sized> Persistence for Box<P> {
    fn load(&self) -> Result<Option<PersistedState>, PersistenceError> {
        (**self).load()
    }

    fn save(&self, state: &PersistedState) -> Result<(), PersistenceError> {
        (**self).save(state)
    }

    fn flush(&self) -> Result<(), PersistenceError> {
        (**self).flush()
    }
}

impl<P: Persistence + ?Sized> Persistence for Rc<P> {
    fn load(&self) -> Result<Option<PersistedState>, PersistenceError> {
        (**self).load()
    }

    fn save(&self, state: &PersistedState) -> Result<(), PersistenceError> {
        (**self).save(state)
    }

    fn flush(&self) -> Result<(), PersistenceError> {
        (**self).flush()
    }
}

/// In-memory persistence holding the serialized JSON.
///
/// Going through JSON keeps a save/load cycle equivalent to a page reload.
/// Failures can be switched on to simulate a full or broken backend.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    contents: RefCell<Option<String>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with raw stored contents (possibly corrupt)
    pub fn with_contents(contents: impl Into<String>) -> Self {
        let persistence = Self::default();
        persistence.contents.replace(Some(contents.into()));
        persistence
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Number of successful saves
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self) -> Result<Option<PersistedState>, PersistenceError> {
        if self.fail_reads.get() {
            return Err(PersistenceError::Io("read failed".to_string()));
        }
        self.contents
            .borrow()
            .as_deref()
            .map(PersistedState::from_json)
            .transpose()
    }

    fn save(&self, state: &PersistedState) -> Result<(), PersistenceError> {
        if self.fail_writes.get() {
            return Err(PersistenceError::Io("quota exceeded".to_string()));
        }
        let json = state.to_json()?;
        self.contents.replace(Some(json));
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
