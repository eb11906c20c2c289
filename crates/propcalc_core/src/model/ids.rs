//! Unique identifiers for stored entities

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a Scenario within a store.
///
/// Ids come from a monotonically increasing counter that is persisted with
/// the store, so an id is never handed out twice, even after deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioId(pub u64);

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
