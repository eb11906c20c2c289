//! Capped, persisted collection of comparison scenarios

use jiff::Timestamp;

use crate::compare::{self, Comparison};
use crate::error::{CompareError, PersistenceError, StoreError};
use crate::formulas;
use crate::metric::{MetricRecord, ScenarioResults};
use crate::model::{CalculatorType, Params, Scenario, ScenarioId};
use crate::persistence::{CURRENT_VERSION, PersistedState, Persistence};
use crate::validation;

/// Default cap on live scenarios
pub const DEFAULT_MAX_SCENARIOS: usize = 3;
/// Prefix for auto-generated scenario names
pub const DEFAULT_NAME_PREFIX: &str = "Сценарий";

#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub max_scenarios: usize,
    pub default_name_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_scenarios: DEFAULT_MAX_SCENARIOS,
            default_name_prefix: DEFAULT_NAME_PREFIX.to_string(),
        }
    }
}

/// In-memory scenario collection that writes through to a [`Persistence`]
/// backend on every mutation.
///
/// Persistence failures never surface as errors from mutating calls: they
/// are logged and the store keeps working from memory.
pub struct ScenarioStore<P: Persistence> {
    persistence: P,
    config: StoreConfig,
    scenarios: Vec<Scenario>,
    next_id: u64,
    degraded: bool,
}

impl<P: Persistence> ScenarioStore<P> {
    /// Open a store, loading whatever the backend holds.
    ///
    /// Unreadable state is logged and replaced by an empty store.
    pub fn open(persistence: P, config: StoreConfig) -> Self {
        let mut store = Self {
            persistence,
            config,
            scenarios: Vec::new(),
            next_id: 1,
            degraded: false,
        };
        if let Err(e) = store.load() {
            tracing::warn!(error = %e, "Failed to load saved scenarios; starting empty");
        }
        store
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Replace in-memory state with the persisted one.
    ///
    /// On error the store is left empty.
    pub fn load(&mut self) -> Result<(), PersistenceError> {
        match self.persistence.load() {
            Ok(Some(state)) => {
                self.apply_state(state);
                self.degraded = false;
                Ok(())
            }
            Ok(None) => {
                self.scenarios.clear();
                self.degraded = false;
                Ok(())
            }
            Err(e) => {
                self.scenarios.clear();
                self.degraded = true;
                Err(e)
            }
        }
    }

    fn apply_state(&mut self, state: PersistedState) {
        let PersistedState {
            next_id,
            mut scenarios,
            ..
        } = state;

        if scenarios.len() > self.config.max_scenarios {
            tracing::warn!(
                stored = scenarios.len(),
                max = self.config.max_scenarios,
                "Stored scenarios exceed the limit; dropping the newest"
            );
            scenarios.truncate(self.config.max_scenarios);
        }

        tracing::debug!(count = scenarios.len(), "Loaded scenarios");
        self.scenarios = scenarios;
        self.next_id = next_id;
    }

    /// Snapshot of the full collection in its persisted form
    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            version: CURRENT_VERSION,
            next_id: self.next_id,
            scenarios: self.scenarios.clone(),
        }
    }

    /// Write the current state to the backend
    pub fn save(&mut self) -> Result<(), PersistenceError> {
        let result = self.persistence.save(&self.snapshot());
        self.degraded = result.is_err();
        result
    }

    /// Wait for writes the backend has queued and record their outcome
    pub fn flush(&mut self) -> Result<(), PersistenceError> {
        let result = self.persistence.flush();
        self.degraded = result.is_err();
        result
    }

    fn persist(&mut self) {
        if let Err(e) = self.save() {
            tracing::warn!(error = %e, "Failed to persist scenarios; keeping them in memory only");
        }
    }

    /// True after the last load, save or flush failed
    pub fn persistence_degraded(&self) -> bool {
        self.degraded
    }

    /// Capture a scenario, stamping it with the current time
    pub fn add(
        &mut self,
        name: &str,
        params: Params,
        calculator: CalculatorType,
    ) -> Result<&Scenario, StoreError> {
        self.add_at(name, params, calculator, Timestamp::now())
    }

    /// Capture a scenario with an explicit creation time.
    ///
    /// Rejections leave the store untouched. A blank `name` becomes
    /// `"{prefix} {n}"`.
    pub fn add_at(
        &mut self,
        name: &str,
        params: Params,
        calculator: CalculatorType,
        created_at: Timestamp,
    ) -> Result<&Scenario, StoreError> {
        if self.is_full() {
            return Err(StoreError::CapacityExceeded {
                max: self.config.max_scenarios,
            });
        }
        if params.is_empty() {
            return Err(StoreError::EmptyParams);
        }

        validation::validate(calculator, &params)?;
        let results = formulas::compute(calculator, &params)?;
        if matches!(&results, ScenarioResults::Generic(generic) if generic.metrics().is_empty()) {
            return Err(StoreError::EmptyParams);
        }

        let id = ScenarioId(self.next_id);
        self.next_id += 1;

        let name = match name.trim() {
            "" => format!(
                "{} {}",
                self.config.default_name_prefix,
                self.scenarios.len() + 1
            ),
            trimmed => trimmed.to_string(),
        };

        tracing::debug!(%id, name = %name, %calculator, "Adding scenario");
        self.scenarios.push(Scenario {
            id,
            name,
            calculator_type: calculator,
            params,
            results,
            created_at,
        });
        self.persist();

        Ok(&self.scenarios[self.scenarios.len() - 1])
    }

    /// Delete a scenario. Unknown ids are a no-op.
    pub fn remove(&mut self, id: ScenarioId) -> Option<Scenario> {
        let pos = self.scenarios.iter().position(|s| s.id == id)?;
        let removed = self.scenarios.remove(pos);
        tracing::debug!(%id, "Removed scenario");
        self.persist();
        Some(removed)
    }

    /// Delete every scenario in one step. Ids keep counting up afterwards.
    pub fn clear(&mut self) {
        self.scenarios.clear();
        tracing::debug!("Cleared scenarios");
        self.persist();
    }

    /// Scenarios in insertion order
    pub fn list(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn get(&self, id: ScenarioId) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.scenarios.len() >= self.config.max_scenarios
    }

    /// Whether a comparison table should be shown
    pub fn can_compare(&self) -> bool {
        self.scenarios.len() >= 2
    }

    /// Compare every stored scenario
    pub fn compare(&self) -> Result<Comparison, CompareError> {
        compare::compare(&self.scenarios)
    }
}
