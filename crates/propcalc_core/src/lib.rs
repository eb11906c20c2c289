//! Scenario comparison engine for real-estate calculators
//!
//! This crate captures named snapshots of calculator inputs, derives metrics
//! from them, and ranks up to a handful of snapshots against each other.
//! It supports:
//! - Mortgage (annuity) and rental-yield formula families, plus a generic
//!   pass-through for other calculators
//! - Rule-based validation of form parameters before any formula runs
//! - A capped scenario store persisted through an injected backend
//! - Per-metric ranking with a lower/higher-is-better policy and narrative
//!   insights
//! - JSON and CSV exports of a comparison
//!
//! # Example
//!
//! ```
//! use propcalc_core::{CalculatorType, MemoryPersistence, Params, ScenarioStore, StoreConfig};
//!
//! let mut store = ScenarioStore::open(MemoryPersistence::new(), StoreConfig::default());
//! let base = Params::new().with("loanAmount", 4_000_000.0).with("loanTerm", 20.0);
//!
//! store.add("Market", base.clone().with("interestRate", 13.5), CalculatorType::Mortgage)?;
//! store.add("Family", base.with("interestRate", 6.0), CalculatorType::Mortgage)?;
//!
//! let comparison = store.compare()?;
//! let payment = comparison.table.row("monthlyPayment").unwrap();
//! assert_eq!(payment.winner.name, "Family");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod compare;
pub mod debounce;
pub mod error;
pub mod export;
pub mod format;
pub mod formulas;
pub mod insights;
pub mod metric;
pub mod persistence;
pub mod store;
pub mod validation;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use compare::{Comparison, ComparisonRow, ComparisonTable, Winner, compare};
pub use error::{CompareError, FormulaError, PersistenceError, StoreError, ValidationError};
pub use metric::{Direction, MetricRecord, MetricUnit, ScenarioResults};
pub use model::{CalculatorType, ParamValue, Params, Scenario, ScenarioId};
pub use persistence::{MemoryPersistence, PersistedState, Persistence};
pub use store::{ScenarioStore, StoreConfig};
