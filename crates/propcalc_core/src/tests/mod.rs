//! Integration tests for the scenario comparison engine
//!
//! Tests are organized by topic:
//! - `formulas` - Mortgage, rental and generic metric formulas
//! - `store` - Scenario store capacity, naming, removal and clearing
//! - `persistence` - Save/load cycles, legacy migration and degraded backends
//! - `comparator` - Ranking, tie-breaks, improvements, insights and exports

mod store;

use jiff::Timestamp;

use crate::model::Params;

/// Relative float comparison for derived metrics
pub(crate) fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

pub(crate) fn mortgage_params(amount: f64, rate: f64, term: f64) -> Params {
    Params::new()
        .with("loanAmount", amount)
        .with("interestRate", rate)
        .with("loanTerm", term)
}

pub(crate) fn rental_params(price: f64, rent: f64, expenses: f64) -> Params {
    Params::new()
        .with("propertyPrice", price)
        .with("monthlyRent", rent)
        .with("expenses", expenses)
}

pub(crate) fn at(seconds: i64) -> Timestamp {
    Timestamp::from_second(1_735_689_600 + seconds).unwrap()
}
