//! Scenario store tests

use super::{at, mortgage_params, rental_params};
use crate::error::{Problem, StoreError};
use crate::model::{CalculatorType, Params, ScenarioId};
use crate::persistence::MemoryPersistence;
use crate::store::{ScenarioStore, StoreConfig};

fn new_store() -> ScenarioStore<MemoryPersistence> {
    ScenarioStore::open(MemoryPersistence::new(), StoreConfig::default())
}

fn fill(store: &mut ScenarioStore<MemoryPersistence>, count: usize) -> Vec<ScenarioId> {
    (0..count)
        .map(|i| {
            store
                .add_at(
                    "",
                    mortgage_params(1_000_000.0, 5.0 + i as f64, 20.0),
                    CalculatorType::Mortgage,
                    at(i as i64),
                )
                .unwrap()
                .id
        })
        .collect()
}

#[test]
fn test_add_assigns_ids_names_and_results() {
    let mut store = new_store();
    let scenario = store
        .add_at(
            "  Market rate ",
            mortgage_params(4_000_000.0, 13.5, 20.0),
            CalculatorType::Mortgage,
            at(0),
        )
        .unwrap();

    assert_eq!(scenario.id, ScenarioId(1));
    assert_eq!(scenario.name, "Market rate");
    assert_eq!(scenario.created_at, at(0));
    assert_eq!(scenario.calculator_type, CalculatorType::Mortgage);

    let ids = fill(&mut store, 2);
    assert_eq!(ids, vec![ScenarioId(2), ScenarioId(3)]);
    assert_eq!(store.list()[1].name, "Сценарий 2");
    assert_eq!(store.list()[2].name, "Сценарий 3");
}

#[test]
fn test_fourth_scenario_is_rejected_without_mutation() {
    let mut store = new_store();
    fill(&mut store, 3);
    let before = store.snapshot();
    let writes = store.persistence().write_count();

    let result = store.add(
        "One too many",
        mortgage_params(1_000_000.0, 9.0, 20.0),
        CalculatorType::Mortgage,
    );

    assert_eq!(result.unwrap_err(), StoreError::CapacityExceeded { max: 3 });
    assert_eq!(store.snapshot(), before);
    assert_eq!(store.persistence().write_count(), writes);
    assert!(store.is_full());
}

#[test]
fn test_custom_capacity() {
    let config = StoreConfig {
        max_scenarios: 2,
        ..StoreConfig::default()
    };
    let mut store = ScenarioStore::open(MemoryPersistence::new(), config);
    fill(&mut store, 2);
    let err = store
        .add("", mortgage_params(1.0, 1.0, 1.0), CalculatorType::Mortgage)
        .unwrap_err();
    assert_eq!(err, StoreError::CapacityExceeded { max: 2 });
}

#[test]
fn test_empty_params_are_rejected() {
    let mut store = new_store();
    let err = store
        .add("Empty", Params::new(), CalculatorType::Mortgage)
        .unwrap_err();
    assert_eq!(err, StoreError::EmptyParams);

    // Generic scenarios with nothing numeric are just as empty
    let err = store
        .add(
            "Words",
            Params::new().with("note", "hello"),
            CalculatorType::Generic,
        )
        .unwrap_err();
    assert_eq!(err, StoreError::EmptyParams);
    assert!(store.is_empty());
}

#[test]
fn test_invalid_params_are_rejected_before_computing() {
    let mut store = new_store();
    let err = store
        .add(
            "Free money",
            mortgage_params(1_000_000.0, 0.0, 20.0),
            CalculatorType::Mortgage,
        )
        .unwrap_err();

    let StoreError::Validation(validation) = err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert_eq!(validation.issues[0].key, "interestRate");
    assert_eq!(validation.issues[0].problem, Problem::NotPositive);
    assert!(store.is_empty());

    let err = store
        .add(
            "No price",
            rental_params(0.0, 10_000.0, 0.0),
            CalculatorType::Rental,
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[test]
fn test_rejected_add_does_not_consume_an_id() {
    let mut store = new_store();
    let _ = store.add("bad", Params::new(), CalculatorType::Mortgage);
    let ids = fill(&mut store, 1);
    assert_eq!(ids, vec![ScenarioId(1)]);
}

#[test]
fn test_snapshot_is_independent_of_later_edits() {
    let mut store = new_store();
    let mut form = mortgage_params(2_000_000.0, 8.0, 15.0);
    let id = store
        .add("Snapshot", form.clone(), CalculatorType::Mortgage)
        .unwrap()
        .id;
    let payment_before = store.get(id).unwrap().results.clone();

    // The live form keeps changing after capture
    form.insert("interestRate", 20.0);

    let stored = store.get(id).unwrap();
    assert_eq!(stored.params.number("interestRate"), Some(8.0));
    assert_eq!(stored.results, payment_before);
}

#[test]
fn test_remove() {
    let mut store = new_store();
    let ids = fill(&mut store, 3);

    let removed = store.remove(ids[1]).unwrap();
    assert_eq!(removed.id, ids[1]);
    assert!(store.list().iter().all(|s| s.id != ids[1]));
    assert_eq!(store.len(), 2);

    // Unknown ids are a no-op
    let writes = store.persistence().write_count();
    assert!(store.remove(ids[1]).is_none());
    assert!(store.remove(ScenarioId(999)).is_none());
    assert_eq!(store.len(), 2);
    assert_eq!(store.persistence().write_count(), writes);
}

#[test]
fn test_ids_are_not_reused_after_delete_or_clear() {
    let mut store = new_store();
    let ids = fill(&mut store, 3);
    store.remove(ids[2]);
    let next = fill(&mut store, 1);
    assert_eq!(next, vec![ScenarioId(4)]);

    store.clear();
    let after_clear = fill(&mut store, 1);
    assert_eq!(after_clear, vec![ScenarioId(5)]);
}

#[test]
fn test_clear_empties_the_store() {
    let mut store = new_store();
    fill(&mut store, 3);
    store.clear();

    assert!(store.list().is_empty());
    assert!(!store.can_compare());

    let reloaded = ScenarioStore::open(
        MemoryPersistence::with_contents(store.persistence().contents().unwrap()),
        StoreConfig::default(),
    );
    assert!(reloaded.is_empty());
}

#[test]
fn test_can_compare_needs_two() {
    let mut store = new_store();
    assert!(!store.can_compare());
    fill(&mut store, 1);
    assert!(!store.can_compare());
    assert!(store.compare().is_err());
    fill(&mut store, 1);
    assert!(store.can_compare());
    assert!(store.compare().is_ok());
}
