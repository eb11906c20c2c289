use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{CalculatorType, OrderedMap, Params, ScenarioId};
use crate::error::MetricDecodeError;
use crate::metric::ScenarioResults;

/// A named, immutable snapshot of calculator inputs and their derived results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScenarioRecord", into = "ScenarioRecord")]
pub struct Scenario {
    pub id: ScenarioId,
    pub name: String,
    pub calculator_type: CalculatorType,
    pub params: Params,
    pub results: ScenarioResults,
    pub created_at: Timestamp,
}

/// Wire layout: `{id, name, calculatorType, params, results, createdAt}` with
/// results flattened to a metric map.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioRecord {
    id: ScenarioId,
    name: String,
    calculator_type: CalculatorType,
    params: Params,
    results: OrderedMap<f64>,
    created_at: Timestamp,
}

impl TryFrom<ScenarioRecord> for Scenario {
    type Error = MetricDecodeError;

    fn try_from(record: ScenarioRecord) -> Result<Self, Self::Error> {
        Ok(Scenario {
            results: ScenarioResults::from_metric_map(record.calculator_type, record.results)?,
            id: record.id,
            name: record.name,
            calculator_type: record.calculator_type,
            params: record.params,
            created_at: record.created_at,
        })
    }
}

impl From<Scenario> for ScenarioRecord {
    fn from(scenario: Scenario) -> Self {
        ScenarioRecord {
            results: scenario.results.to_metric_map(),
            id: scenario.id,
            name: scenario.name,
            calculator_type: scenario.calculator_type,
            params: scenario.params,
            created_at: scenario.created_at,
        }
    }
}
