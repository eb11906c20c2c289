//! Metric-by-metric ranking of scenarios
//!
//! The metric set comes from the first scenario. For each metric the best and
//! worst scenarios are picked according to the metric's [`Direction`]; ties go
//! to the earlier scenario. The improvement of the best over the worst is
//! `|best - worst| / |worst| * 100` and is omitted when `worst` is zero.
//!
//! Nothing here reads the clock or a random source, so the same input always
//! produces the same table.

use serde::Serialize;

use crate::error::CompareError;
use crate::insights;
use crate::metric::{Direction, MetricRecord, MetricUnit};
use crate::model::{CalculatorType, Scenario, ScenarioId};

/// One scenario as seen by the comparator
#[derive(Debug, Clone, Copy)]
pub struct ComparisonEntry<'a, R> {
    pub id: ScenarioId,
    pub name: &'a str,
    pub record: &'a R,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioColumn {
    pub id: ScenarioId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonCell {
    /// `None` when the scenario lacks this metric
    pub value: Option<f64>,
    pub formatted: String,
    pub is_best: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Winner {
    /// Column index of the winning scenario
    pub index: usize,
    pub scenario_id: ScenarioId,
    pub name: String,
    pub improvement_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub key: String,
    pub label: String,
    pub unit: MetricUnit,
    pub direction: Direction,
    pub cells: Vec<ComparisonCell>,
    pub winner: Winner,
    /// Column index of the weakest scenario
    pub worst_index: usize,
}

impl ComparisonRow {
    pub fn best_value(&self) -> Option<f64> {
        self.cells.get(self.winner.index).and_then(|c| c.value)
    }

    pub fn worst_value(&self) -> Option<f64> {
        self.cells.get(self.worst_index).and_then(|c| c.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonTable {
    pub columns: Vec<ScenarioColumn>,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn row(&self, key: &str) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.key == key)
    }
}

/// Ranked table plus narrative insights for one calculator type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub calculator_type: CalculatorType,
    pub table: ComparisonTable,
    pub insights: Vec<String>,
}

const MISSING_CELL: &str = "—";

/// Indices of the best and worst present values, first occurrence on ties
fn rank(values: &[Option<f64>], direction: Direction) -> Option<(usize, usize)> {
    let mut best: Option<(usize, f64)> = None;
    let mut worst: Option<(usize, f64)> = None;

    for (i, value) in values.iter().enumerate() {
        let Some(v) = *value else { continue };
        match best {
            Some((_, b)) if !direction.prefers(v, b) => {}
            _ => best = Some((i, v)),
        }
        match worst {
            Some((_, w)) if !direction.opposite().prefers(v, w) => {}
            _ => worst = Some((i, v)),
        }
    }

    Some((best?.0, worst?.0))
}

fn improvement(best: f64, worst: f64) -> Option<f64> {
    if worst == 0.0 {
        None
    } else {
        Some((best - worst).abs() / worst.abs() * 100.0)
    }
}

/// Rank any record type that declares its metrics.
pub fn compare_records<R: MetricRecord>(
    entries: &[ComparisonEntry<'_, R>],
) -> Result<ComparisonTable, CompareError> {
    if entries.len() < 2 {
        return Err(CompareError::NotEnoughScenarios {
            found: entries.len(),
        });
    }

    let columns: Vec<ScenarioColumn> = entries
        .iter()
        .map(|e| ScenarioColumn {
            id: e.id,
            name: e.name.to_string(),
        })
        .collect();

    let first = entries[0].record.metrics();
    let mut rows = Vec::with_capacity(first.len());

    for metric in &first {
        let values: Vec<Option<f64>> = entries
            .iter()
            .map(|e| e.record.metric(metric.key))
            .collect();

        let Some((best, worst)) = rank(&values, metric.direction) else {
            continue;
        };

        let cells = values
            .iter()
            .enumerate()
            .map(|(i, value)| ComparisonCell {
                value: *value,
                formatted: value.map_or_else(|| MISSING_CELL.to_string(), |v| metric.unit.format(v)),
                is_best: i == best,
            })
            .collect();

        let improvement_pct = match (values[best], values[worst]) {
            (Some(b), Some(w)) => improvement(b, w),
            _ => None,
        };

        rows.push(ComparisonRow {
            key: metric.key.to_string(),
            label: metric.label.to_string(),
            unit: metric.unit,
            direction: metric.direction,
            cells,
            winner: Winner {
                index: best,
                scenario_id: entries[best].id,
                name: entries[best].name.to_string(),
                improvement_pct,
            },
            worst_index: worst,
        });
    }

    Ok(ComparisonTable { columns, rows })
}

/// Compare stored scenarios, which must share one calculator type.
pub fn compare(scenarios: &[Scenario]) -> Result<Comparison, CompareError> {
    let Some(first) = scenarios.first() else {
        return Err(CompareError::NotEnoughScenarios { found: 0 });
    };
    let calculator_type = first.calculator_type;

    if let Some(other) = scenarios
        .iter()
        .find(|s| s.calculator_type != calculator_type)
    {
        return Err(CompareError::MixedCalculatorTypes {
            expected: calculator_type,
            found: other.calculator_type,
        });
    }

    let entries: Vec<_> = scenarios
        .iter()
        .map(|s| ComparisonEntry {
            id: s.id,
            name: s.name.as_str(),
            record: &s.results,
        })
        .collect();

    let table = compare_records(&entries)?;
    let insights = insights::generate(calculator_type, &table);

    Ok(Comparison {
        calculator_type,
        table,
        insights,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_ties_go_to_first() {
        let values = [Some(5.0), Some(3.0), Some(3.0), Some(5.0)];
        assert_eq!(rank(&values, Direction::LowerIsBetter), Some((1, 0)));
        assert_eq!(rank(&values, Direction::HigherIsBetter), Some((0, 1)));
    }

    #[test]
    fn test_rank_skips_missing() {
        let values = [None, Some(2.0), None, Some(4.0)];
        assert_eq!(rank(&values, Direction::HigherIsBetter), Some((3, 1)));
        assert_eq!(rank(&[None, None], Direction::HigherIsBetter), None);
    }

    #[test]
    fn test_improvement() {
        assert_eq!(improvement(6.2, 5.0).map(|v| (v * 1e6).round()), Some(24e6));
        assert_eq!(improvement(100.0, 0.0), None);
        assert_eq!(improvement(-50.0, -100.0), Some(50.0));
    }
}
