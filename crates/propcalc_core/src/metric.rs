//! Metric records and the direction policy used for ranking
//!
//! Each formula family produces its own typed result record. Records declare
//! their fields once (key, label, unit) and the comparator ranks them through
//! the [`MetricRecord`] trait without knowing the concrete type.

use serde::{Deserialize, Serialize};

use crate::error::MetricDecodeError;
use crate::format::{format_currency, format_number, format_percent};
use crate::model::{CalculatorType, OrderedMap};

/// Keys for which a lower value is the better outcome
pub const LOWER_IS_BETTER: [&str; 4] = [
    "totalInterest",
    "monthlyPayment",
    "totalPayment",
    "expenses",
];

/// Result key reserved for failed computations; never ranked
pub const ERROR_SENTINEL_KEY: &str = "error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    LowerIsBetter,
    HigherIsBetter,
}

impl Direction {
    /// Direction policy lookup. Anything not on the allow-list is higher-is-better.
    pub fn for_key(key: &str) -> Self {
        if LOWER_IS_BETTER.contains(&key) {
            Direction::LowerIsBetter
        } else {
            Direction::HigherIsBetter
        }
    }

    /// Whether `candidate` strictly beats `current`
    pub fn prefers(self, candidate: f64, current: f64) -> bool {
        match self {
            Direction::LowerIsBetter => candidate < current,
            Direction::HigherIsBetter => candidate > current,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::LowerIsBetter => Direction::HigherIsBetter,
            Direction::HigherIsBetter => Direction::LowerIsBetter,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricUnit {
    Currency,
    Percent,
    Plain,
}

impl MetricUnit {
    pub fn format(self, value: f64) -> String {
        match self {
            MetricUnit::Currency => format_currency(value),
            MetricUnit::Percent => format_percent(value),
            MetricUnit::Plain => format_number(value),
        }
    }
}

/// Static declaration of one field of a typed result record
#[derive(Debug, Clone, Copy)]
pub struct MetricField {
    pub key: &'static str,
    pub label: &'static str,
    pub unit: MetricUnit,
}

impl MetricField {
    const fn new(key: &'static str, label: &'static str, unit: MetricUnit) -> Self {
        Self { key, label, unit }
    }

    pub fn direction(&self) -> Direction {
        Direction::for_key(self.key)
    }
}

/// One metric value with its ranking metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Metric<'a> {
    pub key: &'a str,
    pub label: &'a str,
    pub unit: MetricUnit,
    pub direction: Direction,
    pub value: f64,
}

impl<'a> Metric<'a> {
    fn from_field(field: &'a MetricField, value: f64) -> Self {
        Metric {
            key: field.key,
            label: field.label,
            unit: field.unit,
            direction: field.direction(),
            value,
        }
    }
}

/// A result record that the comparator can rank field by field
pub trait MetricRecord {
    /// Metrics in declaration order, excluding the error sentinel
    fn metrics(&self) -> Vec<Metric<'_>>;

    fn metric(&self, key: &str) -> Option<f64> {
        self.metrics()
            .into_iter()
            .find(|m| m.key == key)
            .map(|m| m.value)
    }
}

fn read_field(
    map: &OrderedMap<f64>,
    calculator: CalculatorType,
    key: &'static str,
) -> Result<f64, MetricDecodeError> {
    map.get(key).copied().ok_or(MetricDecodeError {
        calculator,
        missing: key,
    })
}

// ============================================================================
// Mortgage
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MortgageResults {
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
    /// Linear annualisation of total cost, not an IRR
    pub effective_rate: f64,
}

impl MortgageResults {
    pub const FIELDS: &'static [MetricField] = &[
        MetricField::new("monthlyPayment", "Monthly payment", MetricUnit::Currency),
        MetricField::new("totalPayment", "Total payment", MetricUnit::Currency),
        MetricField::new("totalInterest", "Total interest", MetricUnit::Currency),
        MetricField::new("effectiveRate", "Effective rate", MetricUnit::Percent),
    ];

    fn values(&self) -> [f64; 4] {
        [
            self.monthly_payment,
            self.total_payment,
            self.total_interest,
            self.effective_rate,
        ]
    }

    pub fn from_metric_map(map: &OrderedMap<f64>) -> Result<Self, MetricDecodeError> {
        let calc = CalculatorType::Mortgage;
        Ok(Self {
            monthly_payment: read_field(map, calc, "monthlyPayment")?,
            total_payment: read_field(map, calc, "totalPayment")?,
            total_interest: read_field(map, calc, "totalInterest")?,
            effective_rate: read_field(map, calc, "effectiveRate")?,
        })
    }
}

impl MetricRecord for MortgageResults {
    fn metrics(&self) -> Vec<Metric<'_>> {
        Self::FIELDS
            .iter()
            .zip(self.values())
            .map(|(field, value)| Metric::from_field(field, value))
            .collect()
    }
}

// ============================================================================
// Rental yield
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RentalResults {
    pub annual_rent: f64,
    pub net_annual_income: f64,
    pub gross_yield: f64,
    pub net_yield: f64,
    pub monthly_net_income: f64,
}

impl RentalResults {
    pub const FIELDS: &'static [MetricField] = &[
        MetricField::new("annualRent", "Annual rent", MetricUnit::Currency),
        MetricField::new("netAnnualIncome", "Net annual income", MetricUnit::Currency),
        MetricField::new("grossYield", "Gross yield", MetricUnit::Percent),
        MetricField::new("netYield", "Net yield", MetricUnit::Percent),
        MetricField::new("monthlyNetIncome", "Monthly net income", MetricUnit::Currency),
    ];

    fn values(&self) -> [f64; 5] {
        [
            self.annual_rent,
            self.net_annual_income,
            self.gross_yield,
            self.net_yield,
            self.monthly_net_income,
        ]
    }

    pub fn from_metric_map(map: &OrderedMap<f64>) -> Result<Self, MetricDecodeError> {
        let calc = CalculatorType::Rental;
        Ok(Self {
            annual_rent: read_field(map, calc, "annualRent")?,
            net_annual_income: read_field(map, calc, "netAnnualIncome")?,
            gross_yield: read_field(map, calc, "grossYield")?,
            net_yield: read_field(map, calc, "netYield")?,
            monthly_net_income: read_field(map, calc, "monthlyNetIncome")?,
        })
    }
}

impl MetricRecord for RentalResults {
    fn metrics(&self) -> Vec<Metric<'_>> {
        Self::FIELDS
            .iter()
            .zip(self.values())
            .map(|(field, value)| Metric::from_field(field, value))
            .collect()
    }
}

// ============================================================================
// Generic fallback
// ============================================================================

/// Pass-through metrics for calculators without a formula family.
///
/// Keys double as labels and the direction comes from the key alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericResults {
    pub values: OrderedMap<f64>,
}

impl MetricRecord for GenericResults {
    fn metrics(&self) -> Vec<Metric<'_>> {
        self.values
            .iter()
            .filter(|(key, _)| *key != ERROR_SENTINEL_KEY)
            .map(|(key, value)| Metric {
                key,
                label: key,
                unit: MetricUnit::Plain,
                direction: Direction::for_key(key),
                value: *value,
            })
            .collect()
    }
}

// ============================================================================
// Any family
// ============================================================================

/// Results of any formula family
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioResults {
    Mortgage(MortgageResults),
    Rental(RentalResults),
    Generic(GenericResults),
}

impl ScenarioResults {
    pub fn calculator_type(&self) -> CalculatorType {
        match self {
            ScenarioResults::Mortgage(_) => CalculatorType::Mortgage,
            ScenarioResults::Rental(_) => CalculatorType::Rental,
            ScenarioResults::Generic(_) => CalculatorType::Generic,
        }
    }

    /// Flat key/value form used on the wire
    pub fn to_metric_map(&self) -> OrderedMap<f64> {
        match self {
            ScenarioResults::Generic(g) => g.values.clone(),
            _ => self.metrics().into_iter().map(|m| (m.key, m.value)).collect(),
        }
    }

    /// Rebuild typed results from their wire form
    pub fn from_metric_map(
        calculator: CalculatorType,
        map: OrderedMap<f64>,
    ) -> Result<Self, MetricDecodeError> {
        Ok(match calculator {
            CalculatorType::Mortgage => {
                ScenarioResults::Mortgage(MortgageResults::from_metric_map(&map)?)
            }
            CalculatorType::Rental => ScenarioResults::Rental(RentalResults::from_metric_map(&map)?),
            CalculatorType::Generic => ScenarioResults::Generic(GenericResults { values: map }),
        })
    }
}

impl MetricRecord for ScenarioResults {
    fn metrics(&self) -> Vec<Metric<'_>> {
        match self {
            ScenarioResults::Mortgage(r) => r.metrics(),
            ScenarioResults::Rental(r) => r.metrics(),
            ScenarioResults::Generic(r) => r.metrics(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_policy() {
        assert_eq!(Direction::for_key("monthlyPayment"), Direction::LowerIsBetter);
        assert_eq!(Direction::for_key("expenses"), Direction::LowerIsBetter);
        assert_eq!(Direction::for_key("netYield"), Direction::HigherIsBetter);
        // Not on the allow-list, so it ranks as higher-is-better
        assert_eq!(Direction::for_key("effectiveRate"), Direction::HigherIsBetter);
    }

    #[test]
    fn test_generic_skips_error_sentinel() {
        let results = GenericResults {
            values: OrderedMap::new()
                .with("price", 100.0)
                .with(ERROR_SENTINEL_KEY, 1.0)
                .with("expenses", 5.0),
        };
        let keys: Vec<_> = results.metrics().iter().map(|m| m.key).collect();
        assert_eq!(keys, vec!["price", "expenses"]);
        assert_eq!(results.metric("expenses"), Some(5.0));
    }

    #[test]
    fn test_metric_map_round_trip_for_typed_results() {
        let results = ScenarioResults::Rental(RentalResults {
            annual_rent: 600_000.0,
            net_annual_income: 500_000.0,
            gross_yield: 6.0,
            net_yield: 5.0,
            monthly_net_income: 41_666.0,
        });
        let map = results.to_metric_map();
        assert_eq!(map.len(), 5);

        let back = ScenarioResults::from_metric_map(CalculatorType::Rental, map).unwrap();
        assert_eq!(back, results);
    }

    #[test]
    fn test_metric_map_missing_field() {
        let map = OrderedMap::new().with("monthlyPayment", 1.0);
        let err = ScenarioResults::from_metric_map(CalculatorType::Mortgage, map).unwrap_err();
        assert_eq!(err.missing, "totalPayment");
    }
}
