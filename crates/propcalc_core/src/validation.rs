//! Declarative field rules checked before any formula runs

use crate::error::{FieldIssue, Problem, ValidationError};
use crate::model::{CalculatorType, Params};

/// A single field rule. Numeric rules skip fields that are absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    Required(&'static str),
    Positive(&'static str),
    NonNegative(&'static str),
    /// Inclusive bounds
    Range {
        key: &'static str,
        min: f64,
        max: f64,
    },
    /// Checked only when both fields are present
    LessThan {
        key: &'static str,
        other: &'static str,
    },
}

impl Rule {
    fn key(&self) -> &'static str {
        match self {
            Rule::Required(key)
            | Rule::Positive(key)
            | Rule::NonNegative(key)
            | Rule::Range { key, .. }
            | Rule::LessThan { key, .. } => key,
        }
    }

    fn check(&self, params: &Params) -> Option<Problem> {
        let key = self.key();
        let Some(raw) = params.get(key) else {
            return matches!(self, Rule::Required(_)).then_some(Problem::Missing);
        };
        let Some(value) = raw.as_number() else {
            return Some(Problem::NotANumber);
        };

        match *self {
            Rule::Required(_) => None,
            Rule::Positive(_) => (value <= 0.0).then_some(Problem::NotPositive),
            Rule::NonNegative(_) => (value < 0.0).then_some(Problem::Negative),
            Rule::Range { min, max, .. } => {
                (value < min || value > max).then_some(Problem::OutOfRange { min, max })
            }
            Rule::LessThan { other, .. } => {
                let other_value = params.number(other)?;
                (value >= other_value).then_some(Problem::NotLessThan { other })
            }
        }
    }
}

const MORTGAGE_RULES: &[Rule] = &[
    Rule::Required("loanAmount"),
    Rule::Positive("loanAmount"),
    Rule::Required("interestRate"),
    Rule::Positive("interestRate"),
    Rule::Range {
        key: "interestRate",
        min: 0.0,
        max: 100.0,
    },
    Rule::Required("loanTerm"),
    Rule::Positive("loanTerm"),
    Rule::Range {
        key: "loanTerm",
        min: 0.0,
        max: 50.0,
    },
    Rule::NonNegative("downPayment"),
    Rule::LessThan {
        key: "downPayment",
        other: "propertyPrice",
    },
];

const RENTAL_RULES: &[Rule] = &[
    Rule::Required("propertyPrice"),
    Rule::Positive("propertyPrice"),
    Rule::Required("monthlyRent"),
    Rule::NonNegative("monthlyRent"),
    Rule::NonNegative("expenses"),
];

/// Rule table for a calculator type
pub fn rules(calculator: CalculatorType) -> &'static [Rule] {
    match calculator {
        CalculatorType::Mortgage => MORTGAGE_RULES,
        CalculatorType::Rental => RENTAL_RULES,
        CalculatorType::Generic => &[],
    }
}

/// Check every rule and report all failing fields (one issue per field).
pub fn validate(calculator: CalculatorType, params: &Params) -> Result<(), ValidationError> {
    let mut issues: Vec<FieldIssue> = Vec::new();

    for rule in rules(calculator) {
        let key = rule.key();
        if issues.iter().any(|i| i.key == key) {
            continue;
        }
        if let Some(problem) = rule.check(params) {
            issues.push(FieldIssue {
                key: key.to_string(),
                problem,
            });
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}
