use std::fmt;

use crate::model::CalculatorType;

/// A calculator tag that names no known formula family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCalculatorType(pub String);

impl fmt::Display for UnknownCalculatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown calculator type '{}'", self.0)
    }
}

impl std::error::Error for UnknownCalculatorType {}

/// Metric formula preconditions that were not met
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaError {
    MissingParameter(&'static str),
    NonFinite(&'static str),
    /// A value that feeds a denominator or exponent must be strictly positive
    NonPositive { parameter: &'static str, value: f64 },
    /// The inputs are accepted one by one but drive a metric to infinity or NaN
    Undefined(&'static str),
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaError::MissingParameter(key) => write!(f, "missing parameter '{key}'"),
            FormulaError::NonFinite(key) => write!(f, "parameter '{key}' is not a finite number"),
            FormulaError::NonPositive { parameter, value } => {
                write!(f, "parameter '{parameter}' must be positive (got {value})")
            }
            FormulaError::Undefined(metric) => {
                write!(f, "'{metric}' is undefined for these inputs")
            }
        }
    }
}

impl std::error::Error for FormulaError {}

/// What is wrong with a single form field
#[derive(Debug, Clone, PartialEq)]
pub enum Problem {
    Missing,
    NotANumber,
    NotPositive,
    Negative,
    OutOfRange { min: f64, max: f64 },
    NotLessThan { other: &'static str },
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::Missing => write!(f, "is required"),
            Problem::NotANumber => write!(f, "must be a number"),
            Problem::NotPositive => write!(f, "must be greater than zero"),
            Problem::Negative => write!(f, "must not be negative"),
            Problem::OutOfRange { min, max } => write!(f, "must be between {min} and {max}"),
            Problem::NotLessThan { other } => write!(f, "must be less than '{other}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    pub key: String,
    pub problem: Problem,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' {}", self.key, self.problem)
    }
}

/// Every rule violation found in a parameter snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn has_issue(&self, key: &str) -> bool {
        self.issues.iter().any(|i| i.key == key)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid parameters: ")?;
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Errors from the persistence boundary
#[derive(Debug, Clone, PartialEq)]
pub enum PersistenceError {
    /// Backend read/write failure (quota exceeded, permission denied, ...)
    Io(String),
    /// Stored data could not be decoded
    Parse(String),
    Serialize(String),
    /// Stored data was written by a newer schema
    UnsupportedVersion { found: u64, supported: u32 },
    /// Backend is not reachable in this environment
    NotAvailable(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Io(msg) => write!(f, "IO error: {msg}"),
            PersistenceError::Parse(msg) => write!(f, "Parse error: {msg}"),
            PersistenceError::Serialize(msg) => write!(f, "Serialization error: {msg}"),
            PersistenceError::UnsupportedVersion { found, supported } => write!(
                f,
                "stored schema version {found} is newer than supported version {supported}"
            ),
            PersistenceError::NotAvailable(msg) => write!(f, "Storage not available: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

/// Errors from adding a scenario to the store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    CapacityExceeded { max: usize },
    EmptyParams,
    Validation(ValidationError),
    Formula(FormulaError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::CapacityExceeded { max } => {
                write!(f, "at most {max} scenarios can be compared at once")
            }
            StoreError::EmptyParams => write!(f, "scenario has no usable parameters"),
            StoreError::Validation(e) => write!(f, "{e}"),
            StoreError::Formula(e) => write!(f, "cannot compute metrics: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Validation(e) => Some(e),
            StoreError::Formula(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(e: ValidationError) -> Self {
        StoreError::Validation(e)
    }
}

impl From<FormulaError> for StoreError {
    fn from(e: FormulaError) -> Self {
        StoreError::Formula(e)
    }
}

/// Comparator preconditions. These are caller bugs, not user-facing conditions.
#[derive(Debug, Clone, PartialEq)]
pub enum CompareError {
    NotEnoughScenarios { found: usize },
    MixedCalculatorTypes {
        expected: CalculatorType,
        found: CalculatorType,
    },
}

impl fmt::Display for CompareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareError::NotEnoughScenarios { found } => {
                write!(f, "comparison needs at least 2 scenarios (found {found})")
            }
            CompareError::MixedCalculatorTypes { expected, found } => write!(
                f,
                "cannot compare {found} scenario against {expected} scenarios"
            ),
        }
    }
}

impl std::error::Error for CompareError {}

/// Stored results that do not match their calculator type
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDecodeError {
    pub calculator: CalculatorType,
    pub missing: &'static str,
}

impl fmt::Display for MetricDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} results are missing metric '{}'",
            self.calculator, self.missing
        )
    }
}

impl std::error::Error for MetricDecodeError {}
