use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownCalculatorType;

/// Which family of metric formulas applies to a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculatorType {
    #[default]
    Mortgage,
    Rental,
    /// Fallback for pages without a dedicated formula family
    Generic,
}

impl CalculatorType {
    pub const ALL: [CalculatorType; 3] = [
        CalculatorType::Mortgage,
        CalculatorType::Rental,
        CalculatorType::Generic,
    ];

    /// Wire tag used in persisted state and exports
    pub fn tag(self) -> &'static str {
        match self {
            CalculatorType::Mortgage => "mortgage",
            CalculatorType::Rental => "rental",
            CalculatorType::Generic => "generic",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CalculatorType::Mortgage => "Mortgage",
            CalculatorType::Rental => "Rental yield",
            CalculatorType::Generic => "Generic",
        }
    }

    /// Map any tag to a calculator type, falling back to [`CalculatorType::Generic`].
    pub fn from_tag_lossy(tag: &str) -> Self {
        tag.parse().unwrap_or(CalculatorType::Generic)
    }

    /// Next type in cycling order
    pub fn next(self) -> Self {
        match self {
            CalculatorType::Mortgage => CalculatorType::Rental,
            CalculatorType::Rental => CalculatorType::Generic,
            CalculatorType::Generic => CalculatorType::Mortgage,
        }
    }
}

impl fmt::Display for CalculatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for CalculatorType {
    type Err = UnknownCalculatorType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        CalculatorType::ALL
            .into_iter()
            .find(|c| c.tag().eq_ignore_ascii_case(tag))
            .ok_or_else(|| UnknownCalculatorType(tag.to_string()))
    }
}
