//! Calculator input snapshots

use serde::{Deserialize, Serialize};

use super::ordered::OrderedMap;

/// A single form value as captured from the calculator page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ParamValue {
    /// Numeric view of the value.
    ///
    /// Text is accepted when it parses as a number once group separators are
    /// stripped. Booleans are never numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(v) => Some(*v),
            ParamValue::Text(s) => parse_number_text(s),
            ParamValue::Bool(_) => None,
        }
    }

    /// Value of a raw text input: a number when it parses as one
    pub fn from_input(text: &str) -> Self {
        match parse_number_text(text) {
            Some(v) => ParamValue::Number(v),
            None => ParamValue::Text(text.trim().to_string()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

/// Ordered snapshot of calculator form fields
pub type Params = OrderedMap<ParamValue>;

impl OrderedMap<ParamValue> {
    /// Numeric value of a field, if present and numeric
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(ParamValue::as_number)
    }
}

/// Parse user-typed numbers such as `"4 000 000"` or `"13,5"`.
fn parse_number_text(text: &str) -> Option<f64> {
    let mut cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}' | '_'))
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let commas = cleaned.matches(',').count();
    if cleaned.contains('.') {
        cleaned.retain(|c| c != ',');
    } else if commas == 1 {
        cleaned = cleaned.replace(',', ".");
    } else if commas > 1 {
        cleaned.retain(|c| c != ',');
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_numbers() {
        assert_eq!(parse_number_text("4 000 000"), Some(4_000_000.0));
        assert_eq!(parse_number_text("13,5"), Some(13.5));
        assert_eq!(parse_number_text("1,234,567.5"), Some(1_234_567.5));
        assert_eq!(parse_number_text("  42 "), Some(42.0));
        assert_eq!(parse_number_text(""), None);
        assert_eq!(parse_number_text("abc"), None);
        assert_eq!(parse_number_text("inf"), None);
    }

    #[test]
    fn test_number_view() {
        let params = Params::new()
            .with("loanAmount", 4_000_000.0)
            .with("loanTerm", "20")
            .with("familyMortgage", true);

        assert_eq!(params.number("loanAmount"), Some(4_000_000.0));
        assert_eq!(params.number("loanTerm"), Some(20.0));
        assert_eq!(params.number("familyMortgage"), None);
        assert_eq!(params.number("missing"), None);
    }

    #[test]
    fn test_untagged_json_values() {
        let params: Params =
            serde_json::from_str(r#"{"a":1.5,"b":true,"c":"text"}"#).unwrap();
        assert_eq!(params.get("a"), Some(&ParamValue::Number(1.5)));
        assert_eq!(params.get("b"), Some(&ParamValue::Bool(true)));
        assert_eq!(params.get("c"), Some(&ParamValue::Text("text".to_string())));
    }
}
