//! Editable calculator form.
//!
//! Holds the raw text of every field for the active calculator and exposes it
//! to the controller as a [`FormBridge`].

use propcalc_core::{CalculatorType, ParamValue, Params};

use crate::bridge::FormBridge;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
}

const fn field(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec { key, label }
}

const MORTGAGE_FIELDS: &[FieldSpec] = &[
    field("loanAmount", "Loan amount, ₽"),
    field("interestRate", "Interest rate, %"),
    field("loanTerm", "Term, years"),
];

const RENTAL_FIELDS: &[FieldSpec] = &[
    field("propertyPrice", "Property price, ₽"),
    field("monthlyRent", "Monthly rent, ₽"),
    field("expenses", "Annual expenses, ₽"),
];

const GENERIC_FIELDS: &[FieldSpec] = &[
    field("price", "Price, ₽"),
    field("area", "Area, m²"),
    field("rooms", "Rooms"),
];

/// Input fields shown for a calculator, in tab order
pub fn fields_for(calculator: CalculatorType) -> &'static [FieldSpec] {
    match calculator {
        CalculatorType::Mortgage => MORTGAGE_FIELDS,
        CalculatorType::Rental => RENTAL_FIELDS,
        CalculatorType::Generic => GENERIC_FIELDS,
    }
}

/// Longest text a single field accepts
const MAX_INPUT_LEN: usize = 18;

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    calculator: CalculatorType,
    inputs: Vec<String>,
    focus: usize,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(CalculatorType::default())
    }
}

impl FormState {
    pub fn new(calculator: CalculatorType) -> Self {
        Self {
            calculator,
            inputs: vec![String::new(); fields_for(calculator).len()],
            focus: 0,
        }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        fields_for(self.calculator)
    }

    /// Field specs paired with their current text
    pub fn entries(&self) -> impl Iterator<Item = (&FieldSpec, &str)> {
        self.fields()
            .iter()
            .zip(self.inputs.iter().map(String::as_str))
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused_key(&self) -> Option<&'static str> {
        self.fields().get(self.focus).map(|f| f.key)
    }

    pub fn focus_next(&mut self) {
        if !self.inputs.is_empty() {
            self.focus = (self.focus + 1) % self.inputs.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.inputs.is_empty() {
            self.focus = (self.focus + self.inputs.len() - 1) % self.inputs.len();
        }
    }

    /// Append a typed character to the focused field.
    ///
    /// Only characters that can appear in a number are accepted. Returns
    /// whether the field changed.
    pub fn input_char(&mut self, c: char) -> bool {
        let accepted = c.is_ascii_digit() || matches!(c, '.' | ',' | ' ' | '-');
        match self.inputs.get_mut(self.focus) {
            Some(input) if accepted && input.chars().count() < MAX_INPUT_LEN => {
                input.push(c);
                true
            }
            _ => false,
        }
    }

    /// Delete the last character of the focused field
    pub fn backspace(&mut self) -> bool {
        self.inputs
            .get_mut(self.focus)
            .is_some_and(|input| input.pop().is_some())
    }

    /// Set a field by key; unknown keys are ignored
    pub fn set(&mut self, key: &str, text: impl Into<String>) -> bool {
        let Some(index) = self.fields().iter().position(|f| f.key == key) else {
            return false;
        };
        self.inputs[index] = text.into();
        true
    }

    /// Switch to the next calculator type with an empty form
    pub fn cycle_calculator(&mut self) {
        *self = Self::new(self.calculator.next());
    }

    pub fn set_calculator(&mut self, calculator: CalculatorType) {
        if calculator != self.calculator {
            *self = Self::new(calculator);
        }
    }

    pub fn clear(&mut self) {
        self.inputs.iter_mut().for_each(String::clear);
    }
}

impl FormBridge for FormState {
    fn capture_current_params(&self) -> Params {
        self.entries()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(spec, text)| (spec.key, ParamValue::from_input(text)))
            .collect()
    }

    fn calculator_type(&self) -> CalculatorType {
        self.calculator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_skips_empty_fields() {
        let mut form = FormState::new(CalculatorType::Mortgage);
        form.set("loanAmount", "4 000 000");
        form.set("interestRate", "13,5");

        let params = form.capture_current_params();
        assert_eq!(params.len(), 2);
        assert_eq!(params.number("loanAmount"), Some(4_000_000.0));
        assert_eq!(params.number("interestRate"), Some(13.5));
        assert!(!params.contains_key("loanTerm"));
    }

    #[test]
    fn test_unparseable_text_is_kept_as_text() {
        let mut form = FormState::new(CalculatorType::Rental);
        form.set("monthlyRent", "1.2.3");
        assert_eq!(
            form.capture_current_params().get("monthlyRent"),
            Some(&ParamValue::Text("1.2.3".to_string()))
        );
    }

    #[test]
    fn test_typing_into_focused_field() {
        let mut form = FormState::default();
        form.focus_next();
        assert_eq!(form.focused_key(), Some("interestRate"));

        for c in "6.5x".chars() {
            form.input_char(c);
        }
        assert!(form.backspace());
        assert_eq!(form.capture_current_params().number("interestRate"), Some(6.0));

        form.focus_prev();
        form.focus_prev();
        assert_eq!(form.focused_key(), Some("loanTerm"));
    }

    #[test]
    fn test_cycle_calculator_resets_form() {
        let mut form = FormState::new(CalculatorType::Mortgage);
        form.set("loanAmount", "100");
        form.cycle_calculator();

        assert_eq!(form.calculator_type(), CalculatorType::Rental);
        assert!(form.capture_current_params().is_empty());
        assert!(!form.set("loanAmount", "100"));
    }
}
