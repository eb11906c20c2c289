//! Boundary between the comparison controller and the host UI.
//!
//! The controller reads the live calculator form through [`FormBridge`] and
//! writes comparison output through [`ComparisonView`]. The terminal front end
//! and the browser facade each provide their own implementations.

use propcalc_core::{CalculatorType, Comparison, Params};

/// Read access to the calculator form currently shown to the user
pub trait FormBridge {
    /// Snapshot of every form field that holds a value, in field order.
    ///
    /// Numeric text is parsed locale-tolerantly; fields that do not parse are
    /// captured as text so validation can report them.
    fn capture_current_params(&self) -> Params;

    fn calculator_type(&self) -> CalculatorType;
}

/// Output surface for the comparison table
pub trait ComparisonView {
    fn render_comparison(&mut self, comparison: &Comparison);

    /// Called when fewer than two scenarios remain
    fn clear_comparison(&mut self);
}

impl<V: ComparisonView + ?Sized> ComparisonView for &mut V {
    fn render_comparison(&mut self, comparison: &Comparison) {
        (**self).render_comparison(comparison)
    }

    fn clear_comparison(&mut self) {
        (**self).clear_comparison()
    }
}
