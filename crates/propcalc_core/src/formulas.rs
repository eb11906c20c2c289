//! Closed-form metric formulas, one family per calculator type
//!
//! Every function here is pure. Inputs that would make a formula undefined
//! (zero denominators, non-positive rates or terms) are rejected with a
//! [`FormulaError`] before any arithmetic happens, and results that overflow
//! to infinity or NaN are rejected after it.

use crate::error::FormulaError;
use crate::metric::{GenericResults, MortgageResults, RentalResults, ScenarioResults};
use crate::model::{CalculatorType, Params};

fn required(params: &Params, key: &'static str) -> Result<f64, FormulaError> {
    let value = params
        .number(key)
        .ok_or(FormulaError::MissingParameter(key))?;
    if !value.is_finite() {
        return Err(FormulaError::NonFinite(key));
    }
    Ok(value)
}

fn positive(parameter: &'static str, value: f64) -> Result<f64, FormulaError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(FormulaError::NonPositive { parameter, value })
    }
}

fn finite(metric: &'static str, value: f64) -> Result<f64, FormulaError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FormulaError::Undefined(metric))
    }
}

// ============================================================================
// Mortgage
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MortgageInputs {
    pub loan_amount: f64,
    /// Annual rate in percent
    pub interest_rate: f64,
    /// Term in years
    pub loan_term: f64,
}

impl MortgageInputs {
    pub fn from_params(params: &Params) -> Result<Self, FormulaError> {
        Ok(Self {
            loan_amount: required(params, "loanAmount")?,
            interest_rate: required(params, "interestRate")?,
            loan_term: required(params, "loanTerm")?,
        })
    }
}

/// Annuity payment schedule for a fixed-rate loan
pub fn mortgage(inputs: &MortgageInputs) -> Result<MortgageResults, FormulaError> {
    let principal = positive("loanAmount", inputs.loan_amount)?;
    let monthly_rate = positive("interestRate", inputs.interest_rate / 100.0 / 12.0)?;
    let payments = positive("loanTerm", inputs.loan_term * 12.0)?;

    let growth = (1.0 + monthly_rate).powf(payments);
    // A rate or term too small to move `growth` off 1.0 leaves no annuity
    if growth <= 1.0 {
        return Err(FormulaError::Undefined("monthlyPayment"));
    }
    let monthly_payment = finite(
        "monthlyPayment",
        principal * (monthly_rate * growth) / (growth - 1.0),
    )?;
    let total_payment = finite("totalPayment", monthly_payment * payments)?;
    let total_interest = finite("totalInterest", total_payment - principal)?;
    let effective_rate = finite(
        "effectiveRate",
        ((total_payment / principal - 1.0) * 100.0) / inputs.loan_term,
    )?;

    Ok(MortgageResults {
        monthly_payment,
        total_payment,
        total_interest,
        effective_rate,
    })
}

// ============================================================================
// Rental yield
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RentalInputs {
    pub property_price: f64,
    pub monthly_rent: f64,
    /// Annual running costs
    pub expenses: f64,
}

impl RentalInputs {
    pub fn from_params(params: &Params) -> Result<Self, FormulaError> {
        let expenses = match params.get("expenses") {
            Some(_) => required(params, "expenses")?,
            None => 0.0,
        };
        Ok(Self {
            property_price: required(params, "propertyPrice")?,
            monthly_rent: required(params, "monthlyRent")?,
            expenses,
        })
    }
}

pub fn rental(inputs: &RentalInputs) -> Result<RentalResults, FormulaError> {
    let price = positive("propertyPrice", inputs.property_price)?;

    let annual_rent = finite("annualRent", inputs.monthly_rent * 12.0)?;
    let net_annual_income = finite("netAnnualIncome", annual_rent - inputs.expenses)?;

    Ok(RentalResults {
        annual_rent,
        net_annual_income,
        gross_yield: finite("grossYield", annual_rent / price * 100.0)?,
        net_yield: finite("netYield", net_annual_income / price * 100.0)?,
        monthly_net_income: net_annual_income / 12.0,
    })
}

// ============================================================================
// Generic fallback
// ============================================================================

/// Every finite, positive numeric parameter, unchanged and in order
pub fn generic(params: &Params) -> GenericResults {
    GenericResults {
        values: params
            .iter()
            .filter_map(|(key, value)| {
                value
                    .as_number()
                    .filter(|v| v.is_finite() && *v > 0.0)
                    .map(|v| (key, v))
            })
            .collect(),
    }
}

/// Compute the results record for a parameter snapshot
pub fn compute(calculator: CalculatorType, params: &Params) -> Result<ScenarioResults, FormulaError> {
    Ok(match calculator {
        CalculatorType::Mortgage => {
            ScenarioResults::Mortgage(mortgage(&MortgageInputs::from_params(params)?)?)
        }
        CalculatorType::Rental => {
            ScenarioResults::Rental(rental(&RentalInputs::from_params(params)?)?)
        }
        CalculatorType::Generic => ScenarioResults::Generic(generic(params)),
    })
}
