//! Narrative summaries of a comparison table

use crate::compare::{ComparisonRow, ComparisonTable};
use crate::format::{format_currency, format_percent};
use crate::model::CalculatorType;

/// Build the insight sentences for a ranked table
pub fn generate(calculator: CalculatorType, table: &ComparisonTable) -> Vec<String> {
    match calculator {
        CalculatorType::Mortgage => mortgage(table),
        CalculatorType::Rental => rental(table),
        CalculatorType::Generic => generic(),
    }
}

fn winner_line(row: &ComparisonRow, what: &str) -> Option<String> {
    let value = row.cells.get(row.winner.index)?;
    Some(format!(
        "\"{}\" has the {what}: {}.",
        row.winner.name, value.formatted
    ))
}

fn column_name(table: &ComparisonTable, index: usize) -> &str {
    table.columns.get(index).map_or("", |c| c.name.as_str())
}

fn mortgage(table: &ComparisonTable) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(line) = table
        .row("monthlyPayment")
        .and_then(|row| winner_line(row, "lowest monthly payment"))
    {
        lines.push(line);
    }

    if let Some(row) = table.row("totalInterest") {
        lines.extend(winner_line(row, "lowest total interest"));

        if let (Some(best), Some(worst)) = (row.best_value(), row.worst_value()) {
            let savings = worst - best;
            if row.worst_index != row.winner.index && savings > 0.0 {
                lines.push(format!(
                    "Choosing \"{}\" over \"{}\" saves {} in interest.",
                    row.winner.name,
                    column_name(table, row.worst_index),
                    format_currency(savings)
                ));
            }
        }
    }

    lines
}

fn rental(table: &ComparisonTable) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(row) = table.row("netYield") {
        lines.extend(winner_line(row, "highest net yield"));

        if let (Some(best), Some(worst)) = (row.best_value(), row.worst_value()) {
            if row.worst_index != row.winner.index {
                lines.push(format!(
                    "Net yield ranges from {} (\"{}\") to {} (\"{}\").",
                    format_percent(worst),
                    column_name(table, row.worst_index),
                    format_percent(best),
                    row.winner.name
                ));
            }
        }
    }

    if let Some(line) = table
        .row("monthlyNetIncome")
        .and_then(|row| winner_line(row, "highest monthly net income"))
    {
        lines.push(line);
    }

    lines
}

fn generic() -> Vec<String> {
    vec!["Compare the scenarios metric by metric in the table above.".to_string()]
}
