//! Downloadable exports of a comparison
//!
//! JSON carries the full scenario list plus a summary block. CSV carries the
//! rendered comparison table for spreadsheet tools.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::compare::Comparison;
use crate::model::{CalculatorType, Scenario};
use crate::persistence::CURRENT_VERSION;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub scenario_count: usize,
    /// `None` for an empty list or mixed calculator types
    pub calculator_type: Option<CalculatorType>,
    pub earliest: Option<Timestamp>,
    pub latest: Option<Timestamp>,
}

impl ExportSummary {
    pub fn from_scenarios(scenarios: &[Scenario]) -> Self {
        let calculator_type = scenarios.first().map(|s| s.calculator_type).filter(|calc| {
            scenarios.iter().all(|s| s.calculator_type == *calc)
        });

        Self {
            scenario_count: scenarios.len(),
            calculator_type,
            earliest: scenarios.iter().map(|s| s.created_at).min(),
            latest: scenarios.iter().map(|s| s.created_at).max(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonExport {
    pub version: u32,
    pub exported_at: Timestamp,
    pub scenarios: Vec<Scenario>,
    pub summary: ExportSummary,
}

impl ComparisonExport {
    pub fn new(scenarios: &[Scenario], exported_at: Timestamp) -> Self {
        Self {
            version: CURRENT_VERSION,
            exported_at,
            scenarios: scenarios.to_vec(),
            summary: ExportSummary::from_scenarios(scenarios),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Suggested download file name, e.g. `comparison-20250101T120000Z.json`
    pub fn file_name(&self) -> String {
        export_file_name(self.exported_at, "json")
    }
}

/// `comparison-{UTC timestamp}.{extension}`
pub fn export_file_name(at: Timestamp, extension: &str) -> String {
    format!("comparison-{}.{extension}", at.strftime("%Y%m%dT%H%M%SZ"))
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn csv_line(fields: impl IntoIterator<Item = String>) -> String {
    let mut line = fields
        .into_iter()
        .map(|f| csv_field(&f))
        .collect::<Vec<_>>()
        .join(",");
    line.push_str("\r\n");
    line
}

/// Render the comparison table as CSV (RFC 4180 quoting, CRLF line endings)
pub fn to_csv(comparison: &Comparison) -> String {
    let table = &comparison.table;

    let header = std::iter::once("Metric".to_string())
        .chain(table.columns.iter().map(|c| c.name.clone()))
        .chain(["Best".to_string(), "Improvement %".to_string()]);
    let mut out = csv_line(header);

    for row in &table.rows {
        let improvement = row
            .winner
            .improvement_pct
            .map(|v| format!("{v:.2}"))
            .unwrap_or_default();
        let fields = std::iter::once(row.label.clone())
            .chain(row.cells.iter().map(|c| c.formatted.clone()))
            .chain([row.winner.name.clone(), improvement]);
        out.push_str(&csv_line(fields));
    }

    out
}
