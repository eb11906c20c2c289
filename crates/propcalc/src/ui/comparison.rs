//! Comparison table and insights

use propcalc_core::Comparison;
use propcalc_core::compare::ComparisonRow;
use propcalc_core::format::format_percent;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};

use super::styles::{BEST_COLOR, HEADER_COLOR, HELP_COLOR};
use crate::bridge::ComparisonView;

/// Retained copy of the last comparison pushed by the controller
#[derive(Debug, Default)]
pub struct ComparisonPanel {
    comparison: Option<Comparison>,
}

impl ComparisonView for ComparisonPanel {
    fn render_comparison(&mut self, comparison: &Comparison) {
        self.comparison = Some(comparison.clone());
    }

    fn clear_comparison(&mut self) {
        self.comparison = None;
    }
}

fn table_row(row: &ComparisonRow) -> Row<'static> {
    let mut cells = vec![Cell::from(row.label.clone())];
    cells.extend(row.cells.iter().map(|cell| {
        let style = if cell.is_best {
            Style::default().fg(BEST_COLOR).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Cell::from(cell.formatted.clone()).style(style)
    }));
    cells.push(Cell::from(row.winner.name.clone()).style(Style::default().fg(BEST_COLOR)));
    cells.push(Cell::from(
        row.winner
            .improvement_pct
            .map_or_else(|| "—".to_string(), format_percent),
    ));
    Row::new(cells)
}

impl ComparisonPanel {
    pub fn comparison(&self) -> Option<&Comparison> {
        self.comparison.as_ref()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(comparison) = &self.comparison else {
            let hint = Paragraph::new(Line::from(Span::styled(
                "Add at least two scenarios to compare them",
                Style::default().fg(HELP_COLOR),
            )))
            .block(Block::default().borders(Borders::ALL).title(" Comparison "));
            frame.render_widget(hint, area);
            return;
        };

        let table_height = comparison.table.rows.len() as u16 + 3;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(table_height), Constraint::Min(3)])
            .split(area);

        let header_style = Style::default().fg(HEADER_COLOR).add_modifier(Modifier::BOLD);
        let mut header = vec!["Metric".to_string()];
        header.extend(comparison.table.columns.iter().map(|c| c.name.clone()));
        header.extend(["Best".to_string(), "Gain".to_string()]);

        let mut widths = vec![Constraint::Length(20)];
        widths.extend(comparison.table.columns.iter().map(|_| Constraint::Min(12)));
        widths.extend([Constraint::Length(14), Constraint::Length(8)]);

        let table = Table::new(comparison.table.rows.iter().map(table_row), widths)
            .header(Row::new(header).style(header_style))
            .column_spacing(1)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Comparison: {} ", comparison.calculator_type.label())),
            );
        frame.render_widget(table, chunks[0]);

        let insights: Vec<Line> = comparison
            .insights
            .iter()
            .map(|line| Line::from(format!("• {line}")))
            .collect();
        let insights = Paragraph::new(insights)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" Insights "));
        frame.render_widget(insights, chunks[1]);
    }
}
