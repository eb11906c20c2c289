//! Calculator form with the live metric preview

use propcalc_core::MetricRecord;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::styles::{HEADER_COLOR, HELP_COLOR, focused_block};
use crate::bridge::FormBridge;
use crate::controller::Preview;
use crate::form::FormState;

fn field_lines(form: &FormState, focused: bool) -> Vec<Line<'static>> {
    let label_width = form
        .fields()
        .iter()
        .map(|f| f.label.chars().count())
        .max()
        .unwrap_or(0);

    form.entries()
        .enumerate()
        .map(|(i, (spec, text))| {
            let is_focused = focused && i == form.focus();
            let marker = if is_focused { "> " } else { "  " };
            let value_style = if is_focused {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            let cursor = if is_focused { "_" } else { "" };

            Line::from(vec![
                Span::raw(marker),
                Span::raw(format!("{:<label_width$}  ", spec.label)),
                Span::styled(format!("{text}{cursor}"), value_style),
            ])
        })
        .collect()
}

fn preview_lines(preview: &Preview) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        "Preview",
        Style::default().fg(HEADER_COLOR).add_modifier(Modifier::BOLD),
    ))];

    match preview {
        Preview::Empty => lines.push(Line::from(Span::styled(
            "Type values to see the metrics",
            Style::default().fg(HELP_COLOR),
        ))),
        Preview::Invalid(message) => lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        ))),
        Preview::Ready(results) => {
            lines.extend(results.metrics().into_iter().map(|metric| {
                Line::from(vec![
                    Span::raw(format!("  {}: ", metric.label)),
                    Span::styled(
                        metric.unit.format(metric.value),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ])
            }));
        }
    }

    lines
}

pub fn render(frame: &mut Frame, area: Rect, form: &FormState, preview: &Preview, focused: bool) {
    let title = format!("{} calculator", form.calculator_type().label());

    let mut lines = field_lines(form, focused);
    lines.push(Line::default());
    lines.extend(preview_lines(preview));

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(focused_block(&title, focused));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use propcalc_core::CalculatorType;
    use propcalc_core::formulas;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::ui::test_support::contains;

    #[test]
    fn test_renders_fields_and_preview() {
        let mut form = FormState::new(CalculatorType::Mortgage);
        form.set("loanAmount", "4000000");
        form.set("interestRate", "13.5");
        form.set("loanTerm", "20");
        let results =
            formulas::compute(CalculatorType::Mortgage, &form.capture_current_params()).unwrap();
        let preview = Preview::Ready(results);

        let mut terminal = Terminal::new(TestBackend::new(50, 14)).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &form, &preview, true))
            .unwrap();

        let buffer = terminal.backend().buffer();
        assert!(contains(buffer, "Mortgage calculator"));
        assert!(contains(buffer, "> Loan amount, ₽"));
        assert!(contains(buffer, "Monthly payment: 48 295 ₽"));
    }

    #[test]
    fn test_renders_validation_message() {
        let form = FormState::new(CalculatorType::Rental);
        let preview = Preview::Invalid("'monthlyRent' is required".to_string());

        let mut terminal = Terminal::new(TestBackend::new(50, 12)).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &form, &preview, false))
            .unwrap();

        let buffer = terminal.backend().buffer();
        assert!(contains(buffer, "Rental yield calculator"));
        assert!(contains(buffer, "'monthlyRent' is required"));
        assert!(!contains(buffer, ">"));
    }
}
