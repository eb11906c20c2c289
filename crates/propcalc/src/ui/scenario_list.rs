//! Stored scenarios with the current selection

use propcalc_core::Scenario;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use super::styles::{FOCUS_COLOR, HELP_COLOR, focused_block};

fn item(scenario: &Scenario) -> ListItem<'static> {
    let created = scenario.created_at.strftime("%Y-%m-%d %H:%M").to_string();
    ListItem::new(Line::from(vec![
        Span::styled(format!("{:<4}", scenario.id.to_string()), Style::default().fg(HELP_COLOR)),
        Span::raw(scenario.name.clone()),
        Span::styled(
            format!("  {} · {created}", scenario.calculator_type.label()),
            Style::default().fg(HELP_COLOR),
        ),
    ]))
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    scenarios: &[Scenario],
    max: usize,
    state: &mut ListState,
) {
    // Keys act on the form and the list at once, so only the form takes focus
    let block = focused_block(&format!("Scenarios {}/{}", scenarios.len(), max), false);

    if scenarios.is_empty() {
        let hint = Paragraph::new(Line::from(Span::styled(
            "Fill in the form and press Enter to add a scenario",
            Style::default().fg(HELP_COLOR),
        )))
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let list = List::new(scenarios.iter().map(item).collect::<Vec<_>>())
        .block(block)
        .highlight_style(
            Style::default()
                .fg(FOCUS_COLOR)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, state);
}

#[cfg(test)]
mod tests {
    use propcalc_core::{CalculatorType, MemoryPersistence, Params, ScenarioStore, StoreConfig};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::ui::test_support::contains;

    #[test]
    fn test_lists_scenarios_with_selection() {
        let mut store = ScenarioStore::open(MemoryPersistence::new(), StoreConfig::default());
        let params = Params::new().with("price", 100.0);
        store.add("First", params.clone(), CalculatorType::Generic).unwrap();
        store.add("", params, CalculatorType::Generic).unwrap();

        let mut state = ListState::default().with_selected(Some(1));
        let mut terminal = Terminal::new(TestBackend::new(60, 6)).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), store.list(), 3, &mut state))
            .unwrap();

        let buffer = terminal.backend().buffer();
        assert!(contains(buffer, "Scenarios 2/3"));
        assert!(contains(buffer, "#1  First"));
        assert!(contains(buffer, "> #2  Сценарий 2"));
        assert_ne!(buffer[(0, 0)].fg, FOCUS_COLOR);
    }

    #[test]
    fn test_empty_list_shows_hint() {
        let mut terminal = Terminal::new(TestBackend::new(60, 4)).unwrap();
        terminal
            .draw(|frame| {
                render(frame, frame.area(), &[], 3, &mut ListState::default())
            })
            .unwrap();
        assert!(contains(terminal.backend().buffer(), "press Enter to add"));
    }
}
