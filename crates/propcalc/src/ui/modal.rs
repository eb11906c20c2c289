//! Modal overlays: yes/no confirmation and the scenario name prompt

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::centered_rect;

const MODAL_WIDTH: u16 = 46;
const MODAL_HEIGHT: u16 = 6;

pub fn render_confirm(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let modal = centered_rect(MODAL_WIDTH, MODAL_HEIGHT, area);
    frame.render_widget(Clear, modal);

    let lines = vec![
        Line::from(message.to_string()),
        Line::default(),
        Line::from(vec![
            Span::styled("[y]", Style::default().fg(Color::Green)),
            Span::raw(" confirm   "),
            Span::styled("[n/Esc]", Style::default().fg(Color::Yellow)),
            Span::raw(" cancel"),
        ]),
    ];

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(format!(" {title} ")),
    );
    frame.render_widget(paragraph, modal);
}

/// Text prompt for the name of the scenario about to be added
pub fn render_name_prompt(frame: &mut Frame, area: Rect, name: &str) {
    let modal = centered_rect(MODAL_WIDTH, MODAL_HEIGHT, area);
    frame.render_widget(Clear, modal);

    let lines = vec![
        Line::from(vec![
            Span::raw("Name: "),
            Span::styled(format!("{name}_"), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(Span::styled(
            "Leave empty for an automatic name",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(vec![
            Span::styled("[Enter]", Style::default().fg(Color::Green)),
            Span::raw(" add   "),
            Span::styled("[Esc]", Style::default().fg(Color::Yellow)),
            Span::raw(" cancel"),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(" Add scenario "),
    );
    frame.render_widget(paragraph, modal);
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::ui::test_support::contains;

    #[test]
    fn test_modal_is_drawn_over_content() {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|frame| {
                let filler = Paragraph::new("x".repeat(80 * 20)).wrap(Wrap { trim: false });
                frame.render_widget(filler, frame.area());
                render_confirm(frame, frame.area(), "Clear all", "Remove all 3 scenarios?");
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        assert!(contains(buffer, "Clear all"));
        assert!(contains(buffer, "Remove all 3 scenarios?"));
        assert!(contains(buffer, "[y] confirm"));
    }

    #[test]
    fn test_name_prompt_shows_typed_text() {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|frame| render_name_prompt(frame, frame.area(), "Family"))
            .unwrap();

        let buffer = terminal.backend().buffer();
        assert!(contains(buffer, "Add scenario"));
        assert!(contains(buffer, "Name: Family_"));
    }
}
