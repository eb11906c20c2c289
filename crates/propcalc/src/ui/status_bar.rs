use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::styles::{HELP_COLOR, notification_color};
use crate::notification::{Notification, NotificationLevel};

const HELP_TEXT: &str = "Tab: field | Enter: add | ↑/↓: select | Del: remove | Ctrl+T: calculator | Ctrl+L: clear | Ctrl+E/X: export | Ctrl+Q: quit";

fn level_label(level: NotificationLevel) -> &'static str {
    match level {
        NotificationLevel::Info => "Info: ",
        NotificationLevel::Success => "Done: ",
        NotificationLevel::Warning => "Warning: ",
        NotificationLevel::Error => "Error: ",
    }
}

/// Active notification, or key help when there is none
pub fn render(frame: &mut Frame, area: Rect, notification: Option<&Notification>) {
    let content = match notification {
        Some(note) => Line::from(vec![
            Span::styled(
                level_label(note.level),
                Style::default()
                    .fg(notification_color(note.level))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(note.message.clone()),
            Span::styled("  (Esc to dismiss)", Style::default().fg(HELP_COLOR)),
        ]),
        None => Line::from(Span::styled(HELP_TEXT, Style::default().fg(HELP_COLOR))),
    };

    let paragraph = Paragraph::new(content).block(Block::default().borders(Borders::TOP));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::{Terminal, backend::TestBackend};
    use web_time::Instant;

    use super::*;
    use crate::ui::test_support::contains;

    #[test]
    fn test_notification_replaces_help() {
        let note = Notification::new(
            NotificationLevel::Error,
            "at most 3 scenarios can be compared at once",
            Instant::now(),
            Duration::from_secs(4),
        );

        let mut terminal = Terminal::new(TestBackend::new(120, 2)).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), Some(&note)))
            .unwrap();
        assert!(contains(
            terminal.backend().buffer(),
            "Error: at most 3 scenarios"
        ));

        terminal.draw(|frame| render(frame, frame.area(), None)).unwrap();
        assert!(contains(terminal.backend().buffer(), "Enter: add"));
    }
}
