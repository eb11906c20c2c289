//! Shared colors and blocks

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders};

use crate::notification::NotificationLevel;

/// Border color of the focused panel
pub const FOCUS_COLOR: Color = Color::Yellow;

pub const HELP_COLOR: Color = Color::DarkGray;

pub const HEADER_COLOR: Color = Color::Cyan;

/// Foreground of the winning cell in a comparison row
pub const BEST_COLOR: Color = Color::Green;

/// Bordered block whose border turns yellow when focused
pub fn focused_block(title: &str, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(FOCUS_COLOR)
    } else {
        Style::default()
    };

    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {title} "))
}

pub fn notification_color(level: NotificationLevel) -> Color {
    match level {
        NotificationLevel::Info => Color::Cyan,
        NotificationLevel::Success => Color::Green,
        NotificationLevel::Warning => Color::Yellow,
        NotificationLevel::Error => Color::Red,
    }
}
