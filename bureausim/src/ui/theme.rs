//! Theme and styling constants for the TUI.

use ratatui::style::{Color, Modifier, Style};

use crate::tasks::Tone;

/// Primary foreground color.
pub const FG_PRIMARY: Color = Color::White;

/// Secondary foreground color (dimmed text).
pub const FG_SECONDARY: Color = Color::Gray;

/// Highlight color for focused elements.
pub const HIGHLIGHT: Color = Color::Cyan;

/// Success color.
pub const SUCCESS: Color = Color::Green;

/// Warning color.
pub const WARNING: Color = Color::Yellow;

/// Error color.
pub const ERROR: Color = Color::Red;

/// Stamp ink, used for the approval marks on the to-do list.
pub const STAMP: Color = Color::Rgb(200, 40, 60);

/// Panel title color for the department sidebar.
pub const SIDEBAR_TITLE: Color = Color::Blue;

/// Panel title color for the to-do list.
pub const TASKS_TITLE: Color = Color::Green;

/// Panel title color for the chatbot.
pub const CHAT_TITLE: Color = Color::Cyan;

/// Normal text style.
#[must_use]
pub fn normal() -> Style {
    Style::default().fg(FG_PRIMARY)
}

/// Dimmed text style.
#[must_use]
pub fn dimmed() -> Style {
    Style::default().fg(FG_SECONDARY)
}

/// Bold text style.
#[must_use]
pub fn bold() -> Style {
    Style::default().fg(FG_PRIMARY).add_modifier(Modifier::BOLD)
}

/// Highlighted text style (focused borders, headings).
#[must_use]
pub fn highlighted() -> Style {
    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

/// Selected item style (in lists).
#[must_use]
pub fn selected() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Style for an inline notice.
#[must_use]
pub fn notice(tone: Tone) -> Style {
    match tone {
        Tone::Info => dimmed(),
        Tone::Success => Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD),
        Tone::Error => Style::default().fg(ERROR).add_modifier(Modifier::BOLD),
    }
}

/// Style for the input cursor.
#[must_use]
pub fn input_cursor() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Style for the status bar background.
#[must_use]
pub fn status_bar_bg() -> Style {
    Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 50))
}

/// Style for panel titles with a given color (bold).
#[must_use]
pub fn panel_title(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Screen tint for the audit office, from 5% to 100% brightness.
#[must_use]
pub fn brightness(percent: u8) -> Style {
    let level = u8::try_from(u16::from(percent.min(100)) * 255 / 100).unwrap_or(u8::MAX);
    Style::default().fg(Color::Rgb(level, level, level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_scales_grey() {
        assert_eq!(brightness(100).fg, Some(Color::Rgb(255, 255, 255)));
        assert_eq!(brightness(0).fg, Some(Color::Rgb(0, 0, 0)));
        assert_eq!(brightness(50).fg, Some(Color::Rgb(127, 127, 127)));
    }

    #[test]
    fn notice_tones_differ() {
        assert_ne!(notice(Tone::Success), notice(Tone::Error));
    }
}
