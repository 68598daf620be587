//! Credits screen.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::{centered, theme};
use crate::app::App;

/// Render the about-us paragraph.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let text = app.about_us.as_deref().map_or_else(
        || Line::from(Span::styled("Loading…", theme::dimmed())),
        |paragraph| Line::from(Span::styled(paragraph, theme::normal())),
    );
    let block = Block::default()
        .title("About us")
        .borders(Borders::ALL)
        .border_style(theme::highlighted());
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        centered(area, 70, 12),
    );
}
