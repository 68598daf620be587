//! Leaderboard screen.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
};

use super::{centered, theme};
use crate::app::App;

/// Render the leaderboard.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let area = centered(area, 50, 14);
    let block = Block::default()
        .title("Leaderboard")
        .borders(Borders::ALL)
        .border_style(theme::highlighted());

    let Some(rows) = &app.leaderboard else {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled("Loading…", theme::dimmed()))).block(block),
            area,
        );
        return;
    };

    if rows.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled("No entries yet!", theme::dimmed())))
                .block(block),
            area,
        );
        return;
    }

    let rows = rows.iter().map(|entry| {
        Row::new(vec![
            format!("{}.", entry.rank),
            entry.name.clone(),
            entry.score.clone(),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Length(10),
        ],
    )
    .header(Row::new(vec!["#", "Name", "Minutes"]).style(theme::bold()))
    .block(block);
    frame.render_widget(table, area);
}
