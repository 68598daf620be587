//! Start screen: nickname entry and the main menu.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::{centered, notice_line, theme};
use crate::app::{App, StartItem};

/// Render the start screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![
        Line::from(Span::styled("Bureaucracy Simulator", theme::highlighted())),
        Line::from(Span::styled(
            "Every form in triplicate. Every stamp on time.",
            theme::dimmed(),
        )),
        Line::default(),
        Line::from(vec![
            Span::styled("Nickname: ", theme::bold()),
            Span::raw(app.nickname.as_str()),
            Span::styled("▏", theme::input_cursor()),
        ]),
    ];

    lines.push(app.start_notice.as_ref().map_or_else(Line::default, notice_line));
    lines.push(Line::default());

    for (idx, item) in StartItem::ALL.iter().enumerate() {
        let label = match item {
            StartItem::Music => format!("Music: {}", if app.music_on { "on" } else { "off" }),
            StartItem::Play if app.starting => "Start (registering…)".to_string(),
            _ => item.label().to_string(),
        };
        let style = if idx == app.start_item {
            theme::selected()
        } else {
            theme::normal()
        };
        lines.push(Line::from(Span::styled(format!("  {label}  "), style)));
    }

    if app.music_on
        && let Some(song) = app.songs.first()
    {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(format!("♪ {song}"), theme::dimmed())));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::highlighted());
    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, centered(area, 60, 16));
}
