//! Results screen.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::{centered, theme};
use crate::app::{App, Results};

/// Render the results screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let lines = match &app.results {
        Results::Calculating => vec![Line::from(Span::styled(
            "Calculating your results…",
            theme::dimmed(),
        ))],
        Results::Ready {
            minutes,
            percentile,
            fallback,
        } => {
            let mut lines = vec![
                Line::from(Span::styled(
                    format!("Congratulations, {}!", app.session.nickname()),
                    theme::highlighted(),
                )),
                Line::default(),
                Line::from(vec![
                    Span::raw("You escaped the bureaucracy in "),
                    Span::styled(format!("{minutes} minutes"), theme::bold()),
                ]),
                Line::from(vec![
                    Span::raw("That puts you in the "),
                    Span::styled(
                        format!("top {}%", percentile.top_percent()),
                        theme::normal().fg(theme::SUCCESS),
                    ),
                ]),
            ];
            if *fallback {
                lines.push(Line::from(Span::styled(
                    "(the ranking office is closed; estimate shown)",
                    theme::dimmed(),
                )));
            }
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                "Press Enter to play again or l for the leaderboard",
                theme::dimmed(),
            )));
            lines
        }
    };

    let block = Block::default()
        .title("Results")
        .borders(Borders::ALL)
        .border_style(theme::highlighted());
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center),
        centered(area, 64, 11),
    );
}
