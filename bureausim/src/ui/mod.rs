//! Terminal UI rendering.
//!
//! One module per screen. Everything reads from [`App`]; nothing here
//! mutates state.

pub mod credits;
pub mod leaderboard;
pub mod office;
pub mod results;
pub mod start;
pub mod status_bar;
pub mod task;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
};

use crate::app::{App, Screen};
use crate::tasks::Notice;

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    let content_area = main_chunks[0];
    let status_area = main_chunks[1];

    match app.screen {
        Screen::Start => start::render(frame, content_area, app),
        Screen::Office => office::render(frame, content_area, app),
        Screen::Task => task::render(frame, content_area, app),
        Screen::Results => results::render(frame, content_area, app),
        Screen::Leaderboard => leaderboard::render(frame, content_area, app),
        Screen::Credits => credits::render(frame, content_area, app),
    }

    status_bar::render(frame, status_area, app);
}

/// A notice as a styled line.
fn notice_line(notice: &Notice) -> Line<'_> {
    Line::from(Span::styled(
        notice.text.as_str(),
        theme::notice(notice.tone),
    ))
}

/// A rectangle of at most `width` x `height`, centred in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
