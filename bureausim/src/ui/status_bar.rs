//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, Screen};
use crate::tasks::Flow;
use crate::tasks::coffee::CoffeeStage;
use crate::tasks::signature::SignatureStage;

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let help_text = help_for(app);

    let mut spans = vec![
        Span::styled(concat!("Bureausim v", env!("CARGO_PKG_VERSION")), theme::bold()),
        Span::raw(" | "),
    ];
    if app.session.seed().is_some() {
        let dot = if app.session.is_running() {
            theme::SUCCESS
        } else {
            theme::WARNING
        };
        spans.push(Span::styled("●", theme::normal().fg(dot)));
        spans.push(Span::raw(format!(" {} ", app.session.format_elapsed())));
        spans.push(Span::raw("| "));
    }
    spans.push(Span::styled(help_text, theme::dimmed()));

    let paragraph = Paragraph::new(Line::from(spans)).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}

fn help_for(app: &App) -> &'static str {
    match app.screen {
        Screen::Start => "type: nickname | ↑↓: menu | Enter: select | Esc: quit",
        Screen::Office => "↑↓/jk: department | Enter: open | f: finish | Ctrl+C: quit",
        Screen::Task => app
            .open_task
            .as_ref()
            .map_or("Esc: back", |task| flow_help(&task.flow)),
        Screen::Results => "Enter: back to start | l: leaderboard",
        Screen::Leaderboard | Screen::Credits => "Esc/Enter: back",
    }
}

const fn flow_help(flow: &Flow) -> &'static str {
    match flow {
        Flow::Captcha(_) => "←→↑↓: move | Space: select | Enter: verify | r: reload | Esc: back",
        Flow::Form(_) => "Tab/↑↓: field | Enter: submit | Esc: back",
        Flow::Puzzle(f) if f.can_retry() => "r: retry | Esc: back",
        Flow::Puzzle(_) | Flow::Generic(_) => "type: answer | Enter: submit | Esc: back",
        Flow::Coffee(f) => match f.stage() {
            CoffeeStage::Queue => "t: take number | s: skip the line | Enter: continue | Esc: back",
            CoffeeStage::CoffeePrompt => "b: buy coffee | g: go back | Esc: back",
            CoffeeStage::BriberySuccess => "Enter: continue | Esc: back",
            CoffeeStage::Upload => "type: file name | Enter: upload | Esc: back",
        },
        Flow::Signature(f) => match f.stage() {
            SignatureStage::Queue => "t: take number | s: skip the line | Enter: go in | Esc: back",
            SignatureStage::CoffeePrompt => "b: bribe | g: go back | Esc: back",
            SignatureStage::KickedOut => "Enter: get out | Esc: back",
            SignatureStage::Forge => "←→↑↓: move | Space: pen | c: clear | Enter: submit | Esc: back",
        },
        Flow::Display(_) => "+/-: brightness | Enter: complete audit | Esc: back",
    }
}
