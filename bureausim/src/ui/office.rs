//! Office screen: departments, briefing, timer, chatbot, to-do list.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use super::{notice_line, theme};
use crate::app::App;

const BRIEFING: &str = "Welcome to the Ministry. Your to-do list was issued by the front desk \
and must be completed in full before you may leave. Visit each department, obey its \
procedures, and press Finish when every item carries a stamp. The clock is running.";

/// Render the office.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(45),
            Constraint::Percentage(25),
        ])
        .split(area);

    render_departments(frame, columns[0], app);

    let middle = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(5)])
        .split(columns[1]);
    render_briefing(frame, middle[0], app);
    render_chatbot(frame, middle[1], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(columns[2]);
    render_timer(frame, right[0], app);
    render_todo(frame, right[1], app);
}

fn render_departments(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .session
        .departments()
        .enumerate()
        .map(|(idx, (department, task_id))| {
            let marker = if task_id.is_sentinel() {
                Span::styled("  ", theme::dimmed())
            } else if app.session.page_completed(department.page_name) {
                Span::styled("✓ ", theme::normal().fg(theme::SUCCESS))
            } else {
                Span::styled("• ", theme::normal().fg(theme::WARNING))
            };
            let style = if idx == app.selected_department {
                theme::selected()
            } else {
                theme::normal()
            };
            ListItem::new(Line::from(vec![marker, Span::raw(department.name)])).style(style)
        })
        .collect();

    let block = Block::default()
        .title(Span::styled(
            "Departments",
            theme::panel_title(theme::SIDEBAR_TITLE),
        ))
        .borders(Borders::ALL)
        .border_style(theme::highlighted());
    frame.render_widget(List::new(items).block(block), area);
}

fn render_briefing(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("Good day, {}.", app.session.nickname()),
            theme::bold(),
        )),
        Line::default(),
        Line::from(Span::styled(BRIEFING, theme::normal())),
        Line::default(),
        Line::from(Span::styled("[ Finish (f) ]", theme::highlighted())),
    ];
    if let Some(notice) = &app.office_notice {
        lines.push(notice_line(notice));
    }
    let block = Block::default().title("Briefing").borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_chatbot(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(Span::styled(
            "Help Desk Bot",
            theme::panel_title(theme::CHAT_TITLE),
        ))
        .borders(Borders::ALL);
    let paragraph = Paragraph::new(app.session.current_message())
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_timer(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title("Time").borders(Borders::ALL);
    let paragraph = Paragraph::new(Span::styled(app.session.format_elapsed(), theme::bold()))
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_todo(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .session
        .tasks()
        .iter()
        .map(|task| {
            let line = if task.completed {
                Line::from(vec![
                    Span::styled("[APPROVED] ", theme::normal().fg(theme::STAMP)),
                    Span::styled(task.display_label(), theme::dimmed()),
                ])
            } else {
                Line::from(vec![Span::raw("[ ] "), Span::raw(task.display_label())])
            };
            ListItem::new(line)
        })
        .collect();

    let block = Block::default()
        .title(Span::styled("To-do", theme::panel_title(theme::TASKS_TITLE)))
        .borders(Borders::ALL);
    frame.render_widget(List::new(items).block(block), area);
}
