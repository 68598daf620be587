//! Task screen: one renderer per flow.

use ratatui::{
    Frame,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::{notice_line, theme};
use crate::app::App;
use crate::tasks::captcha::{CaptchaFlow, GRID_SIDE};
use crate::tasks::coffee::{CoffeeFlow, CoffeeStage, PAYMENT_PORTAL_URL};
use crate::tasks::display::DisplayFlow;
use crate::tasks::form::{FIELD_LABELS, FormFlow};
use crate::tasks::generic::GenericFlow;
use crate::tasks::puzzle::{self, PuzzleFlow};
use crate::tasks::queue::QueueCounter;
use crate::tasks::signature::{PAD_HEIGHT, PAD_WIDTH, SignatureFlow, SignatureStage};
use crate::tasks::{Flow, OpenTask};

/// Render the open task.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(task) = &app.open_task else {
        return;
    };

    let mut lines = body(task);
    if let Some(notice) = task.flow.notice() {
        lines.push(Line::default());
        lines.push(notice_line(notice));
    }

    let mut title = task.department.to_string();
    if task.is_practice() {
        title.push_str(" (not on your list)");
    }
    let block = Block::default()
        .title(Span::styled(title, theme::highlighted()))
        .borders(Borders::ALL)
        .border_style(theme::highlighted());
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn body(task: &OpenTask) -> Vec<Line<'_>> {
    match &task.flow {
        Flow::Captcha(f) => captcha(f),
        Flow::Form(f) => form(f),
        Flow::Puzzle(f) => puzzles(f),
        Flow::Coffee(f) => coffee(f),
        Flow::Signature(f) => signature(f),
        Flow::Display(f) => display(f),
        Flow::Generic(f) => generic(f),
    }
}

fn input_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let mut spans = vec![
        Span::styled(label, theme::bold()),
        Span::raw(": "),
        Span::raw(value),
    ];
    if focused {
        spans.push(Span::styled("▏", theme::input_cursor()));
    }
    Line::from(spans)
}

fn loading() -> Vec<Line<'static>> {
    vec![Line::from(Span::styled("Loading…", theme::dimmed()))]
}

fn captcha(flow: &CaptchaFlow) -> Vec<Line<'_>> {
    let Some(challenge) = flow.challenge() else {
        return loading();
    };
    let mut lines = vec![
        Line::from(Span::styled(challenge.prompt.as_str(), theme::bold())),
        Line::default(),
    ];
    for row in 0..GRID_SIDE {
        let spans = (0..GRID_SIDE)
            .map(|col| {
                let index = row * GRID_SIDE + col;
                let image = challenge
                    .images
                    .get(usize::from(index))
                    .map_or("?", String::as_str);
                let mark = if flow.is_selected(index) { "■" } else { "□" };
                let mut style = if flow.is_selected(index) {
                    theme::normal().fg(theme::SUCCESS)
                } else {
                    theme::normal()
                };
                if flow.cursor() == index {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Span::styled(format!(" {mark} {image:<14}"), style)
            })
            .collect::<Vec<_>>();
        lines.push(Line::from(spans));
    }
    lines
}

fn form(flow: &FormFlow) -> Vec<Line<'_>> {
    let Some(schema) = flow.schema() else {
        return loading();
    };
    let mut lines = vec![
        Line::from(Span::styled(schema.title.as_str(), theme::bold())),
        Line::from(Span::styled(schema.instructions.as_str(), theme::dimmed())),
        Line::default(),
    ];
    for (idx, (label, value)) in FIELD_LABELS.iter().zip(flow.fields()).enumerate() {
        lines.push(input_line(label, value, idx == flow.focus()));
    }
    lines
}

fn puzzles(flow: &PuzzleFlow) -> Vec<Line<'_>> {
    let mut lines = vec![
        Line::from(Span::styled(puzzle::TITLE, theme::bold())),
        Line::from(Span::styled(puzzle::PREAMBLE, theme::dimmed())),
        Line::default(),
    ];
    if flow.is_loading() {
        lines.extend(loading());
        return lines;
    }
    let Some(item) = flow.current() else {
        return lines;
    };
    let (position, total) = flow.progress();
    lines.push(Line::from(Span::styled(
        format!("Puzzle {position} of {total}: {}", item.title),
        theme::highlighted(),
    )));
    lines.push(Line::from(item.question.as_str()));
    if let Some(sequence) = &item.sequence {
        lines.push(Line::from(Span::styled(sequence.as_str(), theme::bold())));
    }
    if let Some(options) = &item.options {
        lines.push(Line::from(Span::styled(options.join("  |  "), theme::dimmed())));
    }
    lines.push(Line::default());
    lines.push(input_line("Answer", flow.answer(), !flow.is_done()));
    lines
}

fn queue_lines(queue: &QueueCounter) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::raw("Now serving: "),
        Span::styled(format!("{:03}", queue.serving()), theme::bold()),
    ])];
    match queue.ticket() {
        Some(ticket) => {
            lines.push(Line::from(vec![
                Span::raw("Your number: "),
                Span::styled(format!("{ticket:03}"), theme::highlighted()),
            ]));
            if queue.reached() {
                lines.push(Line::from(Span::styled(
                    "Your number has been called.",
                    theme::normal().fg(theme::SUCCESS),
                )));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "Take a number and wait to be called.",
            theme::dimmed(),
        ))),
    }
    lines
}

fn coffee(flow: &CoffeeFlow) -> Vec<Line<'_>> {
    let mut lines = vec![Line::from(Span::styled(
        "The clerk looks very, very tired.",
        theme::bold(),
    ))];
    lines.push(Line::default());
    match flow.stage() {
        CoffeeStage::Queue => lines.extend(queue_lines(flow.queue())),
        CoffeeStage::CoffeePrompt => {
            lines.push(Line::from(
                "\"I could serve you right now... if I had a coffee.\"",
            ));
            if flow.portal_open() {
                lines.push(Line::default());
                lines.push(Line::from(vec![
                    Span::raw("Payment portal: "),
                    Span::styled(PAYMENT_PORTAL_URL, theme::highlighted()),
                ]));
            }
        }
        CoffeeStage::BriberySuccess => {
            lines.push(Line::from(Span::styled(
                "\"Ah, much better. Right this way.\"",
                theme::normal().fg(theme::SUCCESS),
            )));
        }
        CoffeeStage::Upload => {
            lines.push(Line::from(
                "Please submit your request as an e-book (*.epub).",
            ));
            lines.push(Line::default());
            lines.push(input_line("File", flow.file_name(), !flow.is_done()));
        }
    }
    lines
}

fn signature(flow: &SignatureFlow) -> Vec<Line<'_>> {
    let mut lines = vec![Line::from(Span::styled(
        "The Director must sign your request personally.",
        theme::bold(),
    ))];
    lines.push(Line::default());
    match flow.stage() {
        SignatureStage::Queue => lines.extend(queue_lines(flow.queue())),
        SignatureStage::CoffeePrompt => {
            lines.push(Line::from("\"Perhaps a small contribution would speed things up?\""));
        }
        SignatureStage::KickedOut => {
            let text = if flow.leaving() {
                "Security is escorting you out…"
            } else {
                "\"Bribery?! In the Headquarters of Seriousness?\""
            };
            lines.push(Line::from(Span::styled(
                text,
                theme::normal().fg(theme::ERROR),
            )));
        }
        SignatureStage::Forge => {
            let pad = flow.pad();
            lines.push(Line::from(Span::styled(
                "The Director is out. Nobody will notice.",
                theme::dimmed(),
            )));
            lines.push(Line::from(format!("┌{}┐", "─".repeat(PAD_WIDTH))));
            let (cx, cy) = pad.cursor();
            for y in 0..PAD_HEIGHT {
                let row: String = (0..PAD_WIDTH)
                    .map(|x| match (pad.is_inked(x, y), (x, y) == (cx, cy)) {
                        (_, true) if pad.pen_down() => '✎',
                        (_, true) => '+',
                        (true, false) => '█',
                        (false, false) => ' ',
                    })
                    .collect();
                lines.push(Line::from(format!("│{row}│")));
            }
            lines.push(Line::from(format!("└{}┘", "─".repeat(PAD_WIDTH))));
            lines.push(Line::from(Span::styled(
                format!(
                    "Pen {} | ink {}",
                    if pad.pen_down() { "down" } else { "up" },
                    pad.ink()
                ),
                theme::dimmed(),
            )));
        }
    }
    lines
}

fn display(flow: &DisplayFlow) -> Vec<Line<'_>> {
    let level = usize::from(flow.brightness()) / 5;
    vec![
        Line::from(Span::styled(
            "The auditor cannot read your file. Adjust the screen.",
            theme::bold(),
        )),
        Line::default(),
        Line::from(Span::styled(
            "AUDIT REPORT: everything is in order, probably.",
            theme::brightness(flow.brightness()),
        )),
        Line::default(),
        Line::from(vec![
            Span::raw("Brightness: "),
            Span::styled("█".repeat(level), theme::normal().fg(theme::WARNING)),
            Span::raw(format!(" {}%", flow.brightness())),
        ]),
    ]
}

fn generic(flow: &GenericFlow) -> Vec<Line<'_>> {
    vec![
        Line::from(Span::styled(
            "State the nature of your business.",
            theme::bold(),
        )),
        Line::default(),
        input_line("Answer", flow.input(), !flow.is_done()),
    ]
}
