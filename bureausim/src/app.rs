//! Application state and event handling.
//!
//! [`App`] owns the one [`GameSession`], the current screen, and the open
//! task flow. Key presses and [`ApiEvent`]s go in; [`ApiCommand`]s queue up
//! in an outbox that the main loop drains into the API worker.

use std::collections::VecDeque;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::{self, error::TrySendError};

use bureausim_proto::department::Department;
use bureausim_proto::leaderboard::{RankedEntry, rank};
use bureausim_proto::score::{Percentile, format_minutes};
use bureausim_proto::task::{TaskId, TaskType};

use crate::net::{ApiCommand, ApiEvent};
use crate::session::{GameSession, MAX_NICKNAME_LEN, SessionTiming, random_seed, validate_nickname};
use crate::tasks::{FlowEffect, FlowKey, FlowSettings, Notice, OpenTask, TextInput, practice};

/// Shown when Finish is pressed with tasks outstanding.
pub const FINISH_BLOCKED: &str = "Please complete all tasks before finishing!";

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Nickname entry and menu.
    Start,
    /// Department sidebar, timer, chat, to-do list.
    Office,
    /// An open department.
    Task,
    /// Final time and percentile.
    Results,
    /// Ranked scores.
    Leaderboard,
    /// About-us paragraph.
    Credits,
}

/// Start-screen menu entries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartItem {
    /// Register and begin.
    Play,
    /// Show the leaderboard.
    Leaderboard,
    /// Show the credits.
    Credits,
    /// Toggle the music flag.
    Music,
}

impl StartItem {
    /// All entries in order.
    pub const ALL: [Self; 4] = [Self::Play, Self::Leaderboard, Self::Credits, Self::Music];

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Play => "Start",
            Self::Leaderboard => "Leaderboard",
            Self::Credits => "Credits",
            Self::Music => "Music",
        }
    }
}

/// Results screen state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Results {
    /// Waiting for the backend.
    Calculating,
    /// Score known.
    Ready {
        /// Final time in minutes, two decimals.
        minutes: String,
        /// Reported percentile.
        percentile: Percentile,
        /// The percentile is the default, not the backend's.
        fallback: bool,
    },
}

/// Main application state.
pub struct App {
    /// Current screen.
    pub screen: Screen,
    /// The game session.
    pub session: GameSession,
    /// Nickname being typed on the start screen.
    pub nickname: TextInput,
    /// Highlighted start-menu entry.
    pub start_item: usize,
    /// Inline message on the start screen.
    pub start_notice: Option<Notice>,
    /// Registration is in flight.
    pub starting: bool,
    /// Highlighted department in the office sidebar.
    pub selected_department: usize,
    /// Inline message in the office.
    pub office_notice: Option<Notice>,
    /// The open department, while on [`Screen::Task`].
    pub open_task: Option<OpenTask>,
    /// Results screen state.
    pub results: Results,
    /// Ranked rows; `None` while loading.
    pub leaderboard: Option<Vec<RankedEntry>>,
    /// Credits text; `None` while loading.
    pub about_us: Option<String>,
    /// Start-screen song list.
    pub songs: Vec<String>,
    /// Music on/off. Nothing is played.
    pub music_on: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
    settings: FlowSettings,
    pending_seed: Option<u32>,
    outbox: Vec<ApiCommand>,
}

impl App {
    /// Create the app on the start screen and queue the song list fetch.
    #[must_use]
    pub fn new(settings: FlowSettings, timing: SessionTiming) -> Self {
        Self {
            screen: Screen::Start,
            session: GameSession::new(timing),
            nickname: TextInput::with_limit(MAX_NICKNAME_LEN * 2),
            start_item: 0,
            start_notice: None,
            starting: false,
            selected_department: 0,
            office_notice: None,
            open_task: None,
            results: Results::Calculating,
            leaderboard: None,
            about_us: None,
            songs: Vec::new(),
            music_on: false,
            should_quit: false,
            settings,
            pending_seed: None,
            outbox: vec![ApiCommand::LoadStartScreen],
        }
    }

    /// Take every command queued since the last call.
    pub fn take_commands(&mut self) -> Vec<ApiCommand> {
        std::mem::take(&mut self.outbox)
    }

    /// Hand queued commands to the API worker without blocking.
    ///
    /// When the channel is full the unsent commands stay queued, in order,
    /// ahead of anything queued later, and go out on the next call.
    pub fn dispatch_commands(&mut self, tx: &mpsc::Sender<ApiCommand>) {
        let mut pending = std::mem::take(&mut self.outbox).into_iter();
        while let Some(cmd) = pending.next() {
            match tx.try_send(cmd) {
                Ok(()) => {}
                Err(TrySendError::Full(cmd)) => {
                    tracing::debug!(?cmd, "api worker busy, command held back");
                    self.outbox = std::iter::once(cmd).chain(pending).collect();
                    return;
                }
                Err(TrySendError::Closed(cmd)) => {
                    tracing::error!(?cmd, "api worker gone, command dropped");
                }
            }
        }
    }

    /// Handle a key event.
    pub fn handle_key_event(&mut self, key: KeyEvent, now: Instant) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Start => self.handle_start_key(key),
            Screen::Office => self.handle_office_key(key, now),
            Screen::Task => self.handle_task_key(key, now),
            Screen::Results if matches!(self.results, Results::Ready { .. }) => match key.code {
                KeyCode::Enter => self.back_to_start(),
                KeyCode::Char('l') => {
                    self.back_to_start();
                    self.open_leaderboard();
                }
                _ => {}
            },
            Screen::Results => {}
            Screen::Leaderboard | Screen::Credits => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                    self.screen = Screen::Start;
                }
            }
        }
    }

    fn handle_start_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Up => self.start_item = self.start_item.saturating_sub(1),
            KeyCode::Down => {
                self.start_item = (self.start_item + 1).min(StartItem::ALL.len() - 1);
            }
            KeyCode::Enter => match StartItem::ALL[self.start_item] {
                StartItem::Play => self.begin(),
                StartItem::Leaderboard => self.open_leaderboard(),
                StartItem::Credits => self.open_credits(),
                StartItem::Music => self.toggle_music(),
            },
            KeyCode::Backspace => self.nickname.pop(),
            KeyCode::Char(c) => self.nickname.push(c),
            _ => {}
        }
    }

    fn handle_office_key(&mut self, key: KeyEvent, now: Instant) {
        let count = bureausim_proto::department::DEPARTMENTS.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_department = self.selected_department.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected_department = (self.selected_department + 1).min(count - 1);
            }
            KeyCode::Enter => self.open_department(self.selected_department, now),
            KeyCode::Char('f' | 'F') => self.finish(),
            _ => {}
        }
    }

    fn handle_task_key(&mut self, key: KeyEvent, now: Instant) {
        if key.code == KeyCode::Esc {
            self.leave_task();
            return;
        }
        let Some(flow_key) = flow_key(key) else {
            return;
        };
        let effects = match self.open_task.as_mut() {
            Some(task) => task.flow.on_key(flow_key, now),
            None => return,
        };
        self.run_effects(effects, now);
    }

    /// Validate the nickname and ask the backend to register it.
    ///
    /// An invalid nickname shows a message and sends nothing.
    pub fn begin(&mut self) {
        if self.starting {
            return;
        }
        match validate_nickname(self.nickname.as_str()) {
            Ok(nickname) => {
                let seed = random_seed();
                self.pending_seed = Some(seed);
                self.starting = true;
                self.start_notice = Some(Notice::info("Registering with the front desk…"));
                self.outbox.push(ApiCommand::StartSession { nickname, seed });
            }
            Err(e) => self.start_notice = Some(Notice::error(e.to_string())),
        }
    }

    /// Show the leaderboard and fetch it.
    pub fn open_leaderboard(&mut self) {
        self.leaderboard = None;
        self.screen = Screen::Leaderboard;
        self.outbox.push(ApiCommand::LoadLeaderboard);
    }

    /// Show the credits and fetch them.
    pub fn open_credits(&mut self) {
        self.about_us = None;
        self.screen = Screen::Credits;
        self.outbox.push(ApiCommand::LoadAboutUs);
    }

    /// Flip the music flag.
    pub const fn toggle_music(&mut self) {
        self.music_on = !self.music_on;
    }

    /// Go to the office, or back to the start screen when there is nothing
    /// to do there.
    pub fn enter_office(&mut self) {
        if self.session.tasks().is_empty() {
            tracing::debug!("no tasks assigned, back to start");
            self.session.reset();
            self.screen = Screen::Start;
            return;
        }
        self.session.resume_clock();
        self.screen = Screen::Office;
    }

    /// Open the department at sidebar position `index`.
    pub fn open_department(&mut self, index: usize, now: Instant) {
        let Some((department, task_id)) = self.session.departments().nth(index) else {
            return;
        };
        let kind = self.kind_for(department, task_id);
        let task = OpenTask::new(task_id, kind, department.name, &self.settings);
        tracing::info!(
            department = department.name,
            task = %task_id,
            practice = task.is_practice(),
            "department opened"
        );
        let effects = task.flow.open();
        self.open_task = Some(task);
        self.office_notice = None;
        self.screen = Screen::Task;
        self.run_effects(effects, now);
    }

    fn kind_for(&self, department: &Department, task_id: TaskId) -> TaskType {
        self.session
            .tasks()
            .iter()
            .find(|t| t.id == task_id && !task_id.is_sentinel())
            .map_or(department.task_type, |t| t.task_type)
    }

    /// Close the task screen without completing it.
    pub fn leave_task(&mut self) {
        self.open_task = None;
        self.enter_office();
    }

    /// Apply the completion gate and, if it passes, submit the score.
    pub fn finish(&mut self) {
        if !self.session.all_tasks_completed() {
            self.office_notice = Some(Notice::error(FINISH_BLOCKED));
            return;
        }
        self.session.stop();
        self.results = Results::Calculating;
        self.screen = Screen::Results;
        self.outbox.push(ApiCommand::SubmitScore {
            nickname: self.session.nickname().to_string(),
            elapsed_secs: self.session.elapsed_secs(),
        });
    }

    /// Leave the results screen for a fresh start screen.
    pub fn back_to_start(&mut self) {
        self.session.reset();
        self.nickname.clear();
        self.start_notice = None;
        self.office_notice = None;
        self.results = Results::Calculating;
        self.selected_department = 0;
        self.screen = Screen::Start;
    }

    /// Advance the open flow's timers.
    pub fn tick(&mut self, now: Instant) {
        let effects = match self.open_task.as_mut() {
            Some(task) => task.flow.tick(now),
            None => return,
        };
        self.run_effects(effects, now);
    }

    /// Apply a reply from the API worker.
    pub fn apply_event(&mut self, event: ApiEvent, now: Instant) {
        match event {
            ApiEvent::StartScreenLoaded { songs } => self.songs = songs,
            ApiEvent::SessionStarted { nickname, response } => {
                if !self.starting {
                    return;
                }
                self.starting = false;
                self.start_notice = None;
                let seed = self.pending_seed.take().unwrap_or_else(random_seed);
                let messages = response.message_texts();
                self.session
                    .start_seeded(&nickname, seed, response.to_do_list, messages);
                self.selected_department = 0;
                self.enter_office();
            }
            ApiEvent::StartFailed(reason) => {
                self.starting = false;
                self.pending_seed = None;
                self.start_notice = Some(Notice::error(format!("Could not start: {reason}")));
            }
            ApiEvent::ContentLoaded { task_id, content } => {
                if let Some(task) = self.task_mut(task_id) {
                    match content {
                        Ok(content) => task.flow.apply_content(content),
                        Err(reason) => task.flow.content_failed(&reason),
                    }
                }
            }
            ApiEvent::CheckResult { task_id, verdict } => {
                let effects = match self.task_mut(task_id) {
                    Some(task) => task.flow.apply_verdict(verdict, now),
                    None => {
                        tracing::debug!(task = %task_id, ?verdict, "verdict for a closed task");
                        return;
                    }
                };
                self.run_effects(effects, now);
            }
            ApiEvent::PaymentResult { task_id, status } => {
                if let Some(task) = self.task_mut(task_id) {
                    task.flow.apply_payment(status, now);
                }
            }
            ApiEvent::ScoreRecorded {
                percentile,
                fallback,
            } => {
                if self.screen == Screen::Results {
                    self.results = Results::Ready {
                        minutes: format_minutes(self.session.elapsed_secs()),
                        percentile,
                        fallback,
                    };
                }
            }
            ApiEvent::LeaderboardLoaded(entries) => self.leaderboard = Some(rank(entries)),
            ApiEvent::AboutUsLoaded(text) => self.about_us = Some(text),
        }
    }

    fn task_mut(&mut self, task_id: TaskId) -> Option<&mut OpenTask> {
        self.open_task
            .as_mut()
            .filter(|task| task.task_id == task_id && !task.is_practice())
    }

    /// Carry out flow effects. Practice tasks are served locally.
    fn run_effects(&mut self, effects: Vec<FlowEffect>, now: Instant) {
        let mut queue: VecDeque<FlowEffect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            let Some(task) = self.open_task.as_mut() else {
                return;
            };
            let offline = task.is_practice();
            match effect {
                FlowEffect::FetchContent if offline => match practice::content(task.kind) {
                    Some(content) => task.flow.apply_content(content),
                    None => task.flow.content_failed("no practice content"),
                },
                FlowEffect::FetchContent => self.outbox.push(ApiCommand::FetchContent {
                    task_id: task.task_id,
                    kind: task.kind,
                }),
                FlowEffect::Check(payload) if offline => {
                    let verdict = practice::judge(&payload);
                    queue.extend(task.flow.apply_verdict(Ok(verdict), now));
                }
                FlowEffect::Check(payload) => self.outbox.push(ApiCommand::Check {
                    task_id: task.task_id,
                    payload,
                }),
                FlowEffect::CheckPayment if offline => {
                    task.flow.apply_payment(Ok(practice::PAYMENT_ACCEPTED), now);
                }
                FlowEffect::CheckPayment => self.outbox.push(ApiCommand::CheckPayment {
                    task_id: task.task_id,
                }),
                FlowEffect::Complete => {
                    if !offline {
                        self.session.mark_task_complete(task.task_id);
                    }
                }
                FlowEffect::ReturnToOffice => {
                    self.leave_task();
                    return;
                }
            }
        }
    }
}

/// Map a terminal key to a flow key.
#[must_use]
pub const fn flow_key(key: KeyEvent) -> Option<FlowKey> {
    match key.code {
        KeyCode::Char(c) => Some(FlowKey::Char(c)),
        KeyCode::Enter => Some(FlowKey::Enter),
        KeyCode::Backspace => Some(FlowKey::Backspace),
        KeyCode::Up => Some(FlowKey::Up),
        KeyCode::Down => Some(FlowKey::Down),
        KeyCode::Left => Some(FlowKey::Left),
        KeyCode::Right => Some(FlowKey::Right),
        KeyCode::Tab => Some(FlowKey::Tab),
        KeyCode::BackTab => Some(FlowKey::BackTab),
        _ => None,
    }
}
