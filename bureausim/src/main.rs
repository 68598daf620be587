//! `bureausim`: the bureaucracy simulator in a terminal.
//!
//! Talks to a backend over REST with basic auth. Configuration via CLI
//! flags, environment variables, or config file
//! (`~/.config/bureausim/config.toml`).
//!
//! ```bash
//! # Against a local front desk
//! cargo run --bin bureausim-desk &
//! cargo run --bin bureausim
//!
//! # Against another backend
//! cargo run --bin bureausim -- --api-url http://desk.example:8000 \
//!     --api-user admin --api-password supersecret
//! ```

use std::io;
use std::path::Path;
use std::time::Instant;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use bureausim::api::HttpBackend;
use bureausim::app::App;
use bureausim::config::{CliArgs, ClientConfig};
use bureausim::net::{self, ApiCommand, ApiEvent};
use bureausim::ui;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Logs go to a file; ratatui owns stdout.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(api = %config.api_url, "bureausim starting");

    let backend = HttpBackend::new(config.to_backend_config()).map_err(|e| {
        eprintln!("Error: {e}");
        io::Error::other(e)
    })?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(terminal_backend)?;

    let result = run_app(&mut terminal, backend, &config);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("bureausim exiting");
    result
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("bureausim.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    backend: HttpBackend,
    config: &ClientConfig,
) -> io::Result<()> {
    let mut app = App::new(config.flows.clone(), config.timing);
    let (cmd_tx, mut evt_rx) = net::spawn_api(backend, config.channel_capacity);

    loop {
        // Step 1: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 2: Drain all pending ApiEvents (non-blocking).
        drain_api_events(&mut app, &mut evt_rx);

        // Step 3: Advance flow deadlines.
        app.tick(Instant::now());

        // Step 4: Poll for terminal input events.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key_event(key, Instant::now());
        }

        // Step 5: Hand queued commands to the worker.
        app.dispatch_commands(&cmd_tx);

        if app.should_quit {
            let _ = cmd_tx.try_send(ApiCommand::Shutdown);
            return Ok(());
        }
    }
}

fn drain_api_events(app: &mut App, rx: &mut mpsc::Receiver<ApiEvent>) {
    while let Ok(event) = rx.try_recv() {
        tracing::trace!(?event, "api event");
        app.apply_event(event, Instant::now());
    }
}

