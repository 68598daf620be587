//! Bureausim front desk -- development backend for the terminal client.
//!
//! An axum HTTP server implementing the REST contract the client expects:
//! player registration, task content and checks, score recording, the
//! leaderboard, and the credits paragraph. Every endpoint requires HTTP
//! basic auth.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 0.0.0.0:8000
//! cargo run --bin bureausim-desk
//!
//! # Run on custom address with custom credentials
//! cargo run --bin bureausim-desk -- --bind 127.0.0.1:8080 --username clerk --password stamp
//! ```

use std::sync::Arc;

use bureausim_desk::config::{DeskCliArgs, DeskConfig};
use bureausim_desk::desk::{self, DeskState};
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = DeskCliArgs::parse();

    let config = match DeskConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(addr = %config.bind_addr, "starting bureausim front desk");

    let state = Arc::new(DeskState::with_config(&config));

    match desk::start_server_with_state(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "front desk open");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "desk server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start desk server");
            std::process::exit(1);
        }
    }
}
