//! Configuration for the `bureausim` client.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/bureausim/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::PathBuf;
use std::time::Duration;

use crate::api::client::BackendConfig;
use crate::net::DEFAULT_CHANNEL_CAPACITY;
use crate::session::SessionTiming;
use crate::tasks::FlowSettings;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    api: ApiFileConfig,
    session: SessionFileConfig,
    tasks: TasksFileConfig,
    ui: UiFileConfig,
}

/// `[api]` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ApiFileConfig {
    url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    timeout_secs: Option<u64>,
    channel_capacity: Option<usize>,
}

/// `[session]` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct SessionFileConfig {
    tick_ms: Option<u64>,
    rotate_secs: Option<u64>,
}

/// `[tasks]` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct TasksFileConfig {
    captcha_reload_limit: Option<u32>,
    captcha_reload_window_secs: Option<u64>,
    coffee_queue_step_ms: Option<u64>,
    signature_queue_step_ms: Option<u64>,
    signature_min_ink: Option<usize>,
    return_delay_ms: Option<u64>,
}

/// `[ui]` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    poll_timeout_ms: Option<u64>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    // -- API --
    /// Backend base URL.
    pub api_url: String,
    /// Basic-auth user name.
    pub api_username: String,
    /// Basic-auth password.
    pub api_password: String,
    /// Request timeout; `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
    /// Capacity of the worker's command and event channels.
    pub channel_capacity: usize,

    // -- Session and tasks --
    /// Clock and chatbot periods.
    pub timing: SessionTiming,
    /// Task flow tunables.
    pub flows: FlowSettings,

    // -- UI --
    /// Poll timeout for the TUI event loop.
    pub poll_timeout: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("api_username", &self.api_username)
            .field("request_timeout", &self.request_timeout)
            .field("channel_capacity", &self.channel_capacity)
            .field("timing", &self.timing)
            .field("flows", &self.flows)
            .field("poll_timeout", &self.poll_timeout)
            .finish_non_exhaustive()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000".to_string(),
            api_username: "admin".to_string(),
            api_password: "supersecret".to_string(),
            request_timeout: None,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            timing: SessionTiming::default(),
            flows: FlowSettings::default(),
            poll_timeout: Duration::from_millis(50),
        }
    }
}

impl ClientConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read
    /// or parsed, or if the default file exists but is malformed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Priority: CLI > file > default.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();
        let flows = &defaults.flows;

        Self {
            api_url: cli
                .api_url
                .clone()
                .or_else(|| file.api.url.clone())
                .unwrap_or(defaults.api_url),
            api_username: cli
                .api_user
                .clone()
                .or_else(|| file.api.username.clone())
                .unwrap_or(defaults.api_username),
            api_password: cli
                .api_password
                .clone()
                .or_else(|| file.api.password.clone())
                .unwrap_or(defaults.api_password),
            request_timeout: file
                .api
                .timeout_secs
                .map(Duration::from_secs)
                .or(defaults.request_timeout),
            channel_capacity: file
                .api
                .channel_capacity
                .unwrap_or(defaults.channel_capacity),
            timing: SessionTiming {
                tick: file
                    .session
                    .tick_ms
                    .map_or(defaults.timing.tick, Duration::from_millis),
                rotate_every: file
                    .session
                    .rotate_secs
                    .map_or(defaults.timing.rotate_every, Duration::from_secs),
            },
            flows: FlowSettings {
                captcha_reload_limit: file
                    .tasks
                    .captcha_reload_limit
                    .unwrap_or(flows.captcha_reload_limit),
                captcha_reload_window: file
                    .tasks
                    .captcha_reload_window_secs
                    .map_or(flows.captcha_reload_window, Duration::from_secs),
                coffee_queue_step: file
                    .tasks
                    .coffee_queue_step_ms
                    .map_or(flows.coffee_queue_step, Duration::from_millis),
                signature_queue_step: file
                    .tasks
                    .signature_queue_step_ms
                    .map_or(flows.signature_queue_step, Duration::from_millis),
                signature_min_ink: file
                    .tasks
                    .signature_min_ink
                    .unwrap_or(flows.signature_min_ink),
                return_delay: file
                    .tasks
                    .return_delay_ms
                    .map_or(flows.return_delay, Duration::from_millis),
                ..flows.clone()
            },
            poll_timeout: file
                .ui
                .poll_timeout_ms
                .map_or(defaults.poll_timeout, Duration::from_millis),
        }
    }

    /// Settings for [`crate::api::HttpBackend::new`].
    #[must_use]
    pub fn to_backend_config(&self) -> BackendConfig {
        BackendConfig {
            base_url: self.api_url.clone(),
            username: self.api_username.clone(),
            password: self.api_password.clone(),
            timeout: self.request_timeout,
        }
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Bureaucracy simulator for the terminal")]
pub struct CliArgs {
    /// Backend base URL.
    #[arg(long, env = "BUREAUSIM_API_URL")]
    pub api_url: Option<String>,

    /// Backend basic-auth user.
    #[arg(long, env = "BUREAUSIM_API_USER")]
    pub api_user: Option<String>,

    /// Backend basic-auth password.
    #[arg(long, env = "BUREAUSIM_API_PASSWORD", hide_env_values = true)]
    pub api_password: Option<String>,

    /// Path to config file (default: `~/.config/bureausim/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "BUREAUSIM_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/bureausim.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist. Otherwise the default
/// path is tried and a missing file is treated as empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join("bureausim").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
