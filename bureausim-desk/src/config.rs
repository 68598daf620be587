//! Configuration system for the Bureausim front desk.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/bureausim-desk/config.toml`)
//! 4. Compiled defaults

use std::path::PathBuf;

/// Errors that can occur when loading desk configuration.
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

/// Top-level TOML config file structure for the desk.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct DeskConfigFile {
    server: ServerFileConfig,
    auth: AuthFileConfig,
    game: GameFileConfig,
}

/// `[server]` section of the desk config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ServerFileConfig {
    bind_addr: Option<String>,
}

/// `[auth]` section of the desk config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct AuthFileConfig {
    username: Option<String>,
    password: Option<String>,
}

/// `[game]` section of the desk config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct GameFileConfig {
    min_tasks: Option<usize>,
}

// ---------------------------------------------------------------------------
// CLI arguments
// ---------------------------------------------------------------------------

/// CLI arguments for the desk server.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Bureausim front-desk backend")]
pub struct DeskCliArgs {
    /// Address to bind the desk server to.
    #[arg(short, long, env = "DESK_ADDR")]
    pub bind: Option<String>,

    /// Path to config file (default: `~/.config/bureausim-desk/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Basic-auth user name clients must present.
    #[arg(long, env = "DESK_USERNAME")]
    pub username: Option<String>,

    /// Basic-auth password clients must present.
    #[arg(long, env = "DESK_PASSWORD")]
    pub password: Option<String>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "DESK_LOG")]
    pub log_level: String,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved desk configuration.
#[derive(Debug, Clone)]
pub struct DeskConfig {
    /// Address to bind the server to (e.g., `0.0.0.0:8000`).
    pub bind_addr: String,
    /// Basic-auth user name.
    pub username: String,
    /// Basic-auth password.
    pub password: String,
    /// Fewest departments assigned to a new player (clamped to 1..=6).
    pub min_tasks: usize,
    /// Log level filter string.
    pub log_level: String,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            username: "admin".to_string(),
            password: "supersecret".to_string(),
            min_tasks: 3,
            log_level: "info".to_string(),
        }
    }
}

impl DeskConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read
    /// or parsed.
    pub fn load(cli: &DeskCliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve a `DeskConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    #[must_use]
    fn resolve(cli: &DeskCliArgs, file: &DeskConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: cli
                .bind
                .clone()
                .or_else(|| file.server.bind_addr.clone())
                .unwrap_or(defaults.bind_addr),
            username: cli
                .username
                .clone()
                .or_else(|| file.auth.username.clone())
                .unwrap_or(defaults.username),
            password: cli
                .password
                .clone()
                .or_else(|| file.auth.password.clone())
                .unwrap_or(defaults.password),
            min_tasks: file
                .game
                .min_tasks
                .unwrap_or(defaults.min_tasks)
                .clamp(1, 6),
            log_level: cli.log_level.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file for the desk.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<DeskConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(DeskConfigFile::default());
        };
        config_dir.join("bureausim-desk").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(DeskConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DeskConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:8000");
        assert_eq!(config.username, "admin");
        assert_eq!(config.password, "supersecret");
        assert_eq!(config.min_tasks, 3);
    }

    #[test]
    fn toml_parsing_full() {
        let toml_str = r#"
[server]
bind_addr = "127.0.0.1:8080"

[auth]
username = "clerk"
password = "stamp"

[game]
min_tasks = 5
"#;
        let file: DeskConfigFile = toml::from_str(toml_str).unwrap();
        let config = DeskConfig::resolve(&DeskCliArgs::default(), &file);

        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.username, "clerk");
        assert_eq!(config.password, "stamp");
        assert_eq!(config.min_tasks, 5);
    }

    #[test]
    fn min_tasks_is_clamped() {
        let file: DeskConfigFile = toml::from_str("[game]\nmin_tasks = 40\n").unwrap();
        let config = DeskConfig::resolve(&DeskCliArgs::default(), &file);
        assert_eq!(config.min_tasks, 6);

        let file: DeskConfigFile = toml::from_str("[game]\nmin_tasks = 0\n").unwrap();
        let config = DeskConfig::resolve(&DeskCliArgs::default(), &file);
        assert_eq!(config.min_tasks, 1);
    }

    #[test]
    fn cli_overrides_file() {
        let toml_str = r#"
[server]
bind_addr = "127.0.0.1:8080"

[auth]
username = "clerk"
"#;
        let file: DeskConfigFile = toml::from_str(toml_str).unwrap();
        let cli = DeskCliArgs {
            bind: Some("0.0.0.0:3000".to_string()),
            password: Some("cli-secret".to_string()),
            ..Default::default()
        };
        let config = DeskConfig::resolve(&cli, &file);

        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.username, "clerk");
        assert_eq!(config.password, "cli-secret");
    }

    #[test]
    fn explicit_missing_config_file_returns_error() {
        let result = load_config_file(Some(std::path::Path::new("/nonexistent/config.toml")));
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }
}
