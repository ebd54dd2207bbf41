//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.quill/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct QuillConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Interpreter executable handed the story path as its final argument.
    pub command: Option<String>,
    /// Extra arguments placed before the story path.
    pub args: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DisplayConfig {
    pub poll_interval_ms: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_INTERPRETER: &str = "dfrotz";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub interpreter: String,
    pub interpreter_args: Vec<String>,
    pub poll_interval: Duration,
    pub story: PathBuf,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.quill/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".quill").join("config.toml"))
}

/// Load config from `~/.quill/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and returns
/// `QuillConfig::default()`. If it exists but is malformed, returns
/// `ConfigError::Parse`.
pub fn load_config() -> Result<QuillConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(QuillConfig::default());
        }
    };

    if !path.exists() {
        info!(
            "No config file found, generating default at {}",
            path.display()
        );
        generate_default_config(&path);
        return Ok(QuillConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: QuillConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Quill Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [engine]
# command = "dfrotz"        # Or set QUILL_INTERPRETER env var
# args = ["-w", "0"]        # Placed before the story path

# [display]
# poll_interval_ms = 50     # How often engine output is drained into the view
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars
/// → CLI.
///
/// `cli_interpreter` comes from the `--interpreter` flag (None = not given).
pub fn resolve(
    config: &QuillConfig,
    cli_interpreter: Option<&str>,
    story: PathBuf,
) -> ResolvedConfig {
    // Interpreter: CLI → env → config → default
    let interpreter = cli_interpreter
        .map(|s| s.to_string())
        .or_else(|| std::env::var("QUILL_INTERPRETER").ok())
        .or_else(|| config.engine.command.clone())
        .unwrap_or_else(|| DEFAULT_INTERPRETER.to_string());

    let interpreter_args = config.engine.args.clone().unwrap_or_default();

    let poll_interval = Duration::from_millis(
        config
            .display
            .poll_interval_ms
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS),
    );

    ResolvedConfig {
        interpreter,
        interpreter_args,
        poll_interval,
        story,
    }
}
