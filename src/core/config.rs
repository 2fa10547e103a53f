//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.timber/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::logs::{FetchFilter, LevelFilter, Severity};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TimberConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub project: Option<String>,
    pub account: Option<String>,
    pub page_size: Option<u32>,
    pub default_level: Option<String>,
    pub resource: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub base_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_BASE_URL: &str = "https://logging.googleapis.com/v1beta3";
pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::AtLeast(Severity::Error);

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub project: String,
    pub account: Option<String>,
    pub base_url: String,
    pub filter: FetchFilter,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    /// No project id after collapsing file, env, and CLI sources.
    MissingProject,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::MissingProject => write!(
                f,
                "no project id: set --project, TIMBER_PROJECT, or [general] project in ~/.timber/config.toml"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.timber/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".timber").join("config.toml"))
}

/// Load config from `~/.timber/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `TimberConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<TimberConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(TimberConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(TimberConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: TimberConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# timber configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# project = "my-gcp-project"        # Or set TIMBER_PROJECT / --project
# account = "me@example.com"        # gcloud account whose token to use
# page_size = 100
# default_level = "ERROR"           # ALL, DEBUG, INFO, WARNING, ERROR, CRITICAL
# resource = "/api/"                # resource-path substring filter

# [logging]
# base_url = "https://logging.googleapis.com/v1beta3"
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

/// Resolve the final config by collapsing: defaults → config file → env
/// vars → CLI flags. `cli_*` arguments come from clap (None = not given).
pub fn resolve(
    config: &TimberConfig,
    cli_project: Option<&str>,
    cli_level: Option<&str>,
    cli_resource: Option<&str>,
) -> Result<ResolvedConfig, ConfigError> {
    let project = cli_project
        .map(|s| s.to_string())
        .or_else(|| std::env::var("TIMBER_PROJECT").ok())
        .or_else(|| config.general.project.clone())
        .ok_or(ConfigError::MissingProject)?;

    let account = std::env::var("TIMBER_ACCOUNT")
        .ok()
        .or_else(|| config.general.account.clone());

    let base_url = std::env::var("TIMBER_BASE_URL")
        .ok()
        .or_else(|| config.logging.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let min_level = cli_level
        .map(|s| s.to_string())
        .or_else(|| config.general.default_level.clone())
        .map(|name| match name.parse::<LevelFilter>() {
            Ok(level) => level,
            Err(e) => {
                warn!("Ignoring configured level: {e}");
                DEFAULT_LEVEL
            }
        })
        .unwrap_or(DEFAULT_LEVEL);

    let resource = cli_resource
        .map(|s| s.to_string())
        .or_else(|| config.general.resource.clone())
        .filter(|s| !s.is_empty());

    Ok(ResolvedConfig {
        project,
        account,
        base_url,
        filter: FetchFilter {
            min_level,
            resource,
            page_size: config.general.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        },
    })
}
