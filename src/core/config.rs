//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.moodreel/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MoodreelConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub recommendations: RecommendationConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RecommendationConfig {
    pub rating_threshold: Option<f64>,
    pub top_k: Option<u32>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TimeoutConfig {
    pub chat_secs: Option<u64>,
    pub details_secs: Option<u64>,
    pub prefetch_secs: Option<u64>,
    pub poster_secs: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_RATING_THRESHOLD: f64 = 7.0;
pub const DEFAULT_TOP_K: u32 = 5;
pub const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DETAILS_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_PREFETCH_TIMEOUT_SECS: u64 = 12;
pub const DEFAULT_POSTER_TIMEOUT_SECS: u64 = 12;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

/// Per-call deadlines. Exceeding one fails that call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeouts {
    pub chat: Duration,
    pub details: Duration,
    pub prefetch: Duration,
    pub poster: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            chat: Duration::from_secs(DEFAULT_CHAT_TIMEOUT_SECS),
            details: Duration::from_secs(DEFAULT_DETAILS_TIMEOUT_SECS),
            prefetch: Duration::from_secs(DEFAULT_PREFETCH_TIMEOUT_SECS),
            poster: Duration::from_secs(DEFAULT_POSTER_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub rating_threshold: f64,
    pub top_k: u32,
    pub timeouts: Timeouts,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        resolve(&MoodreelConfig::default(), &CliOverrides::default())
    }
}

/// Values supplied on the command line. `None` = not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub rating_threshold: Option<f64>,
    pub top_k: Option<u32>,
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

/// Returns the path to `~/.moodreel/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".moodreel").join("config.toml"))
}

/// Load config from `~/.moodreel/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `MoodreelConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<MoodreelConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(MoodreelConfig::default())
        }
    }
}

pub fn load_config_from(path: &Path) -> Result<MoodreelConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(MoodreelConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: MoodreelConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# Moodreel Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [backend]
# base_url = "http://localhost:8000"     # Or set MOODREEL_API_URL

# [recommendations]
# rating_threshold = 7.0                  # Or set MOODREEL_RATING_THRESHOLD
# top_k = 5                               # Or set MOODREEL_TOP_K

# [timeouts]
# chat_secs = 30
# details_secs = 15
# prefetch_secs = 12
# poster_secs = 12
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring unparsable {}={:?}", name, raw);
            None
        }
    }
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &MoodreelConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| std::env::var("MOODREEL_API_URL").ok())
        .or_else(|| config.backend.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let rating_threshold = cli
        .rating_threshold
        .or_else(|| env_parsed("MOODREEL_RATING_THRESHOLD"))
        .or(config.recommendations.rating_threshold)
        .unwrap_or(DEFAULT_RATING_THRESHOLD);

    let top_k = cli
        .top_k
        .or_else(|| env_parsed("MOODREEL_TOP_K"))
        .or(config.recommendations.top_k)
        .unwrap_or(DEFAULT_TOP_K);

    let t = &config.timeouts;
    let timeouts = Timeouts {
        chat: Duration::from_secs(t.chat_secs.unwrap_or(DEFAULT_CHAT_TIMEOUT_SECS)),
        details: Duration::from_secs(t.details_secs.unwrap_or(DEFAULT_DETAILS_TIMEOUT_SECS)),
        prefetch: Duration::from_secs(t.prefetch_secs.unwrap_or(DEFAULT_PREFETCH_TIMEOUT_SECS)),
        poster: Duration::from_secs(t.poster_secs.unwrap_or(DEFAULT_POSTER_TIMEOUT_SECS)),
    };

    ResolvedConfig {
        base_url,
        rating_threshold,
        top_k,
        timeouts,
    }
}
