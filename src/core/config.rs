//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.triage/config.toml`. If missing on first run, a
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
pub struct TriageConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AnalysisConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StoreConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub access_token: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_API_BASE: &str = "http://localhost:5001/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct StoreSettings {
    pub url: String,
    pub anon_key: String,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub api_base: String,
    pub request_timeout: Duration,
    /// None when the store URL or anon key is missing (history disabled).
    pub store: Option<StoreSettings>,
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

/// Returns `~/.triage/`.
pub fn triage_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".triage"))
}

/// Returns the path to `~/.triage/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    triage_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.triage/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `TriageConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<TriageConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(TriageConfig::default());
        }
    };
    load_config_from(&path)
}

fn load_config_from(path: &Path) -> Result<TriageConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(TriageConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: TriageConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Triage Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [analysis]
# base_url = "http://localhost:5001/api"   # Or TRIAGE_API_BASE / --api-base
# timeout_secs = 30                        # Or TRIAGE_REQUEST_TIMEOUT_SECS

# History is only written when url + anon_key are set and a signed-in
# user's access token is available.
# [store]
# url = "https://your-project.supabase.co"  # Or TRIAGE_STORE_URL
# anon_key = "eyJ..."                       # Or TRIAGE_STORE_ANON_KEY
# access_token = "eyJ..."                   # Or TRIAGE_STORE_ACCESS_TOKEN
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

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &TriageConfig, cli_api_base: Option<&str>) -> ResolvedConfig {
    resolve_with(config, cli_api_base, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], with the environment lookup injected.
pub fn resolve_with<F>(config: &TriageConfig, cli_api_base: Option<&str>, env: F) -> ResolvedConfig
where
    F: Fn(&str) -> Option<String>,
{
    // API base: CLI → env → config → default
    let api_base = cli_api_base
        .map(|s| s.to_string())
        .or_else(|| env("TRIAGE_API_BASE"))
        .or_else(|| config.analysis.base_url.clone())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
        .trim_end_matches('/')
        .to_string();

    // Timeout: env → config → default. Unparseable env values are ignored.
    let timeout_secs = env("TRIAGE_REQUEST_TIMEOUT_SECS")
        .and_then(|v| match v.parse::<u64>() {
            Ok(secs) => Some(secs),
            Err(_) => {
                warn!("Ignoring invalid TRIAGE_REQUEST_TIMEOUT_SECS: {}", v);
                None
            }
        })
        .or(config.analysis.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    // Store: each field env → config
    let store_url = env("TRIAGE_STORE_URL").or_else(|| config.store.url.clone());
    let anon_key = env("TRIAGE_STORE_ANON_KEY").or_else(|| config.store.anon_key.clone());
    let access_token =
        env("TRIAGE_STORE_ACCESS_TOKEN").or_else(|| config.store.access_token.clone());

    let store = match (store_url, anon_key) {
        (Some(url), Some(anon_key)) if !url.is_empty() && !anon_key.is_empty() => {
            Some(StoreSettings {
                url,
                anon_key,
                access_token,
            })
        }
        _ => None,
    };

    ResolvedConfig {
        api_base,
        request_timeout: Duration::from_secs(timeout_secs),
        store,
    }
}
