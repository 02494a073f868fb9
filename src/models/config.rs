//! Configuration model.
//!
//! Loaded from `<config dir>/seerr_sync/config.toml`; the server section can
//! be overridden with environment variables:
//! - `SEERR_URL`: server base URL
//! - `SEERR_API_KEY`: API key sent as `X-Api-Key`
//! - `SEERR_TIMEOUT`: request timeout in seconds

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PAGE_SIZE: u32 = 20;
const DEFAULT_HYDRATION_TIMEOUT_MS: u64 = 3000;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Local cache configuration.
    pub cache: CacheConfig,
    /// Pagination configuration.
    pub paging: PagingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL, e.g. `https://requests.example.com`.
    pub url: Option<String>,
    /// API key.
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Local cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// JSON cache file.
    pub path: PathBuf,
}

/// Pagination configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    /// Requests fetched per page of the request list.
    pub page_size: u32,
    /// Per-request budget for filling in missing titles and posters.
    pub hydration_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: config_dir().join("cache.json"),
        }
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            hydration_timeout_ms: DEFAULT_HYDRATION_TIMEOUT_MS,
        }
    }
}

impl PagingConfig {
    pub fn hydration_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.hydration_timeout_ms)
    }
}

impl Config {
    /// Apply `SEERR_*` environment overrides.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("SEERR_URL") {
            self.server.url = Some(url);
        }
        if let Ok(key) = std::env::var("SEERR_API_KEY") {
            self.server.api_key = Some(key);
        }
        if let Some(timeout) = std::env::var("SEERR_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.server.timeout_secs = timeout;
        }
    }
}

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("seerr_sync")
}

/// Load configuration from the default location, then apply env overrides.
pub fn load_config() -> Config {
    let mut config = load_config_from(&config_dir().join("config.toml"));
    config.apply_env();
    config
}

/// Load configuration from a file, falling back to defaults.
pub fn load_config_from(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring invalid config {}: {}", path.display(), e);
                Config::default()
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read config {}: {}", path.display(), e);
            Config::default()
        }
    }
}
