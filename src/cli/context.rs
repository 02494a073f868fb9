//! Wiring of the remote client and the offline cache for CLI commands.

use crate::models::config::Config;
use crate::services::{CacheStore, CatalogClient, JsonFileCache, OverseerrClient};
use anyhow::{Context as _, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Collaborators shared by every command.
pub struct Context {
    pub config: Config,
    pub catalog: Arc<dyn CatalogClient>,
    pub cache: Arc<dyn CacheStore>,
}

impl Context {
    /// Build the HTTP client and open the offline cache.
    pub async fn open(config: Config) -> Result<Self> {
        let client = OverseerrClient::from_server_config(&config.server)?;
        let cache = JsonFileCache::open(config.cache.path.clone())
            .await
            .with_context(|| format!("Failed to open cache {}", config.cache.path.display()))?;

        tracing::debug!(
            "Using server {} and cache {}",
            client.base_url(),
            cache.path().display()
        );

        Ok(Self {
            config,
            catalog: Arc::new(client),
            cache: Arc::new(cache),
        })
    }
}

/// Apply the `--offline-cache` override.
pub fn with_cache_override(mut config: Config, path: Option<PathBuf>) -> Config {
    if let Some(path) = path {
        config.cache.path = path;
    }
    config
}
