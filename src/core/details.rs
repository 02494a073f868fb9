//! Detail fetch with cache fallback.

use super::mapper;
use super::reconciler::reconcile;
use crate::models::media::{DetailRecord, MediaKey};
use crate::services::{CacheStore, CatalogClient};
use crate::Result;
use std::sync::Arc;

/// Where a returned record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Fetched from the server just now.
    Fresh,
    /// Served from the local cache because the server was unreachable.
    Stale,
}

/// A value together with its freshness.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub freshness: Freshness,
}

impl<T> Fetched<T> {
    pub fn fresh(value: T) -> Self {
        Self {
            value,
            freshness: Freshness::Fresh,
        }
    }

    pub fn stale(value: T) -> Self {
        Self {
            value,
            freshness: Freshness::Stale,
        }
    }

    pub fn is_stale(&self) -> bool {
        self.freshness == Freshness::Stale
    }
}

/// Fetches movie and show details and keeps the cache current.
///
/// This is the only place detail records are written to the cache.
pub struct DetailService {
    catalog: Arc<dyn CatalogClient>,
    cache: Arc<dyn CacheStore>,
}

impl DetailService {
    pub fn new(catalog: Arc<dyn CatalogClient>, cache: Arc<dyn CacheStore>) -> Self {
        Self { catalog, cache }
    }

    /// Get details for a movie or show.
    ///
    /// On success the record is merged with the tracked request for the same
    /// media and written to the cache. On a network failure or timeout the
    /// cached record, if any, is returned as [`Freshness::Stale`]. Every other
    /// failure is returned as is.
    pub async fn get_details(&self, key: MediaKey) -> Result<Fetched<DetailRecord>> {
        tracing::debug!("Fetching details for {}", key);

        let raw = match self.catalog.fetch_detail(key).await {
            Ok(raw) => raw,
            Err(e) if e.is_transient() => return self.fallback(key, e).await,
            Err(e) => return Err(e),
        };

        let record = mapper::detail_record(key, raw)?;

        let tracked = match self.cache.get_tracked_request(key).await {
            Ok(tracked) => tracked,
            Err(e) => {
                tracing::warn!("Could not look up tracked request for {}: {}", key, e);
                None
            }
        };

        let availability = reconcile(record.availability(), tracked.as_ref());
        let record = record.with_availability(availability);

        if let Err(e) = self.cache.upsert_detail(&record).await {
            tracing::warn!("Failed to cache details for {}: {}", key, e);
        }

        Ok(Fetched::fresh(record))
    }

    async fn fallback(&self, key: MediaKey, error: crate::Error) -> Result<Fetched<DetailRecord>> {
        match self.cache.get_detail(key).await {
            Ok(Some(record)) => {
                tracing::info!("Server unreachable, using cached details for {}", key);
                Ok(Fetched::stale(record))
            }
            Ok(None) => Err(error),
            Err(cache_err) => {
                tracing::warn!("Cache read failed for {}: {}", key, cache_err);
                Err(error)
            }
        }
    }
}
