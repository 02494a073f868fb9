//! Local cache store.
//!
//! Two implementations share the same tables:
//! - [`MemoryCache`]: process-local, used for tests and throwaway sessions
//! - [`JsonFileCache`]: persisted as one JSON snapshot, rewritten after every
//!   mutation so an offline restart sees the last merged state

use crate::models::media::{DetailRecord, MediaKey};
use crate::models::request::{QueuedRequest, RequestId, TrackedRequest};
use crate::utils::fs;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

const SNAPSHOT_VERSION: u32 = 1;

/// Key-value store for cached details, tracked requests and the offline queue.
///
/// Writers upsert by key, last write wins. No operation spans more than one
/// entity.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Cached detail record for a movie or show.
    async fn get_detail(&self, key: MediaKey) -> Result<Option<DetailRecord>>;

    /// Insert or overwrite a detail record.
    async fn upsert_detail(&self, record: &DetailRecord) -> Result<()>;

    /// Most recent tracked request for a movie or show.
    async fn get_tracked_request(&self, key: MediaKey) -> Result<Option<TrackedRequest>>;

    /// All tracked requests, newest first.
    async fn list_tracked_requests(&self) -> Result<Vec<TrackedRequest>>;

    /// Insert or overwrite tracked requests by id.
    async fn upsert_tracked_requests(&self, requests: &[TrackedRequest]) -> Result<()>;

    /// Remove a tracked request. Only used for explicit cancellation.
    async fn delete_tracked_request(&self, id: RequestId) -> Result<()>;

    /// Add a submission to the offline queue, replacing one for the same media.
    async fn enqueue_offline(&self, request: &QueuedRequest) -> Result<()>;

    /// Queued submissions, oldest first.
    async fn list_offline_queue(&self) -> Result<Vec<QueuedRequest>>;

    /// Drop a queued submission.
    async fn remove_offline(&self, key: MediaKey) -> Result<()>;
}

/// In-memory tables shared by both store implementations.
#[derive(Debug, Default, Clone)]
struct CacheTables {
    details: HashMap<MediaKey, DetailRecord>,
    requests: HashMap<RequestId, TrackedRequest>,
    queue: HashMap<MediaKey, QueuedRequest>,
}

/// On-disk layout of [`JsonFileCache`].
#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheSnapshot {
    version: u32,
    #[serde(default)]
    details: Vec<DetailRecord>,
    #[serde(default)]
    requests: Vec<TrackedRequest>,
    #[serde(default)]
    queue: Vec<QueuedRequest>,
}

impl CacheTables {
    fn from_snapshot(snapshot: CacheSnapshot) -> Self {
        Self {
            details: snapshot.details.into_iter().map(|d| (d.key(), d)).collect(),
            requests: snapshot.requests.into_iter().map(|r| (r.id, r)).collect(),
            queue: snapshot.queue.into_iter().map(|q| (q.key(), q)).collect(),
        }
    }

    fn snapshot(&self) -> CacheSnapshot {
        let mut details: Vec<DetailRecord> = self.details.values().cloned().collect();
        details.sort_by_key(|d| d.key());

        let mut requests: Vec<TrackedRequest> = self.requests.values().cloned().collect();
        requests.sort_by_key(|r| r.id);

        CacheSnapshot {
            version: SNAPSHOT_VERSION,
            details,
            requests,
            queue: self.queue_oldest_first(),
        }
    }

    fn tracked_for(&self, key: MediaKey) -> Option<TrackedRequest> {
        self.requests
            .values()
            .filter(|r| r.media == key)
            .max_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
            .cloned()
    }

    fn requests_newest_first(&self) -> Vec<TrackedRequest> {
        let mut requests: Vec<TrackedRequest> = self.requests.values().cloned().collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        requests
    }

    fn queue_oldest_first(&self) -> Vec<QueuedRequest> {
        let mut queue: Vec<QueuedRequest> = self.queue.values().cloned().collect();
        queue.sort_by(|a, b| a.queued_at.cmp(&b.queued_at).then(a.key().cmp(&b.key())));
        queue
    }

    fn upsert_requests(&mut self, requests: &[TrackedRequest]) {
        for request in requests {
            self.requests.insert(request.id, request.clone());
        }
    }
}

/// Process-local cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    tables: RwLock<CacheTables>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get_detail(&self, key: MediaKey) -> Result<Option<DetailRecord>> {
        Ok(self.tables.read().await.details.get(&key).cloned())
    }

    async fn upsert_detail(&self, record: &DetailRecord) -> Result<()> {
        self.tables
            .write()
            .await
            .details
            .insert(record.key(), record.clone());
        Ok(())
    }

    async fn get_tracked_request(&self, key: MediaKey) -> Result<Option<TrackedRequest>> {
        Ok(self.tables.read().await.tracked_for(key))
    }

    async fn list_tracked_requests(&self) -> Result<Vec<TrackedRequest>> {
        Ok(self.tables.read().await.requests_newest_first())
    }

    async fn upsert_tracked_requests(&self, requests: &[TrackedRequest]) -> Result<()> {
        self.tables.write().await.upsert_requests(requests);
        Ok(())
    }

    async fn delete_tracked_request(&self, id: RequestId) -> Result<()> {
        self.tables.write().await.requests.remove(&id);
        Ok(())
    }

    async fn enqueue_offline(&self, request: &QueuedRequest) -> Result<()> {
        self.tables
            .write()
            .await
            .queue
            .insert(request.key(), request.clone());
        Ok(())
    }

    async fn list_offline_queue(&self) -> Result<Vec<QueuedRequest>> {
        Ok(self.tables.read().await.queue_oldest_first())
    }

    async fn remove_offline(&self, key: MediaKey) -> Result<()> {
        self.tables.write().await.queue.remove(&key);
        Ok(())
    }
}

/// Cache persisted to a single JSON file.
#[derive(Debug)]
pub struct JsonFileCache {
    path: PathBuf,
    tables: RwLock<CacheTables>,
}

impl JsonFileCache {
    /// Open the cache file, starting empty when it does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let snapshot: CacheSnapshot = fs::read_json_opt(&path)
            .await
            .map_err(|e| Error::Cache(format!("failed to load {}: {}", path.display(), e)))?
            .unwrap_or_default();

        if snapshot.version > SNAPSHOT_VERSION {
            return Err(Error::Cache(format!(
                "{} was written by a newer version (format {})",
                path.display(),
                snapshot.version
            )));
        }

        tracing::debug!(
            "Opened cache {} ({} details, {} requests, {} queued)",
            path.display(),
            snapshot.details.len(),
            snapshot.requests.len(),
            snapshot.queue.len()
        );

        Ok(Self {
            path,
            tables: RwLock::new(CacheTables::from_snapshot(snapshot)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply a mutation to a copy of the tables, write it, then swap it in.
    ///
    /// The lock is held throughout. A failed write leaves memory untouched.
    async fn mutate<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut CacheTables) + Send,
    {
        let mut tables = self.tables.write().await;
        let mut next = tables.clone();
        apply(&mut next);
        fs::write_json_atomic(&self.path, &next.snapshot())
            .await
            .map_err(|e| Error::Cache(format!("failed to write {}: {}", self.path.display(), e)))?;
        *tables = next;
        Ok(())
    }
}

#[async_trait]
impl CacheStore for JsonFileCache {
    async fn get_detail(&self, key: MediaKey) -> Result<Option<DetailRecord>> {
        Ok(self.tables.read().await.details.get(&key).cloned())
    }

    async fn upsert_detail(&self, record: &DetailRecord) -> Result<()> {
        let record = record.clone();
        self.mutate(move |t| {
            t.details.insert(record.key(), record);
        })
        .await
    }

    async fn get_tracked_request(&self, key: MediaKey) -> Result<Option<TrackedRequest>> {
        Ok(self.tables.read().await.tracked_for(key))
    }

    async fn list_tracked_requests(&self) -> Result<Vec<TrackedRequest>> {
        Ok(self.tables.read().await.requests_newest_first())
    }

    async fn upsert_tracked_requests(&self, requests: &[TrackedRequest]) -> Result<()> {
        self.mutate(|t| t.upsert_requests(requests)).await
    }

    async fn delete_tracked_request(&self, id: RequestId) -> Result<()> {
        self.mutate(move |t| {
            t.requests.remove(&id);
        })
        .await
    }

    async fn enqueue_offline(&self, request: &QueuedRequest) -> Result<()> {
        let request = request.clone();
        self.mutate(move |t| {
            t.queue.insert(request.key(), request);
        })
        .await
    }

    async fn list_offline_queue(&self) -> Result<Vec<QueuedRequest>> {
        Ok(self.tables.read().await.queue_oldest_first())
    }

    async fn remove_offline(&self, key: MediaKey) -> Result<()> {
        self.mutate(move |t| {
            t.queue.remove(&key);
        })
        .await
    }
}
