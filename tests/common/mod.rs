//! Shared fakes for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use seerr_sync::models::feed::{FeedKind, FeedPage};
use seerr_sync::models::media::{DetailRecord, MediaKey, MediaKind};
use seerr_sync::models::remote::{
    RawCatalogItem, RawDetail, RawMediaInfo, RawRequest, RawRequestMedia, RawRequestSeason,
    RequestPage,
};
use seerr_sync::models::request::{
    QueuedRequest, RequestId, RequestStatus, RequestSubmission, SeasonSelection, TrackedRequest,
};
use seerr_sync::services::{CacheStore, CatalogClient, MemoryCache};
use seerr_sync::{Error, Result};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

/// A scripted failure for the next catalog call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Network,
    Timeout,
    Http(u16),
    Auth,
    /// Never completes.
    Hang,
}

impl Failure {
    fn into_error(self) -> Error {
        match self {
            Failure::Network => Error::Network("connection refused".into()),
            Failure::Timeout => Error::Timeout("deadline elapsed".into()),
            Failure::Http(code) => Error::from_status(code, format!("HTTP {}", code)),
            Failure::Auth => Error::Auth("invalid api key".into()),
            Failure::Hang => unreachable!("hang is handled before conversion"),
        }
    }
}

/// In-memory catalog with scripted failures.
pub struct FakeCatalog {
    feed_pages: Mutex<Vec<FeedPage<RawCatalogItem>>>,
    details: Mutex<HashMap<MediaKey, RawDetail>>,
    requests: Mutex<Vec<RawRequest>>,
    total_override: Mutex<Option<u64>>,
    failures: Mutex<VecDeque<Failure>>,
    offline: AtomicBool,
    details_hang: AtomicBool,
    next_id: AtomicU64,
    calls: Mutex<Vec<String>>,
}

impl Default for FakeCatalog {
    fn default() -> Self {
        Self {
            feed_pages: Mutex::new(Vec::new()),
            details: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            total_override: Mutex::new(None),
            failures: Mutex::new(VecDeque::new()),
            offline: AtomicBool::new(false),
            details_hang: AtomicBool::new(false),
            next_id: AtomicU64::new(1000),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_detail(self, detail: RawDetail) -> Self {
        let key = if detail.title.is_some() {
            MediaKey::movie(detail.id)
        } else {
            MediaKey::show(detail.id)
        };
        self.details.lock().unwrap().insert(key, detail);
        self
    }

    pub fn with_feed_pages(self, pages: Vec<FeedPage<RawCatalogItem>>) -> Self {
        *self.feed_pages.lock().unwrap() = pages;
        self
    }

    pub fn with_requests(self, requests: Vec<RawRequest>) -> Self {
        *self.requests.lock().unwrap() = requests;
        self
    }

    /// Report this total instead of the number of stored requests.
    pub fn with_total(self, total: u64) -> Self {
        *self.total_override.lock().unwrap() = Some(total);
        self
    }

    pub fn set_requests(&self, requests: Vec<RawRequest>) {
        *self.requests.lock().unwrap() = requests;
    }

    /// Fail the next call, whatever endpoint it hits.
    pub fn fail_next(&self, failure: Failure) {
        self.failures.lock().unwrap().push_back(failure);
    }

    /// Fail every call with a network error while set.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make every detail call hang while set.
    pub fn set_details_hang(&self, hang: bool) {
        self.details_hang.store(hang, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub fn server_request_ids(&self) -> Vec<u64> {
        self.requests.lock().unwrap().iter().map(|r| r.id).collect()
    }

    async fn enter(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::Network("offline".into()));
        }

        let failure = self.failures.lock().unwrap().pop_front();
        match failure {
            None => Ok(()),
            Some(Failure::Hang) => std::future::pending::<Result<()>>().await,
            Some(failure) => Err(failure.into_error()),
        }
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn fetch_page(&self, feed: &FeedKind, page: u32) -> Result<FeedPage<RawCatalogItem>> {
        self.enter(format!("feed {} {}", feed, page)).await?;
        let pages = self.feed_pages.lock().unwrap();
        let total_pages = pages.len() as u32;
        Ok(pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_else(|| FeedPage::new(page, total_pages, 0, Vec::new())))
    }

    async fn fetch_detail(&self, key: MediaKey) -> Result<RawDetail> {
        self.enter(format!("detail {}", key)).await?;
        if self.details_hang.load(Ordering::SeqCst) {
            return std::future::pending().await;
        }
        self.details
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::from_status(404, "not found"))
    }

    async fn fetch_my_requests(&self, page: u32, page_size: u32) -> Result<RequestPage> {
        self.enter(format!("requests {}", page)).await?;
        let requests = self.requests.lock().unwrap();
        let skip = (page as usize - 1) * page_size as usize;
        let items = requests
            .iter()
            .skip(skip)
            .take(page_size as usize)
            .cloned()
            .collect();
        let total = self
            .total_override
            .lock()
            .unwrap()
            .unwrap_or(requests.len() as u64);
        Ok(RequestPage {
            items,
            total_on_server: total,
        })
    }

    async fn submit_request(&self, submission: &RequestSubmission) -> Result<RawRequest> {
        self.enter(format!("submit {}", submission.media)).await?;
        submission.validate()?;

        let seasons = match &submission.seasons {
            Some(SeasonSelection::Seasons(numbers)) => Some(
                numbers
                    .iter()
                    .map(|&n| RawRequestSeason {
                        id: None,
                        season_number: n,
                        status: Some(1),
                    })
                    .collect(),
            ),
            _ => None,
        };
        let request = raw_request_with_seasons(
            self.next_id.fetch_add(1, Ordering::SeqCst),
            submission.media,
            1,
            seasons,
        );
        self.requests.lock().unwrap().insert(0, request.clone());
        Ok(request)
    }

    async fn delete_request(&self, id: u64) -> Result<()> {
        self.enter(format!("delete {}", id)).await?;
        let mut requests = self.requests.lock().unwrap();
        let before = requests.len();
        requests.retain(|r| r.id != id);
        if requests.len() == before {
            return Err(Error::from_status(404, "request not found"));
        }
        Ok(())
    }
}

/// Memory cache whose tracked-request writes can be made to fail.
#[derive(Default)]
pub struct FailingWritesCache {
    inner: MemoryCache,
    fail_request_writes: AtomicBool,
}

impl FailingWritesCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_request_writes(&self, fail: bool) {
        self.fail_request_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CacheStore for FailingWritesCache {
    async fn get_detail(&self, key: MediaKey) -> Result<Option<DetailRecord>> {
        self.inner.get_detail(key).await
    }

    async fn upsert_detail(&self, record: &DetailRecord) -> Result<()> {
        self.inner.upsert_detail(record).await
    }

    async fn get_tracked_request(&self, key: MediaKey) -> Result<Option<TrackedRequest>> {
        self.inner.get_tracked_request(key).await
    }

    async fn list_tracked_requests(&self) -> Result<Vec<TrackedRequest>> {
        self.inner.list_tracked_requests().await
    }

    async fn upsert_tracked_requests(&self, requests: &[TrackedRequest]) -> Result<()> {
        if self.fail_request_writes.load(Ordering::SeqCst) {
            return Err(Error::Cache("disk full".into()));
        }
        self.inner.upsert_tracked_requests(requests).await
    }

    async fn delete_tracked_request(&self, id: RequestId) -> Result<()> {
        self.inner.delete_tracked_request(id).await
    }

    async fn enqueue_offline(&self, request: &QueuedRequest) -> Result<()> {
        self.inner.enqueue_offline(request).await
    }

    async fn list_offline_queue(&self) -> Result<Vec<QueuedRequest>> {
        self.inner.list_offline_queue().await
    }

    async fn remove_offline(&self, key: MediaKey) -> Result<()> {
        self.inner.remove_offline(key).await
    }
}

// ========== BUILDERS ==========

pub fn movie_detail(id: u64, title: &str, status: i64) -> RawDetail {
    RawDetail {
        id,
        title: Some(title.to_string()),
        release_date: Some("2020-01-01".to_string()),
        poster_path: Some(format!("/poster-{}.jpg", id)),
        media_info: Some(RawMediaInfo {
            id: Some(id + 10_000),
            tmdb_id: Some(id),
            status: Some(status),
            request_id: None,
            available: status == 5,
        }),
        ..Default::default()
    }
}

pub fn show_detail(id: u64, name: &str) -> RawDetail {
    RawDetail {
        id,
        name: Some(name.to_string()),
        first_air_date: Some("2011-04-17".to_string()),
        poster_path: Some(format!("/poster-{}.jpg", id)),
        number_of_seasons: Some(8),
        ..Default::default()
    }
}

pub fn raw_request(id: u64, media: MediaKey, status: i64) -> RawRequest {
    raw_request_with_seasons(id, media, status, None)
}

pub fn raw_request_with_seasons(
    id: u64,
    media: MediaKey,
    status: i64,
    seasons: Option<Vec<RawRequestSeason>>,
) -> RawRequest {
    RawRequest {
        id,
        kind: Some(media.kind.as_str().to_string()),
        status,
        created_at: Some("2024-05-01T10:00:00.000Z".to_string()),
        media: Some(RawRequestMedia {
            id: Some(media.id + 10_000),
            media_type: Some(media.kind.as_str().to_string()),
            tmdb_id: Some(media.id),
            ..Default::default()
        }),
        seasons,
    }
}

/// Requests with ids `from..to`, each for the movie with the same id.
pub fn raw_requests(from: u64, to: u64) -> Vec<RawRequest> {
    (from..to)
        .map(|id| raw_request(id, MediaKey::movie(id), 2))
        .collect()
}

pub fn catalog_item(id: u64, kind: MediaKind, title: &str) -> RawCatalogItem {
    let mut item = RawCatalogItem {
        id,
        media_type: Some(kind.as_str().to_string()),
        ..Default::default()
    };
    match kind {
        MediaKind::Movie => item.title = Some(title.to_string()),
        MediaKind::Show => item.name = Some(title.to_string()),
    }
    item
}

pub fn tracked(id: u64, media: MediaKey, status: RequestStatus) -> TrackedRequest {
    TrackedRequest {
        id: RequestId::Remote(id),
        media,
        title: Some(format!("Request {}", id)),
        poster_path: Some("/poster.jpg".to_string()),
        status,
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
        seasons: None,
        offline_queued: false,
    }
}
