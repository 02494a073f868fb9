//! Incremental pagination of the user's request list.

use super::details::DetailService;
use super::mapper;
use crate::models::config::PagingConfig;
use crate::models::request::{RequestId, TrackedRequest};
use crate::services::{CacheStore, CatalogClient};
use crate::Result;
use futures::future::join_all;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};

/// Result of a [`RequestListSync::refresh`] or [`RequestListSync::load_more`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was fetched and committed.
    Loaded { page: u32, received: usize },
    /// Nothing was fetched, or the result was superseded by a refresh.
    Skipped,
}

/// Point-in-time view of the synchronizer.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestListSnapshot {
    pub current_page: u32,
    pub page_size: u32,
    pub is_last_page: bool,
    pub loading: bool,
    /// Accumulated requests, unique by id, in page order.
    pub items: Vec<TrackedRequest>,
}

#[derive(Debug)]
struct SyncState {
    current_page: u32,
    is_last_page: bool,
    /// Items per fetched page. A refresh replaces page 1 only.
    pages: BTreeMap<u32, Vec<TrackedRequest>>,
}

impl SyncState {
    fn new() -> Self {
        Self {
            current_page: 1,
            is_last_page: false,
            pages: BTreeMap::new(),
        }
    }

    /// Accumulated items; on duplicate ids the earliest page wins.
    fn view(&self) -> Vec<TrackedRequest> {
        let mut seen = HashSet::new();
        self.pages
            .values()
            .flatten()
            .filter(|request| seen.insert(request.id))
            .cloned()
            .collect()
    }

    fn commit(&mut self, page: u32, page_size: u32, fetched: FetchedPage) {
        let observed = u64::from(page - 1) * u64::from(page_size) + fetched.raw_count as u64;
        self.is_last_page = observed >= fetched.total || fetched.raw_count == 0;
        self.current_page = page;
        self.pages.insert(page, fetched.items);
        if self.is_last_page {
            self.pages.retain(|&p, _| p <= page);
        }
    }
}

struct FetchedPage {
    items: Vec<TrackedRequest>,
    raw_count: usize,
    total: u64,
}

/// Decrements the in-flight counter when the owning call finishes or is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Keeps a paginated, de-duplicated view of the user's requests.
///
/// State is only committed after a fetch completes, so a failed or dropped
/// call leaves the page counter and the last-page flag untouched.
pub struct RequestListSync {
    catalog: Arc<dyn CatalogClient>,
    cache: Arc<dyn CacheStore>,
    details: DetailService,
    page_size: u32,
    hydration_timeout: Duration,
    state: Mutex<SyncState>,
    in_flight: AtomicUsize,
    generation: AtomicU64,
    list_tx: watch::Sender<Vec<TrackedRequest>>,
}

impl RequestListSync {
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        cache: Arc<dyn CacheStore>,
        paging: &PagingConfig,
    ) -> Self {
        let (list_tx, _) = watch::channel(Vec::new());
        Self {
            details: DetailService::new(Arc::clone(&catalog), Arc::clone(&cache)),
            catalog,
            cache,
            page_size: paging.page_size.max(1),
            hydration_timeout: paging.hydration_timeout(),
            state: Mutex::new(SyncState::new()),
            in_flight: AtomicUsize::new(0),
            generation: AtomicU64::new(0),
            list_tx,
        }
    }

    /// Subscribe to the accumulated list.
    pub fn observe(&self) -> watch::Receiver<Vec<TrackedRequest>> {
        self.list_tx.subscribe()
    }

    pub async fn snapshot(&self) -> RequestListSnapshot {
        let state = self.state.lock().await;
        RequestListSnapshot {
            current_page: state.current_page,
            page_size: self.page_size,
            is_last_page: state.is_last_page,
            loading: self.in_flight.load(Ordering::Acquire) > 0,
            items: state.view(),
        }
    }

    /// Fetch page 1 again and replace it.
    ///
    /// Supersedes any fetch already in flight: whichever call started
    /// earlier has its result discarded.
    pub async fn refresh(&self) -> Result<LoadOutcome> {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        let _guard = InFlight(&self.in_flight);
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        tracing::debug!("Refreshing request list");
        let fetched = self.fetch_page(1).await?;
        self.commit(1, generation, fetched).await
    }

    /// Fetch the next page, unless a fetch is running or the last page is loaded.
    pub async fn load_more(&self) -> Result<LoadOutcome> {
        if self
            .in_flight
            .compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Request list fetch already in flight, skipping");
            return Ok(LoadOutcome::Skipped);
        }
        let _guard = InFlight(&self.in_flight);
        let generation = self.generation.load(Ordering::Acquire);

        let page = {
            let state = self.state.lock().await;
            if state.is_last_page {
                return Ok(LoadOutcome::Skipped);
            }
            if state.pages.is_empty() {
                1
            } else {
                state.current_page + 1
            }
        };

        tracing::debug!("Loading request page {}", page);
        let fetched = self.fetch_page(page).await?;
        self.commit(page, generation, fetched).await
    }

    /// Drop a request from the view, e.g. after it was cancelled.
    pub async fn forget(&self, id: RequestId) -> bool {
        let mut state = self.state.lock().await;
        let mut removed = false;
        for items in state.pages.values_mut() {
            let before = items.len();
            items.retain(|request| request.id != id);
            removed |= items.len() != before;
        }
        if removed {
            self.list_tx.send_replace(state.view());
        }
        removed
    }

    async fn commit(&self, page: u32, generation: u64, fetched: FetchedPage) -> Result<LoadOutcome> {
        let mut state = self.state.lock().await;
        if self.generation.load(Ordering::Acquire) != generation {
            tracing::debug!("Discarding request page {} from a superseded fetch", page);
            return Ok(LoadOutcome::Skipped);
        }

        let received = fetched.items.len();
        state.commit(page, self.page_size, fetched);
        self.list_tx.send_replace(state.view());

        tracing::debug!(
            "Committed request page {} ({} items, last page: {})",
            page,
            received,
            state.is_last_page
        );
        Ok(LoadOutcome::Loaded { page, received })
    }

    async fn fetch_page(&self, page: u32) -> Result<FetchedPage> {
        let response = self.catalog.fetch_my_requests(page, self.page_size).await?;
        let raw_count = response.items.len();
        let total = response.total_on_server;

        let mut items: Vec<TrackedRequest> = response
            .items
            .into_iter()
            .map(mapper::tracked_request)
            .collect();
        // Stored before hydrating so merged detail records see this page
        match self.cache.upsert_tracked_requests(&items).await {
            Ok(()) => tracing::info!("Cached {} requests from page {}", items.len(), page),
            Err(e) => tracing::warn!("Failed to cache requests from page {}: {}", page, e),
        }

        if self.hydrate(&mut items).await > 0 {
            if let Err(e) = self.cache.upsert_tracked_requests(&items).await {
                tracing::warn!("Failed to cache hydrated requests from page {}: {}", page, e);
            }
        }

        Ok(FetchedPage {
            items,
            raw_count,
            total,
        })
    }

    /// Fill in missing titles and posters from the detail records.
    ///
    /// Lookups run concurrently, each bounded by the hydration timeout. A
    /// request whose lookup fails keeps what it has. Returns how many
    /// requests were filled in.
    async fn hydrate(&self, items: &mut [TrackedRequest]) -> usize {
        let timeout = self.hydration_timeout;
        let lookups = items.iter().map(|request| {
            let needed = request.needs_hydration();
            let key = request.media;
            async move {
                if !needed {
                    return None;
                }
                match tokio::time::timeout(timeout, self.details.get_details(key)).await {
                    Ok(Ok(fetched)) => Some(fetched.value),
                    Ok(Err(e)) => {
                        tracing::debug!("Could not hydrate {}: {}", key, e);
                        None
                    }
                    Err(_) => {
                        tracing::debug!("Hydrating {} timed out", key);
                        None
                    }
                }
            }
        });
        let records = join_all(lookups).await;

        let mut filled = 0;
        for (request, record) in items.iter_mut().zip(records) {
            let Some(record) = record else { continue };
            if request.title.is_none() {
                request.title = Some(record.title().to_string());
            }
            if request.poster_path.is_none() {
                request.poster_path = record.poster_path().map(str::to_string);
            }
            filled += 1;
        }
        filled
    }
}
