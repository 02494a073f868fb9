//! Request submission, cancellation and the offline queue.

use super::mapper;
use crate::models::media::MediaKey;
use crate::models::remote::RawRequest;
use crate::models::request::{
    QueuedRequest, RequestId, RequestStatus, RequestSubmission, SeasonSelection, TrackedRequest,
};
use crate::services::{CacheStore, CatalogClient};
use crate::{Error, Result};
use chrono::Utc;
use std::sync::Arc;

/// What happened to a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Accepted by the server.
    Submitted(TrackedRequest),
    /// Server unreachable; stored locally until the next flush.
    Queued(TrackedRequest),
}

impl SubmitOutcome {
    pub fn request(&self) -> &TrackedRequest {
        match self {
            SubmitOutcome::Submitted(request) | SubmitOutcome::Queued(request) => request,
        }
    }
}

/// Result of replaying the offline queue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlushReport {
    /// Requests the server accepted.
    pub submitted: Vec<TrackedRequest>,
    /// Submissions the server rejected for good, with the reason.
    pub dropped: Vec<(MediaKey, String)>,
    /// Submissions left in the queue for a later attempt.
    pub kept: Vec<MediaKey>,
}

impl FlushReport {
    pub fn is_empty(&self) -> bool {
        self.submitted.is_empty() && self.dropped.is_empty() && self.kept.is_empty()
    }
}

/// Submits and cancels requests, queueing submissions while offline.
pub struct RequestService {
    catalog: Arc<dyn CatalogClient>,
    cache: Arc<dyn CacheStore>,
}

impl RequestService {
    pub fn new(catalog: Arc<dyn CatalogClient>, cache: Arc<dyn CacheStore>) -> Self {
        Self { catalog, cache }
    }

    /// Submit a request for a movie or show.
    ///
    /// When the server cannot be reached the submission is queued and a
    /// placeholder request is tracked in its place.
    pub async fn submit(&self, submission: RequestSubmission) -> Result<SubmitOutcome> {
        submission.validate()?;
        let key = submission.media;

        match self.catalog.submit_request(&submission).await {
            Ok(raw) => {
                let request = self.accept(raw, &submission).await;
                tracing::info!("Request {} submitted for {}", request.id, key);
                Ok(SubmitOutcome::Submitted(request))
            }
            Err(e) if e.is_transient() => {
                tracing::info!("Server unreachable, queueing request for {}: {}", key, e);
                let placeholder = self.enqueue(submission).await?;
                Ok(SubmitOutcome::Queued(placeholder))
            }
            Err(e) => Err(e),
        }
    }

    /// Cancel a request.
    ///
    /// Queued requests are dropped locally. Remote requests are deleted on
    /// the server first; a request the server no longer knows counts as
    /// deleted.
    pub async fn cancel(&self, id: RequestId) -> Result<()> {
        match id {
            RequestId::Queued(key) => {
                self.cache.remove_offline(key).await?;
                self.cache.delete_tracked_request(id).await?;
                tracing::info!("Dropped queued request for {}", key);
            }
            RequestId::Remote(remote_id) => {
                match self.catalog.delete_request(remote_id).await {
                    Ok(()) => {}
                    Err(Error::Http { code: 404, .. }) => {
                        tracing::info!("Request {} already gone on the server", remote_id);
                    }
                    Err(e) => return Err(e),
                }
                self.cache.delete_tracked_request(id).await?;
                tracing::info!("Cancelled request {}", remote_id);
            }
        }
        Ok(())
    }

    /// Resubmit every queued request, oldest first.
    pub async fn flush_offline_queue(&self) -> Result<FlushReport> {
        let queue = self.cache.list_offline_queue().await?;
        let mut report = FlushReport::default();
        if queue.is_empty() {
            return Ok(report);
        }

        tracing::info!("Flushing {} queued requests", queue.len());
        for queued in queue {
            let key = queued.key();
            match self.catalog.submit_request(&queued.submission).await {
                Ok(raw) => {
                    let request = self.accept(raw, &queued.submission).await;
                    tracing::info!("Queued request for {} submitted as {}", key, request.id);
                    report.submitted.push(request);
                }
                Err(e) if e.is_rejection() || matches!(e, Error::Validation(_)) => {
                    tracing::warn!("Server rejected queued request for {}: {}", key, e);
                    if let Err(store_err) = self.discard_queued(key).await {
                        tracing::warn!("Failed to drop queued request for {}: {}", key, store_err);
                    }
                    report.dropped.push((key, e.to_string()));
                }
                Err(e) => {
                    tracing::debug!("Keeping queued request for {}: {}", key, e);
                    report.kept.push(key);
                }
            }
        }

        Ok(report)
    }

    /// Whether any request, queued or remote, is tracked for this media.
    pub async fn is_media_requested(&self, key: MediaKey) -> Result<bool> {
        Ok(self.cache.get_tracked_request(key).await?.is_some())
    }

    /// Track a request the server accepted and retire any placeholder for it.
    ///
    /// The server already holds the request, so local store failures are
    /// logged and the request is still returned. The queue entry goes first
    /// so a later flush cannot submit it again.
    async fn accept(&self, raw: RawRequest, submission: &RequestSubmission) -> TrackedRequest {
        let mut request = mapper::tracked_request(raw);
        let key = submission.media;

        // Some servers answer with the internal media row only
        if request.media != key {
            tracing::debug!("Server reported {} for submission of {}", request.media, key);
            request.media = key;
        }
        if matches!(request.seasons, None | Some(SeasonSelection::Unspecified)) {
            request.seasons = submission.seasons.clone();
        }
        self.fill_from_cache(&mut request).await;

        if let Err(e) = self.cache.remove_offline(key).await {
            tracing::warn!("Failed to remove queued request for {}: {}", key, e);
        }
        if let Err(e) = self
            .cache
            .upsert_tracked_requests(std::slice::from_ref(&request))
            .await
        {
            tracing::warn!("Failed to store request {} for {}: {}", request.id, key, e);
        }
        if let Err(e) = self
            .cache
            .delete_tracked_request(RequestId::Queued(key))
            .await
        {
            tracing::warn!("Failed to remove placeholder for {}: {}", key, e);
        }
        request
    }

    async fn enqueue(&self, submission: RequestSubmission) -> Result<TrackedRequest> {
        let key = submission.media;
        let now = Utc::now();

        let mut placeholder = TrackedRequest {
            id: RequestId::Queued(key),
            media: key,
            title: None,
            poster_path: None,
            status: RequestStatus::Pending,
            created_at: now,
            seasons: submission.seasons.clone(),
            offline_queued: true,
        };
        self.fill_from_cache(&mut placeholder).await;

        self.cache
            .enqueue_offline(&QueuedRequest {
                submission,
                queued_at: now,
            })
            .await?;
        self.cache
            .upsert_tracked_requests(std::slice::from_ref(&placeholder))
            .await?;
        Ok(placeholder)
    }

    async fn discard_queued(&self, key: MediaKey) -> Result<()> {
        self.cache.remove_offline(key).await?;
        self.cache.delete_tracked_request(RequestId::Queued(key)).await
    }

    /// Copy title and poster from the cached detail record, if there is one.
    async fn fill_from_cache(&self, request: &mut TrackedRequest) {
        if !request.needs_hydration() {
            return;
        }
        match self.cache.get_detail(request.media).await {
            Ok(Some(record)) => {
                if request.title.is_none() {
                    request.title = Some(record.title().to_string());
                }
                if request.poster_path.is_none() {
                    request.poster_path = record.poster_path().map(str::to_string);
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Could not read cached details for {}: {}", request.media, e),
        }
    }
}
