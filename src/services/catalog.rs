//! Remote catalog interface.

use crate::models::feed::{FeedKind, FeedPage};
use crate::models::media::MediaKey;
use crate::models::remote::{RawCatalogItem, RawDetail, RawRequest, RequestPage};
use crate::models::request::RequestSubmission;
use crate::Result;
use async_trait::async_trait;

/// Remote side of the media request service.
///
/// Implementations classify failures into the crate's error taxonomy
/// (`Network`, `Timeout`, `Http`, `Auth`, `Parse`); callers rely on that
/// classification to decide between cache fallback and propagation.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch one page (1-based) of a catalog feed.
    async fn fetch_page(&self, feed: &FeedKind, page: u32) -> Result<FeedPage<RawCatalogItem>>;

    /// Fetch movie or show details.
    async fn fetch_detail(&self, key: MediaKey) -> Result<RawDetail>;

    /// Fetch one page (1-based) of the user's requests.
    async fn fetch_my_requests(&self, page: u32, page_size: u32) -> Result<RequestPage>;

    /// Submit a new request.
    async fn submit_request(&self, submission: &RequestSubmission) -> Result<RawRequest>;

    /// Delete a request by server id.
    async fn delete_request(&self, id: u64) -> Result<()>;
}
