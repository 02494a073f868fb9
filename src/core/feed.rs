//! Lazy paginated catalog feeds.

use super::mapper;
use crate::models::feed::{FeedItem, FeedKind, FeedPage};
use crate::models::remote::RawCatalogItem;
use crate::services::CatalogClient;
use crate::Result;
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, BoxStream, StreamExt};
use std::future::Future;
use std::sync::Arc;

type PageFetcher<R> = Arc<dyn Fn(u32) -> BoxFuture<'static, Result<FeedPage<R>>> + Send + Sync>;
type ItemMapper<R, T> = Arc<dyn Fn(R) -> Option<T> + Send + Sync>;

/// A paginated query turned into a stream of mapped pages.
///
/// Each call to [`FeedSource::pages`] walks the feed from page 1. The walk
/// ends after an empty page, once the raw items seen reach the reported
/// total, or after the last reported page.
pub struct FeedSource<R, T> {
    fetch: PageFetcher<R>,
    map: ItemMapper<R, T>,
}

impl<R, T> Clone for FeedSource<R, T> {
    fn clone(&self) -> Self {
        Self {
            fetch: Arc::clone(&self.fetch),
            map: Arc::clone(&self.map),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    page: u32,
    seen: u64,
}

impl<R, T> FeedSource<R, T>
where
    R: Send + 'static,
    T: Send + 'static,
{
    /// Build a source from a page fetch function and an item mapper.
    ///
    /// Items the mapper returns `None` for are dropped but still count
    /// towards the reported total.
    pub fn new<F, Fut, M>(fetch: F, map: M) -> Self
    where
        F: Fn(u32) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<FeedPage<R>>> + Send + 'static,
        M: Fn(R) -> Option<T> + Send + Sync + 'static,
    {
        Self {
            fetch: Arc::new(move |page| fetch(page).boxed()),
            map: Arc::new(map),
        }
    }

    /// Stream the feed one page at a time, starting at page 1.
    ///
    /// A failed fetch yields `Err` without advancing, so polling again
    /// retries the same page.
    pub fn pages(&self) -> BoxStream<'static, Result<Vec<T>>> {
        let fetch = Arc::clone(&self.fetch);
        let map = Arc::clone(&self.map);

        stream::unfold(Some(Cursor { page: 1, seen: 0 }), move |state| {
            let fetch = Arc::clone(&fetch);
            let map = Arc::clone(&map);
            async move {
                let cursor = state?;
                tracing::debug!("Fetching feed page {}", cursor.page);

                let page = match fetch(cursor.page).await {
                    Ok(page) => page,
                    Err(e) => {
                        tracing::debug!("Feed page {} failed: {}", cursor.page, e);
                        return Some((Err(e), Some(cursor)));
                    }
                };

                let count = page.results.len() as u64;
                let seen = cursor.seen + count;
                let last = count == 0
                    || seen >= page.total_results
                    || (page.total_pages > 0 && cursor.page >= page.total_pages);

                let items: Vec<T> = page.results.into_iter().filter_map(|raw| map(raw)).collect();
                let next = if last {
                    None
                } else {
                    Some(Cursor {
                        page: cursor.page + 1,
                        seen,
                    })
                };
                Some((Ok(items), next))
            }
        })
        .boxed()
    }
}

/// Feed source for a named catalog feed.
pub fn observe_feed(
    catalog: Arc<dyn CatalogClient>,
    feed: FeedKind,
) -> FeedSource<RawCatalogItem, FeedItem> {
    let default_kind = feed.media_kind();
    let feed = Arc::new(feed);

    FeedSource::new(
        move |page| {
            let catalog = Arc::clone(&catalog);
            let feed = Arc::clone(&feed);
            async move { catalog.fetch_page(&feed, page).await }
        },
        move |raw| mapper::feed_item(raw, default_kind),
    )
}
