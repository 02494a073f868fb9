//! Integration tests for the detail fetch-and-merge path.
//!
//! Tests cover:
//! - Reconciliation with tracked requests
//! - Cache fallback on transient failures only
//! - Cache write-through

mod common;

use common::{movie_detail, show_detail, tracked, FakeCatalog, Failure};
use seerr_sync::core::{DetailService, Freshness};
use seerr_sync::models::media::{MediaKey, MediaStatus};
use seerr_sync::models::request::{RequestId, RequestStatus};
use seerr_sync::services::{CacheStore, MemoryCache};
use seerr_sync::Error;
use std::sync::Arc;

fn service(catalog: &Arc<FakeCatalog>, cache: &Arc<MemoryCache>) -> DetailService {
    DetailService::new(catalog.clone(), cache.clone())
}

// ========== RECONCILIATION ==========

#[tokio::test]
async fn test_tracked_request_drives_status() {
    // Movie 100 is processing remotely and has an approved local request 7
    let catalog = Arc::new(FakeCatalog::new().with_detail(movie_detail(100, "Arrival", 3)));
    let cache = Arc::new(MemoryCache::new());
    cache
        .upsert_tracked_requests(&[tracked(7, MediaKey::movie(100), RequestStatus::Approved)])
        .await
        .unwrap();

    let fetched = service(&catalog, &cache)
        .get_details(MediaKey::movie(100))
        .await
        .unwrap();

    assert_eq!(fetched.freshness, Freshness::Fresh);
    let availability = fetched.value.availability();
    assert_eq!(availability.status, MediaStatus::Processing);
    assert_eq!(availability.request_id, Some(RequestId::Remote(7)));

    let cached = cache.get_detail(MediaKey::movie(100)).await.unwrap().unwrap();
    assert_eq!(cached, fetched.value);
}

#[tokio::test]
async fn test_pending_request_overrides_unknown() {
    let catalog = Arc::new(FakeCatalog::new().with_detail(movie_detail(5, "Heat", 1)));
    let cache = Arc::new(MemoryCache::new());
    cache
        .upsert_tracked_requests(&[tracked(1, MediaKey::movie(5), RequestStatus::Pending)])
        .await
        .unwrap();

    let fetched = service(&catalog, &cache)
        .get_details(MediaKey::movie(5))
        .await
        .unwrap();
    assert_eq!(fetched.value.availability().status, MediaStatus::Pending);
}

#[tokio::test]
async fn test_remote_available_wins_over_tracked_request() {
    let catalog = Arc::new(FakeCatalog::new().with_detail(movie_detail(100, "Arrival", 5)));
    let cache = Arc::new(MemoryCache::new());
    cache
        .upsert_tracked_requests(&[tracked(7, MediaKey::movie(100), RequestStatus::Pending)])
        .await
        .unwrap();

    let fetched = service(&catalog, &cache)
        .get_details(MediaKey::movie(100))
        .await
        .unwrap();
    let availability = fetched.value.availability();
    assert_eq!(availability.status, MediaStatus::Available);
    assert!(availability.available);
    assert_eq!(availability.request_id, None);
}

#[tokio::test]
async fn test_request_for_show_does_not_touch_movie_with_same_id() {
    let catalog = Arc::new(FakeCatalog::new().with_detail(movie_detail(1399, "Some Movie", 1)));
    let cache = Arc::new(MemoryCache::new());
    cache
        .upsert_tracked_requests(&[tracked(3, MediaKey::show(1399), RequestStatus::Approved)])
        .await
        .unwrap();

    let fetched = service(&catalog, &cache)
        .get_details(MediaKey::movie(1399))
        .await
        .unwrap();
    assert_eq!(fetched.value.availability().status, MediaStatus::Unknown);
    assert_eq!(fetched.value.availability().request_id, None);
}

// ========== CACHE FALLBACK ==========

#[tokio::test]
async fn test_network_error_serves_cached_record() {
    let catalog = Arc::new(FakeCatalog::new().with_detail(movie_detail(42, "Alien", 2)));
    let cache = Arc::new(MemoryCache::new());
    let service = service(&catalog, &cache);

    let first = service.get_details(MediaKey::movie(42)).await.unwrap();

    catalog.fail_next(Failure::Network);
    let second = service.get_details(MediaKey::movie(42)).await.unwrap();
    assert!(second.is_stale());
    assert_eq!(second.value, first.value);

    catalog.fail_next(Failure::Timeout);
    let third = service.get_details(MediaKey::movie(42)).await.unwrap();
    assert_eq!(third.freshness, Freshness::Stale);
}

#[tokio::test]
async fn test_http_error_propagates_despite_cache() {
    let catalog = Arc::new(FakeCatalog::new().with_detail(movie_detail(42, "Alien", 2)));
    let cache = Arc::new(MemoryCache::new());
    let service = service(&catalog, &cache);
    service.get_details(MediaKey::movie(42)).await.unwrap();

    catalog.fail_next(Failure::Http(404));
    let err = service.get_details(MediaKey::movie(42)).await.unwrap_err();
    assert!(matches!(err, Error::Http { code: 404, .. }));

    catalog.fail_next(Failure::Auth);
    let err = service.get_details(MediaKey::movie(42)).await.unwrap_err();
    assert!(matches!(err, Error::Auth(_)));
}

#[tokio::test]
async fn test_network_error_without_cache_propagates() {
    let catalog = Arc::new(FakeCatalog::new());
    let cache = Arc::new(MemoryCache::new());
    catalog.fail_next(Failure::Network);

    let err = service(&catalog, &cache)
        .get_details(MediaKey::show(1399))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Network(_)));
}

#[tokio::test]
async fn test_show_details_are_cached_by_kind() {
    let catalog = Arc::new(FakeCatalog::new().with_detail(show_detail(1399, "Game of Thrones")));
    let cache = Arc::new(MemoryCache::new());

    let fetched = service(&catalog, &cache)
        .get_details(MediaKey::show(1399))
        .await
        .unwrap();
    assert_eq!(fetched.value.title(), "Game of Thrones");

    assert!(cache.get_detail(MediaKey::show(1399)).await.unwrap().is_some());
    assert!(cache.get_detail(MediaKey::movie(1399)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_refetch_overwrites_cached_record() {
    let catalog = Arc::new(FakeCatalog::new().with_detail(movie_detail(8, "Old Title", 2)));
    let cache = Arc::new(MemoryCache::new());
    let service = service(&catalog, &cache);
    service.get_details(MediaKey::movie(8)).await.unwrap();

    let catalog = Arc::new(FakeCatalog::new().with_detail(movie_detail(8, "New Title", 5)));
    let service = DetailService::new(catalog, cache.clone());
    service.get_details(MediaKey::movie(8)).await.unwrap();

    let cached = cache.get_detail(MediaKey::movie(8)).await.unwrap().unwrap();
    assert_eq!(cached.title(), "New Title");
    assert_eq!(cached.availability().status, MediaStatus::Available);
}
