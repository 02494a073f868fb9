//! Integration tests for the JSON file cache.

mod common;

use chrono::Utc;
use common::tracked;
use seerr_sync::models::media::{DetailRecord, MediaKey, MovieDetail, ShowDetail};
use seerr_sync::models::request::{QueuedRequest, RequestId, RequestStatus, RequestSubmission};
use seerr_sync::services::{CacheStore, JsonFileCache};
use seerr_sync::Error;
use tempfile::TempDir;

fn movie(id: u64, title: &str) -> DetailRecord {
    DetailRecord::Movie(MovieDetail {
        id,
        title: title.to_string(),
        ..Default::default()
    })
}

#[tokio::test]
async fn test_contents_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cache.json");

    {
        let cache = JsonFileCache::open(&path).await.unwrap();
        cache.upsert_detail(&movie(603, "The Matrix")).await.unwrap();
        cache
            .upsert_detail(&DetailRecord::Show(ShowDetail {
                id: 603,
                name: "Not The Matrix".to_string(),
                ..Default::default()
            }))
            .await
            .unwrap();
        cache
            .upsert_tracked_requests(&[tracked(7, MediaKey::movie(603), RequestStatus::Approved)])
            .await
            .unwrap();
        cache
            .enqueue_offline(&QueuedRequest {
                submission: RequestSubmission::movie(550),
                queued_at: Utc::now(),
            })
            .await
            .unwrap();
    }
    assert!(path.exists());

    let cache = JsonFileCache::open(&path).await.unwrap();
    let detail = cache.get_detail(MediaKey::movie(603)).await.unwrap().unwrap();
    assert_eq!(detail.title(), "The Matrix");
    let show = cache.get_detail(MediaKey::show(603)).await.unwrap().unwrap();
    assert_eq!(show.title(), "Not The Matrix");

    let request = cache
        .get_tracked_request(MediaKey::movie(603))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(request.id, RequestId::Remote(7));

    let queue = cache.list_offline_queue().await.unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].key(), MediaKey::movie(550));
}

#[tokio::test]
async fn test_upsert_is_last_writer_wins() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cache.json");
    let cache = JsonFileCache::open(&path).await.unwrap();

    cache.upsert_detail(&movie(1, "First")).await.unwrap();
    cache.upsert_detail(&movie(1, "Second")).await.unwrap();

    let reopened = JsonFileCache::open(&path).await.unwrap();
    let detail = reopened.get_detail(MediaKey::movie(1)).await.unwrap().unwrap();
    assert_eq!(detail.title(), "Second");
}

#[tokio::test]
async fn test_deletes_are_persisted() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cache.json");
    let cache = JsonFileCache::open(&path).await.unwrap();

    cache
        .upsert_tracked_requests(&[
            tracked(1, MediaKey::movie(10), RequestStatus::Pending),
            tracked(2, MediaKey::movie(20), RequestStatus::Pending),
        ])
        .await
        .unwrap();
    cache.delete_tracked_request(RequestId::Remote(1)).await.unwrap();

    let reopened = JsonFileCache::open(&path).await.unwrap();
    let ids: Vec<RequestId> = reopened
        .list_tracked_requests()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![RequestId::Remote(2)]);
}

#[tokio::test]
async fn test_missing_file_opens_empty() {
    let temp_dir = TempDir::new().unwrap();
    let cache = JsonFileCache::open(temp_dir.path().join("nested").join("cache.json"))
        .await
        .unwrap();
    assert!(cache.list_tracked_requests().await.unwrap().is_empty());
    assert!(cache.list_offline_queue().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_corrupt_file_is_cache_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cache.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = JsonFileCache::open(&path).await.unwrap_err();
    assert!(matches!(err, Error::Cache(_)));
}

#[tokio::test]
async fn test_newer_format_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cache.json");
    std::fs::write(&path, r#"{"version": 999}"#).unwrap();

    let err = JsonFileCache::open(&path).await.unwrap_err();
    assert!(matches!(err, Error::Cache(_)));
}

#[tokio::test]
async fn test_failed_write_leaves_memory_unchanged() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cache.json");
    let cache = JsonFileCache::open(&path).await.unwrap();
    cache.upsert_detail(&movie(1, "First")).await.unwrap();

    // A directory at the staging path makes the next write fail
    std::fs::create_dir(temp_dir.path().join("cache.json.tmp")).unwrap();

    let err = cache.upsert_detail(&movie(1, "Second")).await.unwrap_err();
    assert!(matches!(err, Error::Cache(_)));
    let err = cache.upsert_detail(&movie(2, "Other")).await.unwrap_err();
    assert!(matches!(err, Error::Cache(_)));

    let detail = cache.get_detail(MediaKey::movie(1)).await.unwrap().unwrap();
    assert_eq!(detail.title(), "First");
    assert!(cache.get_detail(MediaKey::movie(2)).await.unwrap().is_none());
}
