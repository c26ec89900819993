//! End-to-end tests of the cache over file storage.

use std::sync::Arc;
use std::time::Duration;

use article_cache::cache::{CacheItem, ManualClock, TtlCache, DEFAULT_TTL};
use article_cache::storage::{FileStorage, JsonCodec};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ArticleDetails {
    id: String,
    title: String,
    summary: String,
    content: String,
    updated_at: i64,
}

type DetailsStorage =
    FileStorage<String, CacheItem<ArticleDetails>, JsonCodec<CacheItem<ArticleDetails>>>;
type DetailsCache = TtlCache<String, ArticleDetails, DetailsStorage>;

fn details(id: &str) -> ArticleDetails {
    ArticleDetails {
        id: id.to_string(),
        title: format!("Article {}", id),
        summary: "How to reset your password".to_string(),
        content: "Open settings, then tap Security.".to_string(),
        updated_at: 1_700_000_000_000,
    }
}

fn details_cache(root: &TempDir, clock: &ManualClock) -> DetailsCache {
    TtlCache::new(
        DEFAULT_TTL,
        FileStorage::new(root.path(), JsonCodec::new()),
        clock.as_clock(),
    )
}

#[tokio::test]
async fn test_one_day_ttl_over_files() {
    let root = TempDir::new().unwrap();
    let clock = ManualClock::new(0);
    let cache = details_cache(&root, &clock);
    let key = "42".to_string();

    cache.put(&key, details("42")).await;
    assert_eq!(cache.get(&key).await, Some(details("42")));
    assert!(!cache.is_stale(&key).await);

    clock.set(86_400_001);
    assert!(cache.is_stale(&key).await);
    // is_stale leaves the file in place
    assert!(root.path().join("file_storage").join("42").is_file());

    assert_eq!(cache.get(&key).await, None);
    assert!(!root.path().join("file_storage").join("42").exists());
}

#[tokio::test]
async fn test_file_contents_are_serialized_item() {
    let root = TempDir::new().unwrap();
    let clock = ManualClock::new(1_234);
    let cache = details_cache(&root, &clock);

    cache.put(&"7".to_string(), details("7")).await;

    let text = std::fs::read_to_string(root.path().join("file_storage").join("7")).unwrap();
    let item: CacheItem<ArticleDetails> = serde_json::from_str(&text).unwrap();
    assert_eq!(item.timestamp, 1_234);
    assert_eq!(item.value, details("7"));
}

#[tokio::test]
async fn test_corrupt_file_reads_as_miss() {
    let root = TempDir::new().unwrap();
    let clock = ManualClock::new(0);
    let cache = details_cache(&root, &clock);
    let key = "9".to_string();

    cache.put(&key, details("9")).await;
    std::fs::write(root.path().join("file_storage").join("9"), "{\"value\":").unwrap();

    assert_eq!(cache.get(&key).await, None);
    assert!(cache.is_stale(&key).await);

    // Re-populating repairs the entry
    cache.put(&key, details("9")).await;
    assert_eq!(cache.get(&key).await, Some(details("9")));
}

#[tokio::test]
async fn test_entries_survive_new_cache_instance() {
    let root = TempDir::new().unwrap();
    let clock = ManualClock::new(0);

    details_cache(&root, &clock)
        .put(&"1".to_string(), details("1"))
        .await;

    let reopened = details_cache(&root, &clock);
    assert_eq!(reopened.get(&"1".to_string()).await, Some(details("1")));
}

#[tokio::test]
async fn test_clear_and_remove() {
    let root = TempDir::new().unwrap();
    let clock = ManualClock::new(0);
    let cache = details_cache(&root, &clock);

    for id in ["1", "2", "3"] {
        cache.put(&id.to_string(), details(id)).await;
    }

    cache.remove(&"1".to_string()).await;
    cache.remove(&"1".to_string()).await;
    assert_eq!(cache.get(&"1".to_string()).await, None);
    assert!(cache.get(&"2".to_string()).await.is_some());

    cache.clear().await;
    assert_eq!(cache.get(&"2".to_string()).await, None);
    assert_eq!(cache.get(&"3".to_string()).await, None);
    let left = std::fs::read_dir(root.path().join("file_storage")).unwrap().count();
    assert_eq!(left, 0);
}

#[tokio::test]
async fn test_unwritable_directory_absorbs_put() {
    let root = TempDir::new().unwrap();
    // A regular file where the storage directory should be
    std::fs::write(root.path().join("file_storage"), "occupied").unwrap();

    let clock = ManualClock::new(0);
    let cache = details_cache(&root, &clock);

    cache.put(&"1".to_string(), details("1")).await;
    assert_eq!(cache.get(&"1".to_string()).await, None);
    cache.clear().await;

    let stats = cache.stats().await;
    assert!(stats.storage_failures >= 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writers_never_tear_on_disk() {
    let root = TempDir::new().unwrap();
    let clock = ManualClock::new(0);
    let cache: Arc<TtlCache<String, String, _>> = Arc::new(TtlCache::new(
        Duration::from_secs(60),
        FileStorage::<String, CacheItem<String>, _>::new(
            root.path(),
            JsonCodec::<CacheItem<String>>::new(),
        ),
        clock.as_clock(),
    ));

    let mut handles = Vec::new();
    for writer in 0..8u8 {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            let tag = char::from(b'a' + writer);
            let payload: String = std::iter::repeat(tag).take(4096).collect();
            for _ in 0..10 {
                cache.put(&"shared".to_string(), payload.clone()).await;
                let seen = cache
                    .get(&"shared".to_string())
                    .await
                    .expect("fresh entry should be readable");
                assert_eq!(seen.len(), 4096);
                let first = seen.chars().next().unwrap();
                assert!(seen.chars().all(|c| c == first), "torn read observed");
                assert!(('a'..='h').contains(&first));
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }
}

#[tokio::test]
async fn test_separate_caches_use_separate_directories() {
    let lists_root = TempDir::new().unwrap();
    let details_root = TempDir::new().unwrap();
    let clock = ManualClock::new(0);

    let lists: TtlCache<String, Vec<String>, _> = TtlCache::new(
        DEFAULT_TTL,
        FileStorage::<String, CacheItem<Vec<String>>, _>::new(
            lists_root.path(),
            JsonCodec::<CacheItem<Vec<String>>>::new(),
        ),
        clock.as_clock(),
    );
    let article_details = details_cache(&details_root, &clock);

    lists
        .put(&"articles_cache_key".to_string(), vec!["1".to_string()])
        .await;
    article_details.put(&"1".to_string(), details("1")).await;

    article_details.clear().await;
    assert_eq!(
        lists.get(&"articles_cache_key".to_string()).await,
        Some(vec!["1".to_string()])
    );
}
