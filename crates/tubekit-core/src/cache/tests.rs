//! Tests for the expiring cache

use super::*;
use crate::clock::ManualClock;
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};

fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap())
}

async fn open_memory(clock: &ManualClock) -> ExpiringCache {
    let cache = ExpiringCache::in_memory(300, Arc::new(clock.clone()));
    cache.init().await.unwrap();
    cache
}

async fn physical_rows(cache: &ExpiringCache) -> i64 {
    let pool = cache.current_pool().unwrap();
    sqlx::query_scalar("SELECT COUNT(*) FROM cache")
        .fetch_one(&pool)
        .await
        .unwrap()
}

#[test]
fn test_cache_key_is_stable() {
    #[derive(Serialize)]
    struct Params<'a> {
        query: &'a str,
        max_results: u32,
    }

    let a = cache_key("search", &Params { query: "rust", max_results: 10 }).unwrap();
    let b = cache_key("search", &Params { query: "rust", max_results: 10 }).unwrap();
    let c = cache_key("search", &Params { query: "rust", max_results: 11 }).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a, r#"search:{"query":"rust","max_results":10}"#);
}

#[test]
fn test_cache_key_rejects_unencodable_params() {
    // JSON object keys must be strings.
    let mut params = std::collections::BTreeMap::new();
    params.insert(vec![1u8, 2], "value");
    tokio_test::assert_err!(cache_key("search", &params));
}

#[test]
fn test_default_config() {
    let config = CacheConfig::default();
    assert_eq!(config.ttl_seconds, 300);
    assert_eq!(config.db_path, PathBuf::from("data/cache.db"));
}

#[tokio::test]
async fn test_set_then_get() {
    let clock = clock();
    let cache = open_memory(&clock).await;

    cache.set("k", &json!({"views": 42}), None).await.unwrap();
    let value: Option<Value> = cache.get("k").await;
    assert_eq!(value, Some(json!({"views": 42})));

    let missing: Option<Value> = cache.get("other").await;
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_entry_expires_without_sweep() {
    let clock = clock();
    let cache = open_memory(&clock).await;

    cache.set("short", &"v", Some(1)).await.unwrap();
    assert_eq!(cache.get::<String>("short").await.as_deref(), Some("v"));

    clock.advance(Duration::milliseconds(1_001));
    assert!(cache.get::<String>("short").await.is_none());
    // Still on disk until the next sweep.
    assert_eq!(physical_rows(&cache).await, 1);
}

#[tokio::test]
async fn test_default_ttl_applies() {
    let clock = clock();
    let cache = open_memory(&clock).await;

    cache.set("k", &1u32, None).await.unwrap();
    clock.advance(Duration::seconds(299));
    assert_eq!(cache.get::<u32>("k").await, Some(1));
    clock.advance(Duration::seconds(1));
    assert_eq!(cache.get::<u32>("k").await, None);
}

#[tokio::test]
async fn test_overwrite_last_write_wins() {
    let clock = clock();
    let cache = open_memory(&clock).await;

    cache.set("k", &"first", Some(10)).await.unwrap();
    cache.set("k", &"second", Some(600)).await.unwrap();
    assert_eq!(cache.get::<String>("k").await.as_deref(), Some("second"));

    // The overwrite also replaced the expiry.
    clock.advance(Duration::seconds(30));
    assert_eq!(cache.get::<String>("k").await.as_deref(), Some("second"));
    assert_eq!(physical_rows(&cache).await, 1);
}

#[tokio::test]
async fn test_invalidate_pattern() {
    let clock = clock();
    let cache = open_memory(&clock).await;

    cache.set("list_videos:a", &1, None).await.unwrap();
    cache.set("list_videos:b", &2, None).await.unwrap();
    cache.set("other:c", &3, None).await.unwrap();

    let removed = cache.invalidate("list_videos:%").await.unwrap();
    assert_eq!(removed, 2);
    assert!(cache.get::<i32>("list_videos:a").await.is_none());
    assert!(cache.get::<i32>("list_videos:b").await.is_none());
    assert_eq!(cache.get::<i32>("other:c").await, Some(3));
}

#[tokio::test]
async fn test_invalidate_exact_key() {
    let clock = clock();
    let cache = open_memory(&clock).await;

    cache.set("list_playlists", &1, None).await.unwrap();
    cache.set("list_playlists_extra", &2, None).await.unwrap();

    assert_eq!(cache.invalidate("list_playlists").await.unwrap(), 1);
    assert_eq!(cache.get::<i32>("list_playlists_extra").await, Some(2));
}

#[tokio::test]
async fn test_init_sweeps_expired_rows() {
    let dir = tempfile::tempdir().unwrap();
    let config = CacheConfig {
        ttl_seconds: 300,
        db_path: dir.path().join("nested/cache.db"),
    };
    let clock = clock();

    let cache = ExpiringCache::with_clock(&config, Arc::new(clock.clone()));
    assert_eq!(cache.init().await.unwrap(), 0);
    cache.set("stale", &1, Some(5)).await.unwrap();
    cache.set("fresh", &2, Some(3600)).await.unwrap();
    cache.close().await;

    clock.advance(Duration::seconds(60));

    let reopened = ExpiringCache::with_clock(&config, Arc::new(clock.clone()));
    assert_eq!(reopened.init().await.unwrap(), 1);
    assert_eq!(physical_rows(&reopened).await, 1);
    assert_eq!(reopened.get::<i32>("fresh").await, Some(2));
    reopened.close().await;
}

#[tokio::test]
async fn test_repeated_init_sweeps_open_cache() {
    let clock = clock();
    let cache = open_memory(&clock).await;
    cache.set("stale", &1, Some(5)).await.unwrap();
    cache.set("fresh", &2, Some(3600)).await.unwrap();

    clock.advance(Duration::seconds(60));

    assert_eq!(cache.init().await.unwrap(), 1);
    assert!(cache.is_open());
    assert_eq!(physical_rows(&cache).await, 1);
}

#[tokio::test]
async fn test_values_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = CacheConfig {
        ttl_seconds: 300,
        db_path: dir.path().join("cache.db"),
    };

    let cache = ExpiringCache::new(&config);
    cache.init().await.unwrap();
    cache.set("persist", &json!(["a", "b"]), None).await.unwrap();
    cache.close().await;

    let cache = ExpiringCache::new(&config);
    cache.init().await.unwrap();
    assert_eq!(cache.get::<Value>("persist").await, Some(json!(["a", "b"])));
    cache.close().await;
}

#[tokio::test]
async fn test_uninitialized_cache_is_inert() {
    let cache = ExpiringCache::in_memory(300, Arc::new(clock()));

    assert!(!cache.is_open());
    cache.set("k", &1, None).await.unwrap();
    assert!(cache.get::<i32>("k").await.is_none());
    assert_eq!(cache.invalidate("%").await.unwrap(), 0);
    cache.close().await;
}

#[tokio::test]
async fn test_close_is_idempotent() {
    let clock = clock();
    let cache = open_memory(&clock).await;
    cache.set("k", &1, None).await.unwrap();

    cache.close().await;
    cache.close().await;

    assert!(!cache.is_open());
    assert!(cache.get::<i32>("k").await.is_none());
}

#[tokio::test]
async fn test_undecodable_value_is_a_miss() {
    let clock = clock();
    let cache = open_memory(&clock).await;

    cache.set("k", &"not a number", None).await.unwrap();
    assert!(cache.get::<u64>("k").await.is_none());
}

#[tokio::test]
async fn test_second_init_keeps_entries() {
    let clock = clock();
    let cache = open_memory(&clock).await;
    cache.set("k", &1, None).await.unwrap();

    assert_eq!(cache.init().await.unwrap(), 0);
    assert_eq!(cache.get::<i32>("k").await, Some(1));
}
