//! Integration tests for Tubekit
//!
//! These tests drive the tool registry against a scripted transport and
//! real SQLite files:
//! - tubekit-core: quota governor, expiring cache, content calendar
//! - tubekit-youtube: read-through service composition
//! - tubekit-tools: registry dispatch

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tubekit_core::{
    CacheConfig, CalendarStore, Clock, ExpiringCache, ManualClock, QuotaConfig, QuotaGovernor,
};
use tubekit_tools::{register_youtube_tools, Error, ToolContext, ToolRegistry};
use tubekit_youtube::{ApiRequest, ApiTransport, UploadRequest, YouTubeService};

// ============================================================================
// Test doubles
// ============================================================================

/// Answers by URL suffix and records every request
struct ScriptedTransport {
    routes: Vec<(&'static str, Value)>,
    sent: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    fn new(routes: Vec<(&'static str, Value)>) -> Arc<Self> {
        Arc::new(Self {
            routes,
            sent: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl ApiTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> tubekit_youtube::Result<Value> {
        self.sent.lock().unwrap().push(request.url.clone());
        self.routes
            .iter()
            .find(|(suffix, _)| request.url.ends_with(suffix))
            .map(|(_, body)| body.clone())
            .ok_or(tubekit_youtube::Error::Api {
                status: 404,
                message: format!("no route for {}", request.url),
            })
    }

    async fn upload(&self, request: UploadRequest) -> tubekit_youtube::Result<Value> {
        self.sent.lock().unwrap().push(request.url);
        Ok(json!({}))
    }
}

struct Harness {
    registry: ToolRegistry,
    governor: Arc<QuotaGovernor>,
    cache: Arc<ExpiringCache>,
    calendar: Arc<CalendarStore>,
}

impl Harness {
    async fn open(
        dir: &Path,
        transport: Arc<ScriptedTransport>,
        budget: u64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let governor = Arc::new(QuotaGovernor::with_clock(
            QuotaConfig {
                daily_budget: budget,
            },
            clock.clone(),
        ));
        let cache = Arc::new(ExpiringCache::with_clock(
            &CacheConfig {
                ttl_seconds: 300,
                db_path: dir.join("cache.db"),
            },
            clock.clone(),
        ));
        cache.init().await.unwrap();
        let calendar = Arc::new(CalendarStore::new(dir.join("calendar.db")));
        calendar.init().await.unwrap();

        let youtube = Arc::new(
            YouTubeService::new(
                transport,
                governor.clone(),
                cache.clone(),
                Some("UCowner".to_string()),
            )
            .with_clock(clock),
        );
        let mut registry = ToolRegistry::new();
        register_youtube_tools(&mut registry, &ToolContext::new(youtube, calendar.clone()));

        Self {
            registry,
            governor,
            cache,
            calendar,
        }
    }

    async fn close(&self) {
        self.cache.close().await;
        self.calendar.close().await;
    }
}

fn morning() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap(),
    ))
}

fn own_video_routes() -> Vec<(&'static str, Value)> {
    vec![
        (
            "/search",
            json!({
                "items": [{"id": {"kind": "youtube#video", "videoId": "vid00000001"}}],
                "pageInfo": {"totalResults": 1}
            }),
        ),
        (
            "/videos",
            json!({"items": [{
                "id": "vid00000001",
                "snippet": {"title": "Sourdough basics", "tags": ["bread"]},
                "status": {"privacyStatus": "public"},
                "statistics": {"viewCount": "1200", "likeCount": "80", "commentCount": "9"}
            }]}),
        ),
    ]
}

// ============================================================================
// Quota governor
// ============================================================================

#[test]
fn test_quota_budget_scenario() {
    let governor = QuotaGovernor::new(QuotaConfig { daily_budget: 100 });

    governor.consume(60, "first").unwrap();
    let status = governor.status();
    assert_eq!((status.used, status.remaining), (60, 40));

    let err = governor.consume(50, "second").unwrap_err();
    assert_eq!((err.used, err.requested, err.limit), (60, 50, 100));
    assert_eq!(governor.status(), status);

    governor.consume(40, "third").unwrap();
    let status = governor.status();
    assert_eq!((status.used, status.remaining), (100, 0));
    assert!(!governor.check(1));
}

#[test]
fn test_quota_resets_at_utc_midnight() {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 5, 20, 23, 59, 0).unwrap(),
    ));
    let governor = QuotaGovernor::with_clock(QuotaConfig { daily_budget: 100 }, clock.clone());
    governor.consume(100, "late").unwrap();
    assert!(governor.consume(1, "still late").is_err());

    clock.advance(chrono::Duration::minutes(2));
    governor.consume(30, "next day").unwrap();
    assert_eq!(governor.status().used, 30);
}

// ============================================================================
// Read-through composition
// ============================================================================

#[tokio::test]
async fn test_cache_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let clock = morning();
    let transport = ScriptedTransport::new(own_video_routes());

    let first = Harness::open(dir.path(), transport.clone(), 10_000, clock.clone()).await;
    let listed = first
        .registry
        .execute("list_videos", json!({"max_results": 5}))
        .await
        .unwrap();
    assert_eq!(listed.output["videos"][0]["title"], "Sourdough basics");
    assert_eq!(first.governor.status().used, 101);
    first.close().await;

    // A fresh process: new governor, same cache file.
    let second = Harness::open(dir.path(), transport.clone(), 10_000, clock.clone()).await;
    let again = second
        .registry
        .execute("list_videos", json!({"max_results": 5}))
        .await
        .unwrap();
    assert_eq!(again.output, listed.output);
    assert_eq!(second.governor.status().used, 0);
    assert_eq!(transport.calls(), 2);

    // Past the TTL the entry is gone and the call is metered again.
    clock.advance(chrono::Duration::seconds(301));
    second
        .registry
        .execute("list_videos", json!({"max_results": 5}))
        .await
        .unwrap();
    assert_eq!(second.governor.status().used, 101);
    assert_eq!(transport.calls(), 4);
    second.close().await;
}

#[tokio::test]
async fn test_delete_invalidates_listing() {
    let dir = tempfile::tempdir().unwrap();
    let transport = ScriptedTransport::new(own_video_routes());
    let harness = Harness::open(dir.path(), transport.clone(), 10_000, morning()).await;

    harness
        .registry
        .execute("list_videos", json!({}))
        .await
        .unwrap();
    assert_eq!(transport.calls(), 2);

    let deleted = harness
        .registry
        .execute("delete_video", json!({"video_id": "vid00000001"}))
        .await
        .unwrap();
    assert_eq!(deleted.output["success"], true);
    assert_eq!(harness.governor.status().used, 101 + 50);

    harness
        .registry
        .execute("list_videos", json!({}))
        .await
        .unwrap();
    assert_eq!(transport.calls(), 5);
    assert_eq!(harness.governor.status().used, 101 + 50 + 101);
    harness.close().await;
}

#[tokio::test]
async fn test_exhausted_budget_blocks_remote_calls_but_not_cache() {
    let dir = tempfile::tempdir().unwrap();
    let transport = ScriptedTransport::new(own_video_routes());
    let harness = Harness::open(dir.path(), transport.clone(), 101, morning()).await;

    harness
        .registry
        .execute("list_videos", json!({}))
        .await
        .unwrap();
    assert_eq!(harness.governor.status().remaining, 0);

    // Cached: no quota needed.
    harness
        .registry
        .execute("list_videos", json!({}))
        .await
        .unwrap();

    // Different parameters miss the cache and hit the empty budget.
    let err = harness
        .registry
        .execute("list_videos", json!({"max_results": 3}))
        .await
        .unwrap_err();
    match err {
        Error::Quota(q) => assert_eq!((q.used, q.limit, q.requested), (101, 101, 100)),
        other => panic!("expected quota error, got {other:?}"),
    }
    assert_eq!(transport.calls(), 2);

    // Local tools keep working.
    let plan = harness
        .registry
        .execute(
            "add_content_plan",
            json!({"title": "Rye loaf", "planned_date": "2024-06-02"}),
        )
        .await
        .unwrap();
    assert_eq!(plan.output["plan"]["status"], "idea");
    harness.close().await;
}

#[tokio::test]
async fn test_cache_pattern_invalidation_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ExpiringCache::new(&CacheConfig {
        ttl_seconds: 60,
        db_path: dir.path().join("nested").join("cache.db"),
    });
    cache.init().await.unwrap();

    cache.set("list_videos:a", &1, None).await.unwrap();
    cache.set("list_videos:b", &2, None).await.unwrap();
    cache.set("other:c", &3, None).await.unwrap();

    assert_eq!(cache.invalidate("list_videos:%").await.unwrap(), 2);
    assert_eq!(cache.get::<i32>("list_videos:a").await, None);
    assert_eq!(cache.get::<i32>("other:c").await, Some(3));

    cache.close().await;
    cache.close().await;
    assert_eq!(cache.get::<i32>("other:c").await, None);
}
