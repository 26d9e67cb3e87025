//! Canned-response transport and service wiring for tool tests

use super::ToolContext;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tubekit_core::{CalendarStore, Clock, ExpiringCache, ManualClock, QuotaConfig, QuotaGovernor};
use tubekit_youtube::{ApiRequest, ApiTransport, Error, Result, UploadRequest, YouTubeService};

/// Answers each request with the response of the first route whose URL
/// suffix matches, and records what was sent.
pub(crate) struct RoutedTransport {
    routes: Vec<(String, Value)>,
    pub(crate) sent: Mutex<Vec<ApiRequest>>,
}

impl RoutedTransport {
    pub(crate) fn new(routes: Vec<(&str, Value)>) -> Self {
        Self {
            routes: routes
                .into_iter()
                .map(|(suffix, body)| (suffix.to_string(), body))
                .collect(),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn sent_urls(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.url.clone())
            .collect()
    }
}

#[async_trait]
impl ApiTransport for RoutedTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let response = self
            .routes
            .iter()
            .find(|(suffix, _)| request.url.ends_with(suffix.as_str()))
            .map(|(_, body)| body.clone());
        self.sent.lock().unwrap().push(request.clone());
        response.ok_or_else(|| Error::Api {
            status: 404,
            message: format!("no route for {}", request.url),
        })
    }

    async fn upload(&self, request: UploadRequest) -> Result<Value> {
        Ok(json!({"id": "uploaded1", "status": {"uploadStatus": "uploaded"}, "url": request.url}))
    }
}

pub(crate) struct TestEnv {
    pub(crate) ctx: ToolContext,
    pub(crate) transport: Arc<RoutedTransport>,
    pub(crate) governor: Arc<QuotaGovernor>,
}

pub(crate) async fn env(routes: Vec<(&str, Value)>) -> TestEnv {
    env_with_budget(routes, 10_000).await
}

pub(crate) async fn env_with_budget(routes: Vec<(&str, Value)>, budget: u64) -> TestEnv {
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap(),
    ));
    let governor = Arc::new(QuotaGovernor::with_clock(
        QuotaConfig {
            daily_budget: budget,
        },
        Arc::clone(&clock),
    ));
    let cache = Arc::new(ExpiringCache::in_memory(300, Arc::clone(&clock)));
    cache.init().await.unwrap();
    let calendar = Arc::new(CalendarStore::in_memory());
    calendar.init().await.unwrap();

    let transport = Arc::new(RoutedTransport::new(routes));
    let youtube = YouTubeService::new(
        transport.clone(),
        Arc::clone(&governor),
        cache,
        Some("UCowner".to_string()),
    )
    .with_clock(clock);

    TestEnv {
        ctx: ToolContext::new(Arc::new(youtube), calendar),
        transport,
        governor,
    }
}

pub(crate) fn video(id: &str, title: &str, tags: &[&str], views: u64) -> Value {
    json!({
        "id": id,
        "snippet": {
            "title": title,
            "description": "",
            "tags": tags,
            "categoryId": "22",
            "channelTitle": "Somebody",
            "publishedAt": "2024-05-01T00:00:00Z"
        },
        "statistics": {"viewCount": views.to_string()},
        "status": {"privacyStatus": "public"}
    })
}
