//! Quota-metered, cached YouTube operations
//!
//! Every operation follows the same shape: compute a cache key, return a
//! live cache hit if there is one, otherwise authorize the call's units
//! with the governor, call the API, and cache the result. Writes skip the
//! cache lookup and invalidate the keys they make stale.
//!
//! Quota is consumed immediately before each remote call, never after, so a
//! [`QuotaExceeded`](tubekit_core::QuotaExceeded) always means nothing was
//! sent.

mod analytics;
mod channels;
mod comments;
mod playlists;
mod videos;

pub use channels::{SearchParams, TrendingParams};
pub use comments::CommentsParams;
pub use playlists::CreatePlaylistParams;
pub use videos::{ListVideosParams, UpdateVideoParams, UploadVideoParams};

use crate::error::Result;
use crate::transport::{ApiRequest, ApiTransport, UploadRequest};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};
use tubekit_core::{Clock, ExpiringCache, QuotaGovernor, QuotaStatus, SystemClock};

/// Channel-scoped YouTube client
pub struct YouTubeService {
    transport: Arc<dyn ApiTransport>,
    governor: Arc<QuotaGovernor>,
    cache: Arc<ExpiringCache>,
    channel_id: Option<String>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for YouTubeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeService")
            .field("channel_id", &self.channel_id)
            .field("governor", &self.governor)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl YouTubeService {
    /// Create a service for `channel_id` (the authorized user's own channel
    /// when `None`).
    #[must_use]
    pub fn new(
        transport: Arc<dyn ApiTransport>,
        governor: Arc<QuotaGovernor>,
        cache: Arc<ExpiringCache>,
        channel_id: Option<String>,
    ) -> Self {
        Self {
            transport,
            governor,
            cache,
            channel_id: channel_id.filter(|id| !id.trim().is_empty()),
            clock: Arc::new(SystemClock),
        }
    }

    /// Use `clock` for analytics reporting windows
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Configured channel, if any
    #[must_use]
    pub fn channel_id(&self) -> Option<&str> {
        self.channel_id.as_deref()
    }

    /// Shared governor
    #[must_use]
    pub fn governor(&self) -> &Arc<QuotaGovernor> {
        &self.governor
    }

    /// Current quota window
    #[must_use]
    pub fn quota_status(&self) -> QuotaStatus {
        self.governor.status()
    }

    /// Return the cached value for `key`, or compute, cache and return it.
    ///
    /// A failed cache write is logged; the fetched value is still returned.
    async fn read_through<T, F, Fut>(&self, key: &str, ttl: Option<u64>, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(hit) = self.cache.get::<T>(key).await {
            return Ok(hit);
        }
        debug!(key, "Cache miss");

        let value = fetch().await?;
        if let Err(e) = self.cache.set(key, &value, ttl).await {
            warn!(key, error = %e, "Failed to cache response");
        }
        Ok(value)
    }

    /// Authorize `units`, then send.
    async fn call(&self, units: u64, operation: &str, request: ApiRequest) -> Result<Value> {
        self.governor.consume(units, operation)?;
        self.transport.send(request).await
    }

    /// [`call`](Self::call) and decode the body.
    async fn call_as<T: DeserializeOwned>(
        &self,
        units: u64,
        operation: &str,
        request: ApiRequest,
    ) -> Result<T> {
        let body = self.call(units, operation, request).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Authorize `units`, then upload.
    async fn upload<T: DeserializeOwned>(
        &self,
        units: u64,
        operation: &str,
        request: UploadRequest,
    ) -> Result<T> {
        self.governor.consume(units, operation)?;
        let body = self.transport.upload(request).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Drop cached entries matching `pattern`. Failures only leave data stale
    /// until its TTL runs out, so they are logged and ignored.
    async fn invalidate(&self, pattern: &str) {
        if let Err(e) = self.cache.invalidate(pattern).await {
            warn!(pattern, error = %e, "Cache invalidation failed");
        }
    }
}

/// Pick a media type from the file extension.
fn content_type_for(path: &std::path::Path, fallback: &str) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("mp4") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        _ => fallback,
    }
    .to_string()
}

/// Fail with `InvalidInput` unless `path` is an existing file.
async fn require_file(path: &std::path::Path) -> Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(crate::Error::InvalidInput(format!(
            "file not found: {}",
            path.display()
        ))),
    }
}
