//! Expiring SQLite cache
//!
//! Durable key/value store of JSON values with a per-entry expiry time.
//! Entries are written with a TTL and become invisible to [`ExpiringCache::get`]
//! the moment they expire, whether or not a sweep has removed them yet.
//! Expired rows are physically deleted on [`ExpiringCache::init`].
//!
//! The cache never blocks the caller on its own failures: reads fail open
//! (a storage or decode error is a miss) and writes report an error the
//! caller is expected to log and ignore.

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, instrument, warn};

/// Default entry lifetime in seconds
pub const DEFAULT_TTL_SECONDS: u64 = 300;

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of entries written without an explicit TTL
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    /// Database file
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

fn default_ttl_seconds() -> u64 {
    DEFAULT_TTL_SECONDS
}

fn default_db_path() -> PathBuf {
    PathBuf::from("data/cache.db")
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            db_path: default_db_path(),
        }
    }
}

/// Build a cache key from an operation name and its parameters.
///
/// Parameters are serialized with `serde_json`; struct fields serialize in
/// declaration order, so equal requests always map to the same key.
/// Parameters that cannot be encoded are an error rather than a shared key.
pub fn cache_key<P: Serialize + ?Sized>(
    operation: &str,
    params: &P,
) -> serde_json::Result<String> {
    let encoded = serde_json::to_string(params)?;
    Ok(format!("{operation}:{encoded}"))
}

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    Memory,
}

/// SQLite-backed TTL cache.
///
/// Lifecycle: construct, [`init`](Self::init) once at startup,
/// [`close`](Self::close) on shutdown. Before `init` and after `close`
/// every lookup is a miss and every write is a no-op.
pub struct ExpiringCache {
    location: Location,
    default_ttl: u64,
    pool: RwLock<Option<SqlitePool>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ExpiringCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiringCache")
            .field("location", &self.location)
            .field("default_ttl", &self.default_ttl)
            .field("open", &self.is_open())
            .finish()
    }
}

impl ExpiringCache {
    /// Create a cache backed by the configured file
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a file-backed cache on an explicit clock
    #[must_use]
    pub fn with_clock(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            location: Location::File(config.db_path.clone()),
            default_ttl: config.ttl_seconds.max(1),
            pool: RwLock::new(None),
            clock,
        }
    }

    /// Create an in-memory cache (for testing)
    #[must_use]
    pub fn in_memory(default_ttl: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            location: Location::Memory,
            default_ttl: default_ttl.max(1),
            pool: RwLock::new(None),
            clock,
        }
    }

    /// Default TTL in seconds
    #[must_use]
    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    /// Whether `init` has run and `close` has not
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.current_pool().is_some()
    }

    /// Open the store, create the schema and sweep expired entries.
    ///
    /// Returns the number of rows swept. Calling it again on an open cache
    /// only repeats the sweep.
    pub async fn init(&self) -> Result<u64> {
        let pool = match self.current_pool() {
            Some(pool) => pool,
            None => {
                let pool = self.connect().await?;
                run_migrations(&pool).await?;
                *self.pool.write().unwrap_or_else(|e| e.into_inner()) = Some(pool.clone());
                pool
            }
        };

        let swept = self.sweep(&pool).await?;
        info!(location = ?self.location, swept, "Cache initialized");
        Ok(swept)
    }

    /// Look up a live entry.
    ///
    /// Returns `None` on a miss, for an expired entry, and on any storage or
    /// decode failure.
    #[instrument(skip(self), level = "debug")]
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let pool = self.current_pool()?;
        let now = self.clock.now_millis();

        let row: Option<String> =
            match sqlx::query_scalar("SELECT value FROM cache WHERE key = ? AND expires_at > ?")
                .bind(key)
                .bind(now)
                .fetch_optional(&pool)
                .await
            {
                Ok(row) => row,
                Err(e) => {
                    warn!(key, error = %e, "Cache read failed, treating as miss");
                    return None;
                }
            };

        let raw = row?;
        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(key, "Cache hit");
                Some(value)
            }
            Err(e) => {
                warn!(key, error = %e, "Cached value could not be decoded, treating as miss");
                None
            }
        }
    }

    /// Store `value` under `key`, replacing any previous entry.
    ///
    /// `ttl_seconds` falls back to the configured default.
    #[instrument(skip(self, value), level = "debug")]
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: Option<u64>,
    ) -> Result<()> {
        let Some(pool) = self.current_pool() else {
            debug!(key, "Cache not open, skipping write");
            return Ok(());
        };

        let encoded = serde_json::to_string(value)?;
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);
        let ttl_millis = i64::try_from(ttl.saturating_mul(1000)).unwrap_or(i64::MAX);
        let expires_at = self.clock.now_millis().saturating_add(ttl_millis);

        sqlx::query(
            r#"
            INSERT INTO cache (key, value, expires_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, expires_at = excluded.expires_at
            "#,
        )
        .bind(key)
        .bind(encoded)
        .bind(expires_at)
        .execute(&pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }

    /// Delete every entry whose key matches a SQL `LIKE` pattern.
    ///
    /// `%` matches any run of characters and `_` a single character. A
    /// pattern without wildcards removes exactly that key.
    #[instrument(skip(self), level = "debug")]
    pub async fn invalidate(&self, pattern: &str) -> Result<u64> {
        let Some(pool) = self.current_pool() else {
            return Ok(0);
        };

        let removed = sqlx::query("DELETE FROM cache WHERE key LIKE ?")
            .bind(pattern)
            .execute(&pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?
            .rows_affected();

        debug!(pattern, removed, "Cache invalidated");
        Ok(removed)
    }

    /// Release the store. Safe to call repeatedly.
    pub async fn close(&self) {
        let pool = self.pool.write().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(pool) = pool {
            pool.close().await;
            info!(location = ?self.location, "Cache closed");
        }
    }

    fn current_pool(&self) -> Option<SqlitePool> {
        self.pool
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    async fn connect(&self) -> Result<SqlitePool> {
        match &self.location {
            Location::File(path) => connect_file(path).await,
            Location::Memory => SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect("sqlite::memory:")
                .await
                .map_err(|e| Error::Database(e.to_string())),
        }
    }

    async fn sweep(&self, pool: &SqlitePool) -> Result<u64> {
        let swept = sqlx::query("DELETE FROM cache WHERE expires_at <= ?")
            .bind(self.clock.now_millis())
            .execute(pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?
            .rows_affected();
        Ok(swept)
    }
}

pub(crate) async fn connect_file(path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Database(format!("failed to create directory: {e}")))?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| Error::Database(format!("failed to open {}: {e}", path.display())))
}

async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cache (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            expires_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| Error::Database(e.to_string()))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_cache_expires ON cache(expires_at)")
        .execute(pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests;
