//! Server configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tubekit_core::{CacheConfig, QuotaConfig};
use tubekit_youtube::OAuthConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub google: OAuthConfig,
    #[serde(default)]
    pub youtube: YouTubeConfig,
    #[serde(default)]
    pub quota: QuotaConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub sse: SseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Channel selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YouTubeConfig {
    /// Channel acted on; empty means the authorized user's own channel
    #[serde(default)]
    pub channel_id: String,
}

impl YouTubeConfig {
    pub fn channel_id(&self) -> Option<String> {
        let id = self.channel_id.trim();
        (!id.is_empty()).then(|| id.to_string())
    }
}

/// Content calendar storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_calendar_db_path")]
    pub db_path: PathBuf,
}

fn default_calendar_db_path() -> PathBuf {
    PathBuf::from("data/calendar.db")
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            db_path: default_calendar_db_path(),
        }
    }
}

/// HTTP+SSE transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SseConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for SseConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Log output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level for the `tubekit` targets when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,
    /// Directory for daily-rolling log files; empty disables them
    #[serde(default)]
    pub directory: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            directory: String::new(),
        }
    }
}

impl LoggingConfig {
    pub fn directory(&self) -> Option<PathBuf> {
        let dir = self.directory.trim();
        (!dir.is_empty()).then(|| PathBuf::from(dir))
    }
}
