//! Configuration loading
//!
//! Handles loading configuration from embedded defaults, files, and environment.

use super::config::AppConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Flat variable names that override every other source
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("GOOGLE_CLIENT_ID", "google.client_id"),
    ("GOOGLE_CLIENT_SECRET", "google.client_secret"),
    ("GOOGLE_REDIRECT_URI", "google.redirect_uri"),
    ("GOOGLE_REFRESH_TOKEN", "google.refresh_token"),
    ("YOUTUBE_CHANNEL_ID", "youtube.channel_id"),
    ("YOUTUBE_DAILY_QUOTA", "quota.daily_budget"),
    ("CACHE_TTL_SECONDS", "cache.ttl_seconds"),
    ("CACHE_DB_PATH", "cache.db_path"),
    ("CALENDAR_DB_PATH", "calendar.db_path"),
    ("SSE_HOST", "sse.host"),
    ("SSE_PORT", "sse.port"),
];

/// Load configuration from files and environment
pub fn load_config(extra: Option<&Path>) -> Result<AppConfig> {
    load_with(extra, |name| std::env::var(name).ok())
}

/// Load configuration, reading the flat overrides through `lookup`
pub fn load_with(
    extra: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<AppConfig> {
    let mut builder = Config::builder()
        // 1. Embedded defaults (always available)
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        // 2. External overrides (optional)
        .add_source(File::with_name("config/local").required(false));

    if let Some(path) = extra {
        builder = builder.add_source(File::from(path).required(true));
    }

    // 3. TUBEKIT_QUOTA__DAILY_BUDGET style variables
    builder = builder.add_source(
        Environment::with_prefix("TUBEKIT")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. Flat names, highest priority
    for (name, key) in ENV_OVERRIDES {
        let value = lookup(name).filter(|v| !v.trim().is_empty());
        builder = builder
            .set_override_option(*key, value)
            .with_context(|| format!("Invalid override {name}"))?;
    }

    builder
        .build()
        .context("Failed to build configuration")?
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_embedded_defaults() {
        let config = load_with(None, env(&[])).unwrap();
        assert_eq!(config.quota.daily_budget, 10_000);
        assert_eq!(config.cache.ttl_seconds, 300);
        assert_eq!(config.cache.db_path, Path::new("data/cache.db"));
        assert_eq!(config.calendar.db_path, Path::new("data/calendar.db"));
        assert_eq!(config.sse.port, 3000);
        assert_eq!(
            config.google.redirect_uri,
            "http://localhost:3000/oauth/callback"
        );
        assert!(config.youtube.channel_id().is_none());
        assert!(config.logging.directory().is_none());
    }

    #[test]
    fn test_flat_variables_override() {
        let config = load_with(
            None,
            env(&[
                ("YOUTUBE_DAILY_QUOTA", "500"),
                ("CACHE_TTL_SECONDS", "60"),
                ("SSE_PORT", "8080"),
                ("GOOGLE_REFRESH_TOKEN", "1//token"),
                ("YOUTUBE_CHANNEL_ID", "UCabc"),
            ]),
        )
        .unwrap();
        assert_eq!(config.quota.daily_budget, 500);
        assert_eq!(config.cache.ttl_seconds, 60);
        assert_eq!(config.sse.port, 8080);
        assert_eq!(config.google.refresh_token, "1//token");
        assert_eq!(config.youtube.channel_id().as_deref(), Some("UCabc"));
    }

    #[test]
    fn test_blank_variable_is_ignored() {
        let config = load_with(None, env(&[("YOUTUBE_DAILY_QUOTA", "  ")])).unwrap();
        assert_eq!(config.quota.daily_budget, 10_000);
    }

    #[test]
    fn test_config_file_layer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tubekit.toml");
        std::fs::write(&path, "[quota]\ndaily_budget = 2500\n[sse]\nport = 9000\n").unwrap();

        let config = load_with(Some(path.as_path()), env(&[("SSE_PORT", "9100")])).unwrap();
        assert_eq!(config.quota.daily_budget, 2500);
        assert_eq!(config.sse.port, 9100);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        tokio_test::assert_err!(load_with(
            Some(Path::new("/nonexistent/tubekit.toml")),
            env(&[])
        ));
    }
}
