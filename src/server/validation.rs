//! Startup configuration validation

use super::config::AppConfig;
use anyhow::{bail, Result};
use tracing::warn;

/// Check that the server can talk to YouTube with this configuration.
///
/// Missing credentials and zero budgets are fatal; questionable network
/// settings only warn.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let mut problems = Vec::new();

    if config.google.client_id.trim().is_empty() {
        problems.push("GOOGLE_CLIENT_ID is not set".to_string());
    }
    if config.google.client_secret.trim().is_empty() {
        problems.push("GOOGLE_CLIENT_SECRET is not set".to_string());
    }
    if config.google.refresh_token.trim().is_empty() {
        problems.push(
            "GOOGLE_REFRESH_TOKEN is not set; run `tubekit setup-oauth` to obtain one".to_string(),
        );
    }
    if config.quota.daily_budget == 0 {
        problems.push("quota.daily_budget must be greater than 0".to_string());
    }
    if config.cache.ttl_seconds == 0 {
        problems.push("cache.ttl_seconds must be greater than 0".to_string());
    }

    if !problems.is_empty() {
        bail!("Invalid configuration:\n  - {}", problems.join("\n  - "));
    }

    if config.youtube.channel_id().is_none() {
        warn!("YOUTUBE_CHANNEL_ID is not set; channel tools will act on the authorized account");
    }

    Ok(())
}

/// Warn about binding the SSE transport to every interface.
pub fn validate_sse_bind(host: &str) {
    if host == "0.0.0.0" {
        warn!(
            "SSE server is binding to all interfaces (0.0.0.0). \
             Consider 127.0.0.1 behind a reverse proxy."
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AppConfig {
        let mut config = AppConfig::default();
        config.google.client_id = "id".to_string();
        config.google.client_secret = "secret".to_string();
        config.google.refresh_token = "refresh".to_string();
        config
    }

    #[test]
    fn test_valid_config() {
        tokio_test::assert_ok!(validate_config(&valid()));
    }

    #[test]
    fn test_missing_refresh_token_points_at_setup() {
        let mut config = valid();
        config.google.refresh_token.clear();
        let err = validate_config(&config).unwrap_err().to_string();
        assert!(err.contains("setup-oauth"));
    }

    #[test]
    fn test_all_problems_reported_together() {
        let mut config = AppConfig::default();
        config.quota.daily_budget = 0;
        let err = validate_config(&config).unwrap_err().to_string();
        assert!(err.contains("GOOGLE_CLIENT_ID"));
        assert!(err.contains("GOOGLE_CLIENT_SECRET"));
        assert!(err.contains("daily_budget"));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut config = valid();
        config.cache.ttl_seconds = 0;
        tokio_test::assert_err!(validate_config(&config));
    }
}
