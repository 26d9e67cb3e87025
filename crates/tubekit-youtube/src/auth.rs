//! Google OAuth2 for the YouTube APIs
//!
//! The server runs unattended with a long-lived refresh token. Access tokens
//! are minted on demand and reused until shortly before they expire. The
//! authorization-code half of the flow is only used by `setup-oauth`.

use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Google authorization endpoint
pub const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
/// Google token endpoint
pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Scopes needed by the tool catalog
pub const OAUTH_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/youtube",
    "https://www.googleapis.com/auth/youtube.upload",
    "https://www.googleapis.com/auth/youtube.force-ssl",
    "https://www.googleapis.com/auth/yt-analytics.readonly",
    "https://www.googleapis.com/auth/yt-analytics-monetary.readonly",
];

/// Refresh this long before the reported expiry
const EXPIRY_MARGIN_SECS: i64 = 60;

/// OAuth client credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// OAuth2 client ID
    pub client_id: String,
    /// OAuth2 client secret
    pub client_secret: String,
    /// Redirect URI registered for the client
    pub redirect_uri: String,
    /// Long-lived refresh token (empty until `setup-oauth` has run)
    pub refresh_token: String,
}

/// Tokens returned by the token endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthTokens {
    /// Short-lived bearer token
    pub access_token: String,
    /// Present on the first consent and occasionally on refresh
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Access-token source backed by a refresh token
pub struct GoogleAuth {
    config: OAuthConfig,
    http: reqwest::Client,
    token_url: String,
    cached: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for GoogleAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleAuth")
            .field("client_id", &self.config.client_id)
            .field("redirect_uri", &self.config.redirect_uri)
            .finish_non_exhaustive()
    }
}

impl GoogleAuth {
    /// Create an auth client for the given credentials
    pub fn new(config: OAuthConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Auth(format!("HTTP client error: {e}")))?;

        Ok(Self {
            config,
            http,
            token_url: TOKEN_URL.to_string(),
            cached: Mutex::new(None),
        })
    }

    /// Override the token endpoint
    #[must_use]
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Credentials in use
    #[must_use]
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Consent URL for an offline-access grant of [`OAUTH_SCOPES`].
    pub fn authorization_url(&self) -> Result<String> {
        let scope = OAUTH_SCOPES.join(" ");
        let url = url::Url::parse_with_params(
            AUTH_URL,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", scope.as_str()),
                ("access_type", "offline"),
                ("prompt", "consent"),
            ],
        )
        .map_err(|e| Error::Auth(format!("invalid authorization URL: {e}")))?;
        Ok(url.into())
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<OAuthTokens> {
        debug!("Exchanging authorization code for tokens");
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ])
        .await
    }

    /// Bearer token for the next request, refreshing when needed.
    pub async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(token.token.clone());
            }
        }

        if self.config.refresh_token.is_empty() {
            return Err(Error::Auth(
                "no refresh token configured, run `tubekit setup-oauth`".to_string(),
            ));
        }

        let tokens = self
            .token_request(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.config.refresh_token.as_str()),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .await?;

        let lifetime = tokens.expires_in.unwrap_or(3600);
        let expires_at = Utc::now() + Duration::seconds((lifetime - EXPIRY_MARGIN_SECS).max(0));
        info!(expires_at = %expires_at, "OAuth access token refreshed");

        *cached = Some(CachedToken {
            token: tokens.access_token.clone(),
            expires_at,
        });
        Ok(tokens.access_token)
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<OAuthTokens> {
        let resp = self
            .http
            .post(&self.token_url)
            .form(form)
            .send()
            .await
            .map_err(|e| Error::Auth(format!("token request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Auth(format!("failed to read token response: {e}")))?;

        if !status.is_success() {
            return Err(Error::Auth(format!(
                "token endpoint returned HTTP {status}: {}",
                truncate(&body, 200)
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::Auth(format!("malformed token response: {e}")))
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(refresh_token: &str) -> GoogleAuth {
        GoogleAuth::new(OAuthConfig {
            client_id: "client-123.apps.googleusercontent.com".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://localhost:3000/oauth/callback".to_string(),
            refresh_token: refresh_token.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_authorization_url() {
        let url = url::Url::parse(&auth("").authorization_url().unwrap()).unwrap();
        let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("accounts.google.com"));
        assert_eq!(params["access_type"], "offline");
        assert_eq!(params["prompt"], "consent");
        assert_eq!(params["response_type"], "code");
        assert_eq!(params["redirect_uri"], "http://localhost:3000/oauth/callback");
        for scope in OAUTH_SCOPES {
            assert!(params["scope"].split(' ').any(|s| s == *scope));
        }
    }

    #[tokio::test]
    async fn test_missing_refresh_token() {
        let err = auth("").access_token().await.unwrap_err();
        assert!(matches!(err, Error::Auth(msg) if msg.contains("setup-oauth")));
    }

    #[tokio::test]
    async fn test_cached_token_is_reused() {
        let auth = auth("refresh").with_token_url("http://127.0.0.1:9/unreachable");
        *auth.cached.lock().await = Some(CachedToken {
            token: "cached".to_string(),
            expires_at: Utc::now() + Duration::minutes(10),
        });
        assert_eq!(auth.access_token().await.unwrap(), "cached");
    }

    #[test]
    fn test_token_response_parse() {
        let tokens: OAuthTokens =
            serde_json::from_str(r#"{"access_token":"ya29","expires_in":3599,"token_type":"Bearer"}"#)
                .unwrap();
        assert_eq!(tokens.access_token, "ya29");
        assert_eq!(tokens.expires_in, Some(3599));
        assert!(tokens.refresh_token.is_none());
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("short", 200), "short");
    }
}
