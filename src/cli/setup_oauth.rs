//! `tubekit setup-oauth`: obtain a refresh token through the browser.
//!
//! Starts a temporary HTTP server on the port of the configured redirect
//! URI, opens the consent page, waits for Google's callback, exchanges the
//! code and writes `GOOGLE_REFRESH_TOKEN` into `.env`.

use crate::server::config::AppConfig;
use anyhow::{anyhow, bail, Context, Result};
use axum::extract::{Query, State};
use axum::response::{Html, Redirect};
use axum::routing::get;
use axum::Router;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tubekit_youtube::GoogleAuth;

/// Timeout for waiting for the OAuth callback (5 minutes).
const OAUTH_TIMEOUT_SECS: u64 = 300;

const ENV_FILE: &str = ".env";
const REFRESH_TOKEN_VAR: &str = "GOOGLE_REFRESH_TOKEN";

/// Shared state for the callback handler.
#[derive(Clone)]
struct CallbackState {
    /// Sends `Ok(code)` on success or `Err(message)` on failure.
    #[allow(clippy::type_complexity)]
    code_tx: Arc<Mutex<Option<oneshot::Sender<Result<String, String>>>>>,
    /// Expected CSRF state parameter.
    expected_state: String,
    /// Consent URL, served as a redirect from `/`.
    auth_url: String,
}

impl CallbackState {
    fn finish(&self, outcome: Result<String, String>) {
        if let Some(tx) = self.code_tx.lock().ok().and_then(|mut opt| opt.take()) {
            let _ = tx.send(outcome);
        }
    }
}

/// Run the consent flow and persist the refresh token.
pub async fn run(config: &AppConfig) -> Result<()> {
    if config.google.client_id.is_empty() || config.google.client_secret.is_empty() {
        bail!(
            "GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET must be set in .env\n\n\
             1. Go to https://console.cloud.google.com\n\
             2. Create a new project or select existing\n\
             3. Enable YouTube Data API v3 and YouTube Analytics API\n\
             4. Go to Credentials > Create Credentials > OAuth 2.0 Client ID\n\
             5. Copy Client ID and Client Secret to .env"
        );
    }

    let redirect = reqwest::Url::parse(&config.google.redirect_uri)
        .context("GOOGLE_REDIRECT_URI is not a valid URL")?;
    let port = redirect.port_or_known_default().unwrap_or(3000);
    let callback_path = redirect.path().to_string();

    let auth = GoogleAuth::new(config.google.clone())?;
    let csrf_state = uuid::Uuid::new_v4().simple().to_string();
    let mut auth_url = reqwest::Url::parse(&auth.authorization_url()?)?;
    auth_url.query_pairs_mut().append_pair("state", &csrf_state);
    let auth_url = auth_url.to_string();

    let (code_tx, code_rx) = oneshot::channel::<Result<String, String>>();
    let state = CallbackState {
        code_tx: Arc::new(Mutex::new(Some(code_tx))),
        expected_state: csrf_state,
        auth_url: auth_url.clone(),
    };
    let app = Router::new()
        .route(&callback_path, get(callback_handler))
        .route("/", get(start_handler))
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind OAuth callback server on {addr}"))?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .ok();
    });

    println!("\n  === Tubekit OAuth Setup ===\n");
    println!("  Open this URL in your browser to authorize:\n");
    println!("    {auth_url}\n");
    if let Err(e) = try_open_browser(&auth_url) {
        println!("  Could not open browser automatically: {e}");
    }
    println!("  Waiting for callback on port {port}...");

    let outcome = tokio::time::timeout(
        std::time::Duration::from_secs(OAUTH_TIMEOUT_SECS),
        code_rx,
    )
    .await;
    let code = match outcome {
        Ok(Ok(Ok(code))) => Ok(code),
        Ok(Ok(Err(e))) => Err(anyhow!("Authorization failed: {e}")),
        Ok(Err(_)) => Err(anyhow!("OAuth callback channel closed")),
        Err(_) => Err(anyhow!("OAuth timeout ({OAUTH_TIMEOUT_SECS}s)")),
    };

    let saved = match code {
        Ok(code) => exchange_and_save(&auth, &code, Path::new(ENV_FILE)).await,
        Err(e) => Err(e),
    };

    // Give the browser time to receive the HTML response
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;
    let _ = shutdown_tx.send(());
    let _ = tokio::time::timeout(std::time::Duration::from_secs(2), server_handle).await;

    saved?;
    println!("\n  Authorization successful!");
    println!("  Refresh token saved to {ENV_FILE}\n");
    println!("  You can now start the server with: tubekit serve");
    Ok(())
}

async fn exchange_and_save(auth: &GoogleAuth, code: &str, env_path: &Path) -> Result<()> {
    let tokens = auth
        .exchange_code(code)
        .await
        .context("Error exchanging authorization code")?;
    let Some(refresh_token) = tokens.refresh_token else {
        bail!(
            "No refresh token received. Revoke access at \
             https://myaccount.google.com/permissions and retry."
        );
    };

    let current = match std::fs::read_to_string(env_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e).context("Failed to read .env"),
    };
    std::fs::write(
        env_path,
        upsert_env_var(&current, REFRESH_TOKEN_VAR, &refresh_token),
    )
    .context("Failed to write .env")
}

/// Set `key=value` in dotenv content, replacing an existing assignment.
fn upsert_env_var(content: &str, key: &str, value: &str) -> String {
    let prefix = format!("{key}=");
    let mut replaced = false;
    let mut lines: Vec<String> = content
        .lines()
        .map(|line| {
            if !replaced && line.trim_start().starts_with(&prefix) {
                replaced = true;
                format!("{key}={value}")
            } else {
                line.to_string()
            }
        })
        .collect();
    if !replaced {
        lines.push(format!("{key}={value}"));
    }

    let joined = lines.join("\n");
    format!("{}\n", joined.trim())
}

async fn start_handler(State(state): State<CallbackState>) -> Redirect {
    Redirect::temporary(&state.auth_url)
}

/// Axum handler for the OAuth callback route.
async fn callback_handler(
    State(state): State<CallbackState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    if let Some(error) = params.get("error") {
        state.finish(Err(error.clone()));
        return Html(error_html(error));
    }

    match params.get("state") {
        Some(received) if received == &state.expected_state => {}
        Some(_) => {
            let msg = "CSRF state mismatch";
            state.finish(Err(msg.to_string()));
            return Html(error_html(msg));
        }
        None => {
            let msg = "Missing state parameter in callback";
            state.finish(Err(msg.to_string()));
            return Html(error_html(msg));
        }
    }

    match params.get("code") {
        Some(code) => {
            state.finish(Ok(code.clone()));
            Html(success_html())
        }
        None => Html(error_html("No authorization code received")),
    }
}

/// Try to open a URL in the user's default browser.
fn try_open_browser(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()?;
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        return Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "unsupported platform",
        ));
    }
    Ok(())
}

fn success_html() -> String {
    r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Tubekit</title></head>
<body style="font-family:sans-serif;text-align:center;padding-top:4rem;">
  <h1>Authorization successful!</h1>
  <p>The refresh token is being saved to .env.</p>
  <p>You can close this window and start the MCP server.</p>
</body>
</html>"#
        .to_string()
}

fn error_html(error: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Tubekit</title></head>
<body style="font-family:sans-serif;text-align:center;padding-top:4rem;">
  <h1>Authorization failed</h1>
  <p>{}</p>
  <p>Close this tab and try again in your terminal.</p>
</body>
</html>"#,
        html_escape(error)
    )
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
