//! HTTP transport for the Google APIs
//!
//! [`ApiTransport`] is the seam between the service layer and the network:
//! the service decides what to call and meters it, the transport only
//! attaches credentials and moves bytes. No retries are attempted.

use crate::auth::GoogleAuth;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Data API base URL
pub const DATA_API: &str = "https://www.googleapis.com/youtube/v3";
/// Resumable/multipart upload base URL
pub const UPLOAD_API: &str = "https://www.googleapis.com/upload/youtube/v3";
/// Analytics reports endpoint
pub const ANALYTICS_API: &str = "https://youtubeanalytics.googleapis.com/v2/reports";

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

/// A JSON API call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Verb
    pub method: HttpMethod,
    /// Absolute URL without query string
    pub url: String,
    /// Query parameters
    pub query: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
}

impl ApiRequest {
    fn new(method: HttpMethod, url: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            body,
        }
    }

    /// GET `url`
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url, None)
    }

    /// POST `body` to `url`
    #[must_use]
    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, url, Some(body))
    }

    /// PUT `body` to `url`
    #[must_use]
    pub fn put(url: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Put, url, Some(body))
    }

    /// DELETE `url`
    #[must_use]
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url, None)
    }

    /// Append a query parameter
    #[must_use]
    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a query parameter when present
    #[must_use]
    pub fn param_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    /// Value of the first query parameter named `key`
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A media upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    /// Absolute upload URL
    pub url: String,
    /// Query parameters (besides `uploadType`)
    pub query: Vec<(String, String)>,
    /// Resource metadata; `None` for a bare media upload
    pub metadata: Option<Value>,
    /// File to send
    pub media_path: PathBuf,
    /// MIME type of the file
    pub content_type: String,
}

/// Sends authorized requests to Google
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Send a JSON request and return the decoded body (`Null` when empty)
    async fn send(&self, request: ApiRequest) -> Result<Value>;

    /// Upload a media file
    async fn upload(&self, request: UploadRequest) -> Result<Value>;
}

/// `reqwest`-backed transport
#[derive(Debug)]
pub struct HttpTransport {
    http: reqwest::Client,
    auth: Arc<GoogleAuth>,
}

impl HttpTransport {
    /// Create a transport that authenticates with `auth`
    pub fn new(auth: Arc<GoogleAuth>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { http, auth })
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let token = self.auth.access_token().await?;
        debug!(method = ?request.method, url = %request.url, "Calling Google API");

        let builder = match request.method {
            HttpMethod::Get => self.http.get(&request.url),
            HttpMethod::Post => self.http.post(&request.url),
            HttpMethod::Put => self.http.put(&request.url),
            HttpMethod::Delete => self.http.delete(&request.url),
        };
        let mut builder = builder
            .bearer_auth(token)
            .query(&request.query)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS));
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        read_response(builder.send().await?).await
    }

    async fn upload(&self, request: UploadRequest) -> Result<Value> {
        let token = self.auth.access_token().await?;
        let media = tokio::fs::read(&request.media_path).await?;
        debug!(
            url = %request.url,
            path = %request.media_path.display(),
            bytes = media.len(),
            "Uploading media"
        );

        let (upload_type, content_type, body) = match &request.metadata {
            Some(metadata) => {
                let boundary = format!("tubekit-{}", uuid::Uuid::new_v4().simple());
                let body = multipart_related(&boundary, metadata, &request.content_type, &media)?;
                (
                    "multipart",
                    format!("multipart/related; boundary={boundary}"),
                    body,
                )
            }
            None => ("media", request.content_type.clone(), media),
        };

        let resp = self
            .http
            .post(&request.url)
            .bearer_auth(token)
            .query(&[("uploadType", upload_type)])
            .query(&request.query)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;

        read_response(resp).await
    }
}

/// Assemble a `multipart/related` body: JSON metadata part, then media part.
fn multipart_related(
    boundary: &str,
    metadata: &Value,
    media_type: &str,
    media: &[u8],
) -> Result<Vec<u8>> {
    let json = serde_json::to_vec(metadata)?;
    let mut body = Vec::with_capacity(media.len() + json.len() + 256);
    body.extend_from_slice(
        format!("--{boundary}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(&json);
    body.extend_from_slice(format!("\r\n--{boundary}\r\nContent-Type: {media_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(media);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    Ok(body)
}

async fn read_response(resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        return Err(Error::Api {
            status: status.as_u16(),
            message: api_error_message(&text),
        });
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}

/// Pull `error.message` out of a Google error body, falling back to the raw text.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(200).collect())
}
