//! Tubekit YouTube client
//!
//! Talks to the YouTube Data API v3 and the YouTube Analytics API v2 on
//! behalf of one channel. Every remote call is authorized against the
//! shared [`QuotaGovernor`](tubekit_core::QuotaGovernor) first, and read
//! operations go through the [`ExpiringCache`](tubekit_core::ExpiringCache)
//! so repeated lookups do not spend quota.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod auth;
pub mod cost;
pub mod error;
pub mod helpers;
pub mod service;
pub mod transport;
pub mod types;

pub use auth::{GoogleAuth, OAuthConfig, OAuthTokens, OAUTH_SCOPES};
pub use error::{Error, Result};
pub use service::YouTubeService;
pub use transport::{ApiRequest, ApiTransport, HttpMethod, HttpTransport, UploadRequest};
