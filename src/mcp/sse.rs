//! HTTP + Server-Sent Events transport
//!
//! A client opens `GET /sse`, receives an `endpoint` event naming its
//! message URL, then POSTs JSON-RPC messages to `/message?sessionId=<id>`.
//! Each POST is answered with 202 and the JSON-RPC response arrives on the
//! session's event stream.

use super::handler::McpHandler;
use super::protocol::JsonRpcResponse;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use futures::{Stream, StreamExt};
use serde::Deserialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use tubekit_core::QuotaGovernor;
use uuid::Uuid;

/// Responses buffered per session before POSTs start waiting
const SESSION_BUFFER: usize = 32;

type Sessions = Arc<RwLock<HashMap<Uuid, mpsc::Sender<JsonRpcResponse>>>>;

#[derive(Clone)]
struct SseState {
    handler: Arc<McpHandler>,
    governor: Arc<QuotaGovernor>,
    sessions: Sessions,
    cancel: CancellationToken,
}

/// Build the SSE router. Streams end when `cancel` fires.
pub fn router(
    handler: Arc<McpHandler>,
    governor: Arc<QuotaGovernor>,
    cancel: CancellationToken,
) -> Router {
    let state = SseState {
        handler,
        governor,
        sessions: Arc::new(RwLock::new(HashMap::new())),
        cancel,
    };

    Router::new()
        .route("/health", get(health))
        .route("/sse", get(open_session))
        .route("/message", post(post_message))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health(State(state): State<SseState>) -> Json<serde_json::Value> {
    let sessions = state.sessions.read().map(|s| s.len()).unwrap_or_default();
    Json(serde_json::json!({
        "status": "ok",
        "server": "tubekit",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": sessions,
        "quota": state.governor.status(),
    }))
}

/// Removes the session from the table when its stream is dropped
struct SessionGuard {
    id: Uuid,
    sessions: Sessions,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.remove(&self.id);
        }
        info!(session_id = %self.id, "SSE client disconnected");
    }
}

async fn open_session(
    State(state): State<SseState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let id = Uuid::new_v4();
    let (tx, rx) = mpsc::channel::<JsonRpcResponse>(SESSION_BUFFER);
    if let Ok(mut sessions) = state.sessions.write() {
        sessions.insert(id, tx);
    }
    info!(session_id = %id, "SSE client connected");

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("/message?sessionId={id}"));
    let guard = SessionGuard {
        id,
        sessions: state.sessions.clone(),
    };

    let messages = futures::stream::unfold((rx, guard), |(mut rx, guard)| async move {
        let response = rx.recv().await?;
        Some((Ok(message_event(&response)), (rx, guard)))
    });

    let stream = futures::stream::once(async move { Ok(endpoint) })
        .chain(messages)
        .take_until(state.cancel.cancelled_owned());

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(30)))
}

fn message_event(response: &JsonRpcResponse) -> Event {
    match serde_json::to_string(response) {
        Ok(json) => Event::default().event("message").data(json),
        Err(e) => {
            warn!(error = %e, "Failed to encode SSE message");
            Event::default().comment("encode error")
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: Uuid,
}

async fn post_message(
    State(state): State<SseState>,
    Query(query): Query<MessageQuery>,
    body: String,
) -> Response {
    let sender = state
        .sessions
        .read()
        .ok()
        .and_then(|s| s.get(&query.session_id).cloned());
    let Some(sender) = sender else {
        return (StatusCode::NOT_FOUND, "Unknown session").into_response();
    };

    debug!(session_id = %query.session_id, "SSE message received");
    let handler = state.handler.clone();
    tokio::spawn(async move {
        if let Some(response) = handler.handle_message(&body).await {
            if sender.send(response).await.is_err() {
                debug!("SSE session closed before the response was delivered");
            }
        }
    });

    StatusCode::ACCEPTED.into_response()
}
