//! Model Context Protocol server
//!
//! JSON-RPC 2.0 dispatch over the tool registry, served on two transports:
//! - `stdio`: one JSON message per line on stdin/stdout
//! - `sse`: HTTP with a Server-Sent Events stream per session

mod handler;
mod protocol;
mod sse;
mod stdio;

pub use handler::McpHandler;
pub use sse::router as sse_router;
pub use stdio::serve as serve_stdio;
