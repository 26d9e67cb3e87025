//! Tubekit Tools - MCP tool catalog
//!
//! This crate exposes the channel-management operations as MCP tools:
//! - Registry: tool registration, lookup and dispatch
//! - Builtins: the video, analytics, SEO, research, playlist, comment,
//!   community, calendar and quota tools

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod args;
pub mod builtins;
pub mod error;
pub mod registry;

pub use builtins::{register_youtube_tools, ToolContext};
pub use error::{Error, Result};
pub use registry::{RiskLevel, Tool, ToolCategory, ToolDefinition, ToolRegistry, ToolResult};
