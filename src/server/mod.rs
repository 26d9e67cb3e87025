//! Server module for Tubekit
//!
//! # Module Structure
//!
//! - `config`: Configuration structures
//! - `loader`: Configuration loading from files and environment
//! - `validation`: Startup configuration checks
//! - `init`: Service wiring and the transport run loops

pub mod config;
mod init;
mod loader;
mod validation;

pub use init::{run, tool_catalog, Transport};
pub use loader::load_config;
