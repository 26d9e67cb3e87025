//! Tubekit - YouTube channel management over MCP
//!
//! CLI entry point. Stdout carries MCP traffic in stdio mode, so logs go to
//! stderr and, optionally, to a daily-rolling file.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use server::config::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod mcp;
mod server;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();
    let config = server::load_config(cli.config.as_deref())?;
    let _log_guard = init_logging(&config.logging);

    cli::run(cli, config).await
}

/// Install the global subscriber. The returned guard flushes the file
/// writer on drop.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "tubekit={level},tubekit_core={level},tubekit_youtube={level},\
             tubekit_tools={level},tower_http=warn",
            level = config.level
        )
        .into()
    });

    let (file_layer, guard) = match config.directory() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "tubekit.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}
