//! CLI module for Tubekit
//!
//! - `serve`: MCP over stdio (default)
//! - `sse`: MCP over HTTP + Server-Sent Events
//! - `setup-oauth`: browser consent flow that stores a refresh token
//! - `tools`: print the tool catalog

use crate::server::{self, config::AppConfig, Transport};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod setup_oauth;

/// YouTube channel management over the Model Context Protocol
#[derive(Parser, Debug)]
#[command(name = "tubekit")]
#[command(about = "YouTube channel management tools for MCP clients")]
#[command(version)]
pub struct Cli {
    /// Extra configuration file layered over the defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Serve MCP over stdin/stdout (default)
    Serve,
    /// Serve MCP over HTTP with Server-Sent Events
    Sse {
        /// Bind address (default: sse.host)
        #[arg(long)]
        host: Option<String>,
        /// Port (default: sse.port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Authorize with Google and save the refresh token to .env
    SetupOauth,
    /// Print the tool catalog as JSON
    Tools,
}

/// Run the CLI command
pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => server::run(config, Transport::Stdio).await,
        Commands::Sse { host, port } => {
            let transport = Transport::Sse {
                host: host.unwrap_or_else(|| config.sse.host.clone()),
                port: port.unwrap_or(config.sse.port),
            };
            server::run(config, transport).await
        }
        Commands::SetupOauth => setup_oauth::run(&config).await,
        Commands::Tools => {
            let catalog = server::tool_catalog(&config)?;
            println!("{}", serde_json::to_string_pretty(&catalog)?);
            Ok(())
        }
    }
}
