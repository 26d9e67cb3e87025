//! Service wiring and server run loops

use super::config::AppConfig;
use super::validation::{validate_config, validate_sse_bind};
use crate::mcp::{serve_stdio, sse_router, McpHandler};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{info, warn};
use tubekit_core::{
    wait_for_shutdown_signal, CalendarStore, ExpiringCache, QuotaGovernor, ShutdownController,
};
use tubekit_tools::{register_youtube_tools, ToolContext, ToolRegistry};
use tubekit_youtube::{GoogleAuth, HttpTransport, YouTubeService};

/// Which MCP transport to serve
#[derive(Debug, Clone)]
pub enum Transport {
    /// JSON-RPC lines on stdin/stdout
    Stdio,
    /// HTTP with Server-Sent Events
    Sse { host: String, port: u16 },
}

/// Shared state behind every transport
pub struct Services {
    pub registry: Arc<ToolRegistry>,
    pub governor: Arc<QuotaGovernor>,
    pub cache: Arc<ExpiringCache>,
    pub calendar: Arc<CalendarStore>,
}

impl Services {
    /// Build the services without touching the databases
    pub fn build(config: &AppConfig) -> Result<Self> {
        let auth = Arc::new(
            GoogleAuth::new(config.google.clone()).context("Failed to create OAuth client")?,
        );
        let transport =
            Arc::new(HttpTransport::new(auth).context("Failed to create HTTP client")?);
        let governor = Arc::new(QuotaGovernor::new(config.quota));
        let cache = Arc::new(ExpiringCache::new(&config.cache));
        let calendar = Arc::new(CalendarStore::new(config.calendar.db_path.clone()));

        let youtube = Arc::new(YouTubeService::new(
            transport,
            governor.clone(),
            cache.clone(),
            config.youtube.channel_id(),
        ));

        let mut registry = ToolRegistry::new();
        register_youtube_tools(&mut registry, &ToolContext::new(youtube, calendar.clone()));
        info!(
            tools = registry.len(),
            daily_budget = governor.daily_budget(),
            "Tool registry initialized"
        );

        Ok(Self {
            registry: Arc::new(registry),
            governor,
            cache,
            calendar,
        })
    }

    /// Open the cache and the calendar. Whatever was opened is closed
    /// again if a later step fails.
    pub async fn open(&self) -> Result<()> {
        self.cache.init().await.context("Failed to open cache")?;
        if let Err(e) = self.calendar.init().await {
            self.cache.close().await;
            return Err(e).context("Failed to open content calendar");
        }
        Ok(())
    }

    /// Close the cache and the calendar
    pub async fn close(&self) {
        self.cache.close().await;
        self.calendar.close().await;
        info!("Storage closed");
    }
}

/// Tool catalog grouped by category, for `tubekit tools`
pub fn tool_catalog(config: &AppConfig) -> Result<serde_json::Value> {
    let services = Services::build(config)?;
    let mut catalog = serde_json::Map::new();
    for category in tubekit_tools::ToolCategory::ALL {
        let tools = services.registry.list_by_category(category);
        if !tools.is_empty() {
            catalog.insert(
                category.as_str().to_string(),
                serde_json::to_value(tools).context("Failed to encode tool catalog")?,
            );
        }
    }
    Ok(serde_json::Value::Object(catalog))
}

/// Validate the configuration, open storage and serve until shutdown.
pub async fn run(config: AppConfig, transport: Transport) -> Result<()> {
    validate_config(&config)?;
    info!("Starting Tubekit v{}", env!("CARGO_PKG_VERSION"));

    let services = Services::build(&config)?;
    services.open().await?;

    let shutdown = ShutdownController::new();
    let signal_shutdown = shutdown.clone();
    let signal_task = tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        signal_shutdown.shutdown().await;
    });

    let handler = Arc::new(McpHandler::new(
        services.registry.clone(),
        shutdown.clone(),
    ));
    let result = match transport {
        Transport::Stdio => {
            let reader = BufReader::new(tokio::io::stdin());
            serve_stdio(&handler, reader, tokio::io::stdout(), shutdown.token()).await
        }
        Transport::Sse { host, port } => {
            serve_sse(handler, services.governor.clone(), &shutdown, &host, port).await
        }
    };

    if shutdown.is_shutting_down() {
        // The signal task is draining in-flight calls.
        let _ = signal_task.await;
    } else {
        // Stdin reached EOF.
        shutdown.shutdown().await;
        signal_task.abort();
    }
    services.close().await;

    if let Err(e) = &result {
        warn!(error = %e, "Server stopped with an error");
    }
    info!("Tubekit shutdown complete");
    result
}

async fn serve_sse(
    handler: Arc<McpHandler>,
    governor: Arc<QuotaGovernor>,
    shutdown: &Arc<ShutdownController>,
    host: &str,
    port: u16,
) -> Result<()> {
    validate_sse_bind(host);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .context("Invalid server address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("MCP SSE server listening on http://{}/sse", addr);

    let app = sse_router(handler, governor, shutdown.token());
    let token = shutdown.token();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { token.cancelled().await })
        .await
        .context("HTTP server error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_groups_every_tool() {
        let catalog = tool_catalog(&AppConfig::default()).unwrap();
        let groups = catalog.as_object().unwrap();
        assert_eq!(groups.len(), 9);
        let total: usize = groups
            .values()
            .map(|tools| tools.as_array().unwrap().len())
            .sum();
        assert_eq!(total, 33);
        assert_eq!(catalog["utility"][0]["name"], "get_quota_status");
        assert_eq!(catalog["video"][0]["risk_level"], "high");
    }

    #[tokio::test]
    async fn test_services_open_and_close() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.cache.db_path = dir.path().join("cache.db");
        config.calendar.db_path = dir.path().join("calendar.db");

        let services = Services::build(&config).unwrap();
        services.open().await.unwrap();
        assert!(services.cache.is_open());
        services.close().await;
        assert!(!services.cache.is_open());
        assert!(dir.path().join("calendar.db").exists());
    }
}
