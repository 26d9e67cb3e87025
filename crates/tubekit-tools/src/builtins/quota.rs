//! Quota reporting

use crate::args::output;
use crate::error::Result;
use crate::registry::{Tool, ToolCategory, ToolDefinition, ToolResult};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tubekit_youtube::YouTubeService;

/// Today's API quota usage
pub struct QuotaStatusTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl QuotaStatusTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let limit = youtube.governor().daily_budget();
        let definition = ToolDefinition::new(
            "get_quota_status",
            format!("Get current YouTube API quota usage status (daily limit: {limit} units)."),
        )
        .with_category(ToolCategory::Utility);

        Self {
            definition,
            youtube,
        }
    }
}

#[async_trait::async_trait]
impl Tool for QuotaStatusTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, _input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let status = self.youtube.quota_status();
        output(
            &json!({
                "used": status.used,
                "remaining": status.remaining,
                "limit": status.limit,
                "resetsAt": "00:00 UTC",
            }),
            start,
        )
    }
}
