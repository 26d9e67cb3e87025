//! Channel and video analytics tools

use crate::args::{check_range, output, parse, require_text};
use crate::error::{Error, Result};
use crate::registry::{Tool, ToolCategory, ToolDefinition, ToolResult};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tubekit_youtube::helpers::extract_video_id;
use tubekit_youtube::types::{DateRange, TopMetric};
use tubekit_youtube::YouTubeService;

fn date_range_schema() -> serde_json::Value {
    json!({
        "type": "string",
        "enum": ["7d", "30d", "90d", "365d"],
        "description": "Date range (default: 30d)"
    })
}

#[derive(Debug, Deserialize)]
struct RangeInput {
    #[serde(default)]
    date_range: DateRange,
}

/// Subscriber, view and video totals plus today's quota usage
pub struct ChannelStatsTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl ChannelStatsTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition = ToolDefinition::new(
            "get_channel_stats",
            "Get channel statistics: subscribers, total views, total videos, and API quota status.",
        )
        .with_category(ToolCategory::Analytics);

        Self {
            definition,
            youtube,
        }
    }
}

#[async_trait::async_trait]
impl Tool for ChannelStatsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, _input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let stats = self.youtube.channel_stats(None).await?;

        let mut value = serde_json::to_value(&stats)
            .map_err(|e| Error::Execution(format!("failed to encode channel stats: {e}")))?;
        if let Some(map) = value.as_object_mut() {
            map.insert("quotaStatus".to_string(), json!(self.youtube.quota_status()));
        }
        output(&value, start)
    }
}

/// Views, engagement, watch time and impressions of one video
pub struct VideoPerformanceTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl VideoPerformanceTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition = ToolDefinition::new(
            "get_video_performance",
            "Get detailed performance metrics for a specific video (views, likes, watch time, CTR, impressions).",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "video_id": {"type": "string", "description": "YouTube video ID"}
            },
            "required": ["video_id"]
        }))
        .with_category(ToolCategory::Analytics);

        Self {
            definition,
            youtube,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VideoIdInput {
    video_id: String,
}

#[async_trait::async_trait]
impl Tool for VideoPerformanceTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: VideoIdInput = parse("get_video_performance", input)?;
        require_text("video_id", &input.video_id)?;

        let performance = self
            .youtube
            .video_performance(&extract_video_id(&input.video_id))
            .await?;
        output(&performance, start)
    }
}

/// Demographics, geography, traffic sources and devices
pub struct AudienceInsightsTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl AudienceInsightsTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition = ToolDefinition::new(
            "get_audience_insights",
            "Get audience demographics, traffic sources, countries, and device breakdown.",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "date_range": date_range_schema()
            }
        }))
        .with_category(ToolCategory::Analytics);

        Self {
            definition,
            youtube,
        }
    }
}

#[async_trait::async_trait]
impl Tool for AudienceInsightsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: RangeInput = parse("get_audience_insights", input)?;
        let insights = self.youtube.audience_insights(input.date_range).await?;
        output(&insights, start)
    }
}

/// Channel videos ranked by a metric
pub struct TopVideosTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl TopVideosTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition = ToolDefinition::new(
            "get_top_videos",
            "Get top performing videos ranked by a specific metric.",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "metric": {
                    "type": "string",
                    "enum": ["views", "watch_time", "likes", "comments"],
                    "description": "Metric to rank by"
                },
                "date_range": date_range_schema(),
                "limit": {"type": "number", "description": "Number of videos to return (default: 10)"}
            },
            "required": ["metric"]
        }))
        .with_category(ToolCategory::Analytics);

        Self {
            definition,
            youtube,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TopVideosInput {
    metric: TopMetric,
    #[serde(default)]
    date_range: DateRange,
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_limit() -> u32 {
    10
}

#[async_trait::async_trait]
impl Tool for TopVideosTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: TopVideosInput = parse("get_top_videos", input)?;
        let limit = check_range("limit", input.limit, 1, 50)?;

        let videos = self
            .youtube
            .top_videos(input.metric, input.date_range, limit)
            .await?;
        output(
            &json!({
                "metric": input.metric.as_str(),
                "dateRange": input.date_range.as_str(),
                "videos": videos,
            }),
            start,
        )
    }
}

/// Estimated earnings for a period
pub struct RevenueReportTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl RevenueReportTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition = ToolDefinition::new(
            "get_revenue_report",
            "Get revenue report with estimated earnings, RPM, CPM, and monetized playbacks.",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "date_range": date_range_schema()
            }
        }))
        .with_category(ToolCategory::Analytics);

        Self {
            definition,
            youtube,
        }
    }
}

#[async_trait::async_trait]
impl Tool for RevenueReportTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: RangeInput = parse("get_revenue_report", input)?;
        let report = self.youtube.revenue_report(input.date_range).await?;
        output(&report, start)
    }
}
