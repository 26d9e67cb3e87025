//! Content research tools: trends, competitors and public search

use crate::args::{check_range, output, parse, require_text};
use crate::error::{Error, Result};
use crate::registry::{Tool, ToolCategory, ToolDefinition, ToolResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tubekit_youtube::helpers::{extract_channel_id, extract_video_id, format_count, format_duration};
use tubekit_youtube::service::{SearchParams, TrendingParams};
use tubekit_youtube::types::{SearchOrder, Video};
use tubekit_youtube::YouTubeService;

const TRENDING_SAMPLE: u32 = 25;
const COMPETITOR_SAMPLE: u32 = 20;
const TAGS_PER_VIDEO: usize = 5;
const MAX_TOPICS: usize = 15;
const MAX_COMMON_TAGS: usize = 20;

/// Counts keyed by string, remembering first-seen order so that sorting by
/// count keeps ties stable.
struct Tally<V> {
    index: HashMap<String, usize>,
    entries: Vec<(String, V)>,
}

impl<V: Default> Tally<V> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn entry(&mut self, key: String) -> &mut V {
        let i = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                let i = self.entries.len();
                self.index.insert(key.clone(), i);
                self.entries.push((key, V::default()));
                i
            }
        };
        &mut self.entries[i].1
    }
}

// ============================================================================
// Trending topics
// ============================================================================

#[derive(Debug, Default)]
struct TopicStats {
    count: usize,
    total_views: u64,
    videos: Vec<String>,
}

/// A tag shared by several trending videos
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TrendingTopic {
    pub(crate) topic: String,
    pub(crate) video_count: usize,
    pub(crate) estimated_total_views: String,
    pub(crate) sample_videos: Vec<String>,
}

/// Group videos by their first five tags, most common first.
pub(crate) fn group_topics(videos: &[Video]) -> Vec<TrendingTopic> {
    let mut topics: Tally<TopicStats> = Tally::new();
    for video in videos {
        let views = video.stats.map(|s| s.view_count).unwrap_or(0);
        for tag in video.tags.iter().take(TAGS_PER_VIDEO) {
            let topic = topics.entry(tag.trim().to_lowercase());
            topic.count += 1;
            topic.total_views = topic.total_views.saturating_add(views);
            if topic.videos.len() < 3 {
                topic.videos.push(video.title.clone());
            }
        }
    }

    let mut entries = topics.entries;
    entries.sort_by(|a, b| b.1.count.cmp(&a.1.count));
    entries
        .into_iter()
        .take(MAX_TOPICS)
        .map(|(topic, stats)| TrendingTopic {
            topic,
            video_count: stats.count,
            estimated_total_views: format_count(stats.total_views),
            sample_videos: stats.videos,
        })
        .collect()
}

/// Topics trending in a region, derived from the most-popular chart
pub struct TrendingTopicsTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl TrendingTopicsTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition = ToolDefinition::new(
            "search_trending_topics",
            "Discover trending topics on YouTube by analyzing popular videos in a region/category.",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "category": {"type": "string", "description": "YouTube video category ID (e.g., \"10\" for Music, \"20\" for Gaming)"},
                "region": {"type": "string", "description": "Region code (default: US). Examples: TH, JP, KR"},
                "language": {"type": "string", "description": "Language filter (optional)"}
            }
        }))
        .with_category(ToolCategory::Research);

        Self {
            definition,
            youtube,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TrendingInput {
    category: Option<String>,
    #[serde(default = "default_region")]
    region: String,
    language: Option<String>,
}

fn default_region() -> String {
    "US".to_string()
}

#[async_trait::async_trait]
impl Tool for TrendingTopicsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: TrendingInput = parse("search_trending_topics", input)?;

        let trending = self
            .youtube
            .trending_videos(&TrendingParams {
                category_id: input.category,
                region_code: Some(input.region.clone()),
                max_results: TRENDING_SAMPLE,
            })
            .await?;

        let videos: Vec<serde_json::Value> = trending
            .iter()
            .take(10)
            .map(|v| {
                json!({
                    "title": v.title,
                    "channelTitle": v.channel_title,
                    "views": format_count(v.stats.map(|s| s.view_count).unwrap_or(0)),
                    "publishedAt": v.published_at,
                })
            })
            .collect();

        output(
            &json!({
                "region": input.region,
                "language": input.language,
                "topics": group_topics(&trending),
                "trendingVideos": videos,
            }),
            start,
        )
    }
}

// ============================================================================
// Competitor analysis
// ============================================================================

/// Describe the average gap between uploads.
pub(crate) fn upload_frequency(published: &[String]) -> String {
    let mut dates: Vec<DateTime<Utc>> = published
        .iter()
        .filter_map(|d| DateTime::parse_from_rfc3339(d).ok())
        .map(|d| d.with_timezone(&Utc))
        .collect();
    if dates.len() < 2 {
        return "Unknown".to_string();
    }
    dates.sort_by(|a, b| b.cmp(a));

    let gaps: Vec<f64> = dates
        .windows(2)
        .map(|pair| (pair[0] - pair[1]).num_milliseconds() as f64 / 86_400_000.0)
        .collect();
    let avg_days = gaps.iter().sum::<f64>() / gaps.len() as f64;

    match avg_days {
        d if d <= 1.0 => "Daily".to_string(),
        d if d <= 3.0 => "Every 2-3 days".to_string(),
        d if d <= 7.0 => "Weekly".to_string(),
        d if d <= 14.0 => "Bi-weekly".to_string(),
        d if d <= 30.0 => "Monthly".to_string(),
        d => format!("Every ~{} days", d.round()),
    }
}

/// A tag and how many sampled videos use it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct TagCount {
    pub(crate) tag: String,
    pub(crate) count: usize,
}

pub(crate) fn common_tags(videos: &[Video]) -> Vec<TagCount> {
    let mut tally: Tally<usize> = Tally::new();
    for tag in videos.iter().flat_map(|v| &v.tags) {
        *tally.entry(tag.trim().to_lowercase()) += 1;
    }
    let mut entries = tally.entries;
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
        .into_iter()
        .take(MAX_COMMON_TAGS)
        .map(|(tag, count)| TagCount { tag, count })
        .collect()
}

/// Stats, recent videos, cadence and tags of another channel
pub struct AnalyzeCompetitorTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl AnalyzeCompetitorTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition = ToolDefinition::new(
            "analyze_competitor",
            "Analyze a competitor YouTube channel: stats, top videos, upload frequency, common tags.",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "channel_id": {"type": "string", "description": "YouTube channel ID or channel URL"}
            },
            "required": ["channel_id"]
        }))
        .with_category(ToolCategory::Research);

        Self {
            definition,
            youtube,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompetitorInput {
    channel_id: String,
}

#[async_trait::async_trait]
impl Tool for AnalyzeCompetitorTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: CompetitorInput = parse("analyze_competitor", input)?;
        require_text("channel_id", &input.channel_id)?;

        let channel_id = extract_channel_id(&input.channel_id);
        let stats = self.youtube.channel_stats(Some(&channel_id)).await?;
        let videos = self
            .youtube
            .channel_videos(&channel_id, COMPETITOR_SAMPLE)
            .await?;

        let published: Vec<String> = videos
            .iter()
            .filter_map(|v| v.published_at.clone())
            .collect();

        output(
            &json!({
                "channelStats": stats,
                "topVideos": videos.iter().take(10).collect::<Vec<_>>(),
                "uploadFrequency": upload_frequency(&published),
                "commonTags": common_tags(&videos),
            }),
            start,
        )
    }
}

// ============================================================================
// Search and details
// ============================================================================

/// Public video search
pub struct SearchVideosTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl SearchVideosTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition = ToolDefinition::new(
            "search_videos",
            "Search YouTube videos by query with sorting options. Costs 100 API quota units.",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "Search query"},
                "max_results": {"type": "number", "description": "Maximum results (1-50, default: 10)"},
                "order": {
                    "type": "string",
                    "enum": ["relevance", "date", "viewCount", "rating"],
                    "description": "Sort order (default: relevance)"
                }
            },
            "required": ["query"]
        }))
        .with_category(ToolCategory::Research);

        Self {
            definition,
            youtube,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchInput {
    query: String,
    #[serde(default = "default_max_results")]
    max_results: u32,
    #[serde(default)]
    order: SearchOrder,
}

fn default_max_results() -> u32 {
    10
}

#[async_trait::async_trait]
impl Tool for SearchVideosTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: SearchInput = parse("search_videos", input)?;
        require_text("query", &input.query)?;

        let page = self
            .youtube
            .search_videos(&SearchParams {
                max_results: check_range("max_results", input.max_results, 1, 50)?,
                query: input.query,
                order: input.order,
            })
            .await?;
        output(&page, start)
    }
}

/// Full metadata and statistics for one video
pub struct VideoDetailsTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl VideoDetailsTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition = ToolDefinition::new(
            "get_video_details",
            "Get full details of a YouTube video: metadata, stats, tags, description.",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "video_id": {"type": "string", "description": "YouTube video ID or URL"}
            },
            "required": ["video_id"]
        }))
        .with_category(ToolCategory::Research);

        Self {
            definition,
            youtube,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DetailsInput {
    video_id: String,
}

#[async_trait::async_trait]
impl Tool for VideoDetailsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: DetailsInput = parse("get_video_details", input)?;
        require_text("video_id", &input.video_id)?;

        let video = self
            .youtube
            .video_details(&extract_video_id(&input.video_id))
            .await?;
        let mut value = serde_json::to_value(&video)
            .map_err(|e| Error::Execution(format!("failed to encode video: {e}")))?;
        if let (Some(duration), Some(map)) = (video.duration.as_deref(), value.as_object_mut()) {
            map.insert(
                "durationFormatted".to_string(),
                json!(format_duration(duration)),
            );
        }
        output(&value, start)
    }
}
