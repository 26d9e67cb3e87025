//! Own-channel video management tools

use crate::args::{check_max_chars, check_range, output, parse, require_text};
use crate::error::Result;
use crate::registry::{RiskLevel, Tool, ToolCategory, ToolDefinition, ToolResult};
use serde::Deserialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tubekit_youtube::helpers::extract_video_id;
use tubekit_youtube::service::{ListVideosParams, UpdateVideoParams, UploadVideoParams};
use tubekit_youtube::types::PrivacyStatus;
use tubekit_youtube::YouTubeService;

const MAX_TITLE_CHARS: usize = 100;
const DEFAULT_CATEGORY: &str = "22";

fn privacy_schema(description: &str) -> serde_json::Value {
    json!({
        "type": "string",
        "enum": ["public", "private", "unlisted"],
        "description": description
    })
}

// ============================================================================
// upload_video
// ============================================================================

/// Upload a local video file
pub struct UploadVideoTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl UploadVideoTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition = ToolDefinition::new(
            "upload_video",
            "Upload a video to YouTube channel. Costs 1600 API quota units.",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "file_path": {"type": "string", "description": "Absolute path to the video file"},
                "title": {"type": "string", "description": "Video title (max 100 characters)"},
                "description": {"type": "string", "description": "Video description"},
                "tags": {"type": "array", "items": {"type": "string"}, "description": "Video tags"},
                "category_id": {"type": "string", "description": "YouTube category ID (default: 22 = People & Blogs)"},
                "privacy_status": privacy_schema("Video privacy status (default: private)"),
                "scheduled_time": {"type": "string", "description": "ISO 8601 datetime for scheduled publishing (optional)"}
            },
            "required": ["file_path", "title"]
        }))
        .with_risk_level(RiskLevel::High)
        .with_category(ToolCategory::Video);

        Self {
            definition,
            youtube,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadInput {
    file_path: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    category_id: Option<String>,
    #[serde(default)]
    privacy_status: PrivacyStatus,
    #[serde(default)]
    scheduled_time: Option<String>,
}

#[async_trait::async_trait]
impl Tool for UploadVideoTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: UploadInput = parse("upload_video", input)?;
        require_text("file_path", &input.file_path)?;
        require_text("title", &input.title)?;
        check_max_chars("title", &input.title, MAX_TITLE_CHARS)?;

        let uploaded = self
            .youtube
            .upload_video(&UploadVideoParams {
                file_path: PathBuf::from(input.file_path),
                title: input.title,
                description: input.description,
                tags: input.tags,
                category_id: input
                    .category_id
                    .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
                privacy_status: input.privacy_status,
                scheduled_time: input.scheduled_time,
            })
            .await?;
        output(&uploaded, start)
    }
}

// ============================================================================
// update_video
// ============================================================================

/// Change metadata of an existing video
pub struct UpdateVideoTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl UpdateVideoTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition = ToolDefinition::new(
            "update_video",
            "Update an existing video metadata (title, description, tags, privacy).",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "video_id": {"type": "string", "description": "YouTube video ID or URL"},
                "title": {"type": "string", "description": "New video title"},
                "description": {"type": "string", "description": "New video description"},
                "tags": {"type": "array", "items": {"type": "string"}, "description": "New video tags"},
                "category_id": {"type": "string", "description": "New category ID"},
                "privacy_status": privacy_schema("New privacy status")
            },
            "required": ["video_id"]
        }))
        .with_risk_level(RiskLevel::Medium)
        .with_category(ToolCategory::Video);

        Self {
            definition,
            youtube,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateInput {
    video_id: String,
    title: Option<String>,
    description: Option<String>,
    tags: Option<Vec<String>>,
    category_id: Option<String>,
    privacy_status: Option<PrivacyStatus>,
}

#[async_trait::async_trait]
impl Tool for UpdateVideoTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: UpdateInput = parse("update_video", input)?;
        require_text("video_id", &input.video_id)?;
        if let Some(title) = &input.title {
            require_text("title", title)?;
            check_max_chars("title", title, MAX_TITLE_CHARS)?;
        }

        let video = self
            .youtube
            .update_video(&UpdateVideoParams {
                video_id: extract_video_id(&input.video_id),
                title: input.title,
                description: input.description,
                tags: input.tags,
                category_id: input.category_id,
                privacy_status: input.privacy_status,
            })
            .await?;
        output(&video, start)
    }
}

// ============================================================================
// delete_video
// ============================================================================

/// Permanently delete a video
pub struct DeleteVideoTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl DeleteVideoTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition = ToolDefinition::new("delete_video", "Delete a video from YouTube channel.")
            .with_parameters(json!({
                "type": "object",
                "properties": {
                    "video_id": {"type": "string", "description": "YouTube video ID or URL to delete"}
                },
                "required": ["video_id"]
            }))
            .with_risk_level(RiskLevel::High)
            .with_category(ToolCategory::Video);

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
impl Tool for DeleteVideoTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: VideoIdInput = parse("delete_video", input)?;
        require_text("video_id", &input.video_id)?;

        let video_id = extract_video_id(&input.video_id);
        self.youtube.delete_video(&video_id).await?;
        output(&json!({"success": true, "videoId": video_id}), start)
    }
}

// ============================================================================
// list_videos
// ============================================================================

/// Page through the channel's own videos
pub struct ListVideosTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl ListVideosTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition = ToolDefinition::new(
            "list_videos",
            "List videos from your YouTube channel with stats.",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "max_results": {"type": "number", "description": "Maximum results (1-50, default: 10)"},
                "page_token": {"type": "string", "description": "Page token for pagination"},
                "status_filter": privacy_schema("Filter by privacy status")
            }
        }))
        .with_category(ToolCategory::Video);

        Self {
            definition,
            youtube,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListInput {
    #[serde(default = "default_page_size")]
    max_results: u32,
    page_token: Option<String>,
    status_filter: Option<PrivacyStatus>,
}

fn default_page_size() -> u32 {
    10
}

#[async_trait::async_trait]
impl Tool for ListVideosTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: ListInput = parse("list_videos", input)?;

        let page = self
            .youtube
            .list_videos(&ListVideosParams {
                max_results: check_range("max_results", input.max_results, 1, 50)?,
                page_token: input.page_token,
                status_filter: input.status_filter,
            })
            .await?;
        output(&page, start)
    }
}

// ============================================================================
// set_thumbnail
// ============================================================================

/// Replace a video's thumbnail image
pub struct SetThumbnailTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl SetThumbnailTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition =
            ToolDefinition::new("set_thumbnail", "Set a custom thumbnail for a video.")
                .with_parameters(json!({
                    "type": "object",
                    "properties": {
                        "video_id": {"type": "string", "description": "YouTube video ID or URL"},
                        "image_path": {"type": "string", "description": "Absolute path to thumbnail image (JPG/PNG, max 2MB)"}
                    },
                    "required": ["video_id", "image_path"]
                }))
                .with_risk_level(RiskLevel::Medium)
                .with_category(ToolCategory::Video);

        Self {
            definition,
            youtube,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ThumbnailInput {
    video_id: String,
    image_path: String,
}

#[async_trait::async_trait]
impl Tool for SetThumbnailTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: ThumbnailInput = parse("set_thumbnail", input)?;
        require_text("video_id", &input.video_id)?;
        require_text("image_path", &input.image_path)?;

        let set = self
            .youtube
            .set_thumbnail(
                &extract_video_id(&input.video_id),
                Path::new(&input.image_path),
            )
            .await?;
        output(&set, start)
    }
}
