//! Playlist management tools

use crate::args::{output, parse, require_text};
use crate::error::Result;
use crate::registry::{RiskLevel, Tool, ToolCategory, ToolDefinition, ToolResult};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tubekit_youtube::helpers::extract_video_id;
use tubekit_youtube::service::CreatePlaylistParams;
use tubekit_youtube::types::PrivacyStatus;
use tubekit_youtube::YouTubeService;

/// Create a playlist
pub struct CreatePlaylistTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl CreatePlaylistTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition = ToolDefinition::new("create_playlist", "Create a new YouTube playlist.")
            .with_parameters(json!({
                "type": "object",
                "properties": {
                    "title": {"type": "string", "description": "Playlist title"},
                    "description": {"type": "string", "description": "Playlist description"},
                    "privacy_status": {
                        "type": "string",
                        "enum": ["public", "private", "unlisted"],
                        "description": "Privacy status (default: private)"
                    }
                },
                "required": ["title"]
            }))
            .with_risk_level(RiskLevel::Medium)
            .with_category(ToolCategory::Playlist);

        Self {
            definition,
            youtube,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateInput {
    title: String,
    description: Option<String>,
    #[serde(default)]
    privacy_status: PrivacyStatus,
}

#[async_trait::async_trait]
impl Tool for CreatePlaylistTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: CreateInput = parse("create_playlist", input)?;
        require_text("title", &input.title)?;

        let created = self
            .youtube
            .create_playlist(&CreatePlaylistParams {
                title: input.title,
                description: input.description,
                privacy_status: input.privacy_status,
            })
            .await?;
        output(&created, start)
    }
}

/// Add a video to a playlist
pub struct AddToPlaylistTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl AddToPlaylistTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition = ToolDefinition::new("add_to_playlist", "Add a video to a playlist.")
            .with_parameters(json!({
                "type": "object",
                "properties": {
                    "playlist_id": {"type": "string", "description": "Playlist ID"},
                    "video_id": {"type": "string", "description": "Video ID or URL to add"},
                    "position": {"type": "number", "description": "Position in playlist (0-based, optional)"}
                },
                "required": ["playlist_id", "video_id"]
            }))
            .with_risk_level(RiskLevel::Medium)
            .with_category(ToolCategory::Playlist);

        Self {
            definition,
            youtube,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AddInput {
    playlist_id: String,
    video_id: String,
    position: Option<u32>,
}

#[async_trait::async_trait]
impl Tool for AddToPlaylistTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: AddInput = parse("add_to_playlist", input)?;
        require_text("playlist_id", &input.playlist_id)?;
        require_text("video_id", &input.video_id)?;

        let item_id = self
            .youtube
            .add_to_playlist(
                &input.playlist_id,
                &extract_video_id(&input.video_id),
                input.position,
            )
            .await?;
        output(&json!({"success": true, "playlistItemId": item_id}), start)
    }
}

/// List the channel's playlists
pub struct ListPlaylistsTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl ListPlaylistsTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition = ToolDefinition::new(
            "list_playlists",
            "List all playlists on your channel with video counts.",
        )
        .with_category(ToolCategory::Playlist);

        Self {
            definition,
            youtube,
        }
    }
}

#[async_trait::async_trait]
impl Tool for ListPlaylistsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, _input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let playlists = self.youtube.list_playlists().await?;
        output(&playlists, start)
    }
}

/// Move a video within a playlist
pub struct ReorderPlaylistTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl ReorderPlaylistTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition = ToolDefinition::new(
            "reorder_playlist",
            "Move a video to a new position within a playlist.",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "playlist_id": {"type": "string", "description": "Playlist ID"},
                "video_id": {"type": "string", "description": "Video ID to move"},
                "new_position": {"type": "number", "description": "New position (0-based)"}
            },
            "required": ["playlist_id", "video_id", "new_position"]
        }))
        .with_risk_level(RiskLevel::Medium)
        .with_category(ToolCategory::Playlist);

        Self {
            definition,
            youtube,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReorderInput {
    playlist_id: String,
    video_id: String,
    new_position: u32,
}

#[async_trait::async_trait]
impl Tool for ReorderPlaylistTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: ReorderInput = parse("reorder_playlist", input)?;
        require_text("playlist_id", &input.playlist_id)?;
        require_text("video_id", &input.video_id)?;

        let video_id = extract_video_id(&input.video_id);
        self.youtube
            .reorder_playlist(&input.playlist_id, &video_id, input.new_position)
            .await?;
        output(
            &json!({
                "success": true,
                "playlistId": input.playlist_id,
                "videoId": video_id,
                "newPosition": input.new_position,
            }),
            start,
        )
    }
}
