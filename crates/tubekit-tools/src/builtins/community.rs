//! Community tab posts
//!
//! The Data API has no endpoint for creating community posts, so this tool
//! validates and echoes the prepared post with manual publishing steps.

use crate::args::{output, parse, require_text};
use crate::error::{Error, Result};
use crate::registry::{Tool, ToolCategory, ToolDefinition, ToolResult};
use serde::Deserialize;
use serde_json::json;
use std::time::Instant;

const MIN_POLL_OPTIONS: usize = 2;
const MAX_POLL_OPTIONS: usize = 5;

/// Prepare a community post for manual publishing
pub struct CommunityPostTool {
    definition: ToolDefinition,
}

impl CommunityPostTool {
    /// Create the tool
    #[must_use]
    pub fn new() -> Self {
        let definition = ToolDefinition::new(
            "create_community_post",
            "Create a community tab post (Note: YouTube API limitation - provides guidance for manual creation via YouTube Studio).",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "text": {"type": "string", "description": "Post text content"},
                "image_path": {"type": "string", "description": "Path to image file (optional)"},
                "poll_options": {"type": "array", "items": {"type": "string"}, "description": "Poll options (2-5 choices, optional)"}
            },
            "required": ["text"]
        }))
        .with_category(ToolCategory::Community);

        Self { definition }
    }
}

impl Default for CommunityPostTool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct PostInput {
    text: String,
    image_path: Option<String>,
    poll_options: Option<Vec<String>>,
}

#[async_trait::async_trait]
impl Tool for CommunityPostTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: PostInput = parse("create_community_post", input)?;
        require_text("text", &input.text)?;
        if let Some(options) = &input.poll_options {
            if !(MIN_POLL_OPTIONS..=MAX_POLL_OPTIONS).contains(&options.len()) {
                return Err(Error::InvalidInput(format!(
                    "poll_options must have between {MIN_POLL_OPTIONS} and {MAX_POLL_OPTIONS} entries, got {}",
                    options.len()
                )));
            }
        }

        output(
            &json!({
                "success": false,
                "error": "YouTube Data API v3 does not support creating Community Tab posts directly.",
                "message": "Community posts must be created manually via YouTube Studio.",
                "guidance": {
                    "steps": [
                        "1. Go to https://studio.youtube.com",
                        "2. Click \"Create\" button at the top",
                        "3. Select \"Create post\"",
                        "4. Enter your content and publish",
                    ],
                    "preparedContent": {
                        "text": input.text,
                        "hasImage": input.image_path.is_some(),
                        "imagePath": input.image_path,
                        "pollOptions": input.poll_options,
                    },
                },
            }),
            start,
        )
    }
}
