//! Comment moderation and analysis tools

use crate::args::{check_range, output, parse, require_text, truncate_chars};
use crate::error::Result;
use crate::registry::{RiskLevel, Tool, ToolCategory, ToolDefinition, ToolResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use std::time::Instant;
use tubekit_youtube::helpers::extract_video_id;
use tubekit_youtube::service::CommentsParams;
use tubekit_youtube::types::{CommentOrder, CommentThread};
use tubekit_youtube::YouTubeService;

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

const POSITIVE: &[&str] = &[
    "great", "awesome", "love", "amazing", "best", "thank", "helpful", "excellent", "fantastic",
    "good",
];
const NEGATIVE: &[&str] = &[
    "bad",
    "terrible",
    "worst",
    "hate",
    "boring",
    "waste",
    "awful",
    "poor",
    "disappointed",
];
const SUMMARY_SAMPLE: u32 = 100;

/// Keyword-based sentiment counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Sentiment {
    pub(crate) positive: usize,
    pub(crate) negative: usize,
    /// Comments matching neither list; a comment matching both counts
    /// against both, so this can go negative.
    pub(crate) neutral: i64,
    pub(crate) positive_percentage: u32,
}

/// A frequent word
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Theme {
    pub(crate) word: String,
    pub(crate) count: usize,
}

/// A highly liked comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct TopComment {
    pub(crate) author: String,
    pub(crate) text: String,
    pub(crate) likes: u64,
    pub(crate) replies: u64,
}

/// Aggregate view of a video's comment threads
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommentSummary {
    pub(crate) total_comments: usize,
    pub(crate) total_replies: u64,
    pub(crate) total_likes: u64,
    pub(crate) sentiment: Sentiment,
    pub(crate) common_themes: Vec<Theme>,
    pub(crate) top_comments: Vec<TopComment>,
}

pub(crate) fn summarize(threads: &[CommentThread]) -> CommentSummary {
    let total_comments = threads.len();
    let total_replies = threads.iter().map(|t| t.total_reply_count).sum();
    let total_likes = threads.iter().map(|t| t.top_level_comment.like_count).sum();

    let mut by_likes: Vec<&CommentThread> = threads.iter().collect();
    by_likes.sort_by(|a, b| {
        b.top_level_comment
            .like_count
            .cmp(&a.top_level_comment.like_count)
    });
    let top_comments = by_likes
        .into_iter()
        .take(5)
        .map(|t| TopComment {
            author: t.top_level_comment.author_display_name.clone(),
            text: truncate_chars(&t.top_level_comment.text_display, 200),
            likes: t.top_level_comment.like_count,
            replies: t.total_reply_count,
        })
        .collect();

    let all_text = threads
        .iter()
        .map(|t| t.top_level_comment.text_display.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let stripped = HTML_TAG.replace_all(&all_text, "");

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for word in stripped.split_whitespace().filter(|w| w.chars().count() > 4) {
        match index.get(word) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(word, counts.len());
                counts.push((word, 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    let common_themes = counts
        .into_iter()
        .take(15)
        .map(|(word, count)| Theme {
            word: word.to_string(),
            count,
        })
        .collect();

    let mut positive = 0;
    let mut negative = 0;
    for thread in threads {
        let text = thread.top_level_comment.text_display.to_lowercase();
        if POSITIVE.iter().any(|kw| text.contains(kw)) {
            positive += 1;
        }
        if NEGATIVE.iter().any(|kw| text.contains(kw)) {
            negative += 1;
        }
    }
    let positive_percentage = if total_comments > 0 {
        (positive as f64 / total_comments as f64 * 100.0).round() as u32
    } else {
        0
    };

    CommentSummary {
        total_comments,
        total_replies,
        total_likes,
        sentiment: Sentiment {
            positive,
            negative,
            neutral: total_comments as i64 - positive as i64 - negative as i64,
            positive_percentage,
        },
        common_themes,
        top_comments,
    }
}

/// List comment threads on a video
pub struct GetCommentsTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl GetCommentsTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition = ToolDefinition::new("get_comments", "Get comments on a video with replies.")
            .with_parameters(json!({
                "type": "object",
                "properties": {
                    "video_id": {"type": "string", "description": "YouTube video ID or URL"},
                    "max_results": {"type": "number", "description": "Maximum results (1-100, default: 20)"},
                    "order": {"type": "string", "enum": ["time", "relevance"], "description": "Sort order (default: relevance)"}
                },
                "required": ["video_id"]
            }))
            .with_category(ToolCategory::Comment);

        Self {
            definition,
            youtube,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GetCommentsInput {
    video_id: String,
    #[serde(default = "default_max_results")]
    max_results: u32,
    #[serde(default = "default_order")]
    order: CommentOrder,
}

fn default_max_results() -> u32 {
    20
}

fn default_order() -> CommentOrder {
    CommentOrder::Relevance
}

#[async_trait::async_trait]
impl Tool for GetCommentsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: GetCommentsInput = parse("get_comments", input)?;
        require_text("video_id", &input.video_id)?;

        let threads = self
            .youtube
            .comments(&CommentsParams {
                video_id: extract_video_id(&input.video_id),
                max_results: check_range("max_results", input.max_results, 1, 100)?,
                order: input.order,
            })
            .await?;
        output(&threads, start)
    }
}

/// Reply to a comment
pub struct ReplyCommentTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl ReplyCommentTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition = ToolDefinition::new("reply_comment", "Reply to a comment on a video.")
            .with_parameters(json!({
                "type": "object",
                "properties": {
                    "comment_id": {"type": "string", "description": "Comment ID to reply to"},
                    "text": {"type": "string", "description": "Reply text"}
                },
                "required": ["comment_id", "text"]
            }))
            .with_risk_level(RiskLevel::Medium)
            .with_category(ToolCategory::Comment);

        Self {
            definition,
            youtube,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReplyInput {
    comment_id: String,
    text: String,
}

#[async_trait::async_trait]
impl Tool for ReplyCommentTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: ReplyInput = parse("reply_comment", input)?;
        require_text("comment_id", &input.comment_id)?;
        require_text("text", &input.text)?;

        let reply_id = self
            .youtube
            .reply_comment(&input.comment_id, &input.text)
            .await?;
        output(&json!({"success": true, "replyId": reply_id}), start)
    }
}

/// Delete a comment
pub struct DeleteCommentTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl DeleteCommentTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition = ToolDefinition::new("delete_comment", "Delete a comment.")
            .with_parameters(json!({
                "type": "object",
                "properties": {
                    "comment_id": {"type": "string", "description": "Comment ID to delete"}
                },
                "required": ["comment_id"]
            }))
            .with_risk_level(RiskLevel::High)
            .with_category(ToolCategory::Comment);

        Self {
            definition,
            youtube,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeleteInput {
    comment_id: String,
}

#[async_trait::async_trait]
impl Tool for DeleteCommentTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: DeleteInput = parse("delete_comment", input)?;
        require_text("comment_id", &input.comment_id)?;

        self.youtube.delete_comment(&input.comment_id).await?;
        output(&json!({"success": true, "commentId": input.comment_id}), start)
    }
}

/// Sentiment, themes and top comments of a video
pub struct CommentSummaryTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl CommentSummaryTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition = ToolDefinition::new(
            "get_comment_summary",
            "Get comment analysis: sentiment breakdown, common themes, and top comments for a video.",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "video_id": {"type": "string", "description": "YouTube video ID or URL"}
            },
            "required": ["video_id"]
        }))
        .with_category(ToolCategory::Comment);

        Self {
            definition,
            youtube,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SummaryInput {
    video_id: String,
}

#[async_trait::async_trait]
impl Tool for CommentSummaryTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: SummaryInput = parse("get_comment_summary", input)?;
        require_text("video_id", &input.video_id)?;

        let threads = self
            .youtube
            .comments(&CommentsParams {
                video_id: extract_video_id(&input.video_id),
                max_results: SUMMARY_SAMPLE,
                order: CommentOrder::Relevance,
            })
            .await?;
        output(&summarize(&threads), start)
    }
}
