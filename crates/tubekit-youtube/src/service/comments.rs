//! Comment threads and moderation

use super::YouTubeService;
use crate::cost;
use crate::error::Result;
use crate::transport::{ApiRequest, DATA_API};
use crate::types::raw::{ListResponse, RawThread, Resource};
use crate::types::{CommentOrder, CommentThread};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tubekit_core::cache_key;

/// Comment thread listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentsParams {
    /// Video id
    pub video_id: String,
    /// Page size (1-100)
    pub max_results: u32,
    /// Ordering
    pub order: CommentOrder,
}

impl YouTubeService {
    /// Top-level comment threads of a video with their loaded replies.
    pub async fn comments(&self, params: &CommentsParams) -> Result<Vec<CommentThread>> {
        let key = cache_key("comments", params)?;
        self.read_through(&key, Some(cost::COMMENTS_TTL), || async {
            let response: ListResponse<RawThread> = self
                .call_as(
                    cost::LIST,
                    "commentThreads.list",
                    ApiRequest::get(format!("{DATA_API}/commentThreads"))
                        .param("part", "snippet,replies")
                        .param("videoId", &params.video_id)
                        .param("maxResults", params.max_results)
                        .param("order", params.order.as_str()),
                )
                .await?;
            Ok(response
                .items
                .into_iter()
                .map(CommentThread::from)
                .collect())
        })
        .await
    }

    /// Reply to a comment. Returns the new comment id.
    pub async fn reply_comment(&self, comment_id: &str, text: &str) -> Result<String> {
        let body = json!({ "snippet": { "parentId": comment_id, "textOriginal": text } });
        let reply: Resource = self
            .call_as(
                cost::WRITE,
                "comments.insert",
                ApiRequest::post(format!("{DATA_API}/comments"), body).param("part", "snippet"),
            )
            .await?;

        self.invalidate("comments:%").await;
        Ok(reply.id)
    }

    /// Delete a comment.
    pub async fn delete_comment(&self, comment_id: &str) -> Result<()> {
        self.call(
            cost::WRITE,
            "comments.delete",
            ApiRequest::delete(format!("{DATA_API}/comments")).param("id", comment_id),
        )
        .await?;

        self.invalidate("comments:%").await;
        Ok(())
    }
}
