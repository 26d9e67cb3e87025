//! Own-channel video management

use super::{content_type_for, require_file, YouTubeService};
use crate::cost;
use crate::error::{Error, Result};
use crate::transport::{ApiRequest, UploadRequest, DATA_API, UPLOAD_API};
use crate::types::raw::{ListResponse, Resource, SearchItem, ThumbnailSetResponse};
use crate::types::{PrivacyStatus, ThumbnailSet, UploadedVideo, Video, VideoPage};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;
use tubekit_core::cache_key;

/// Listing options for the channel's own videos
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListVideosParams {
    /// Page size (1-50)
    pub max_results: u32,
    /// Cursor from a previous page
    pub page_token: Option<String>,
    /// Keep only videos with this visibility
    pub status_filter: Option<PrivacyStatus>,
}

impl Default for ListVideosParams {
    fn default() -> Self {
        Self {
            max_results: 10,
            page_token: None,
            status_filter: None,
        }
    }
}

/// A new upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadVideoParams {
    /// Local video file
    pub file_path: PathBuf,
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Tags
    pub tags: Vec<String>,
    /// Category id
    pub category_id: String,
    /// Initial visibility
    pub privacy_status: PrivacyStatus,
    /// RFC 3339 publish time; only honoured for private uploads
    pub scheduled_time: Option<String>,
}

/// Metadata changes; absent fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateVideoParams {
    /// Video to change
    pub video_id: String,
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// Replacement tag list
    pub tags: Option<Vec<String>>,
    /// New category
    pub category_id: Option<String>,
    /// New visibility
    pub privacy_status: Option<PrivacyStatus>,
}

impl YouTubeService {
    /// Newest videos on the channel, with statistics.
    ///
    /// Costs one search plus one `videos.list` on a miss.
    pub async fn list_videos(&self, params: &ListVideosParams) -> Result<VideoPage> {
        let key = cache_key("list_videos", params)?;
        self.read_through(&key, None, || async {
            let mut search = ApiRequest::get(format!("{DATA_API}/search"))
                .param("part", "snippet")
                .param("type", "video")
                .param("order", "date")
                .param("maxResults", params.max_results)
                .param_opt("pageToken", params.page_token.as_deref());
            search = match self.channel_id() {
                Some(id) => search.param("channelId", id),
                None => search.param("forMine", "true"),
            };

            let found: ListResponse<SearchItem> = self
                .call_as(cost::SEARCH, "search.list (own videos)", search)
                .await?;
            let total_results = found.page_info.and_then(|p| p.total_results);
            let next_page_token = found.next_page_token;
            let ids: Vec<String> = found
                .items
                .into_iter()
                .filter_map(|item| item.id.video_id)
                .collect();

            if ids.is_empty() {
                return Ok(VideoPage {
                    videos: Vec::new(),
                    next_page_token,
                    total_results,
                });
            }

            let details: ListResponse<Resource> = self
                .call_as(
                    cost::LIST,
                    "videos.list",
                    ApiRequest::get(format!("{DATA_API}/videos"))
                        .param("part", "snippet,statistics,status,contentDetails")
                        .param("id", ids.join(",")),
                )
                .await?;

            let videos = details
                .items
                .into_iter()
                .map(|r| r.into_video(PrivacyStatus::Private))
                .filter(|v| params.status_filter.is_none_or(|s| v.privacy_status == s))
                .collect();

            Ok(VideoPage {
                videos,
                next_page_token,
                total_results,
            })
        })
        .await
    }

    /// Upload a video file.
    pub async fn upload_video(&self, params: &UploadVideoParams) -> Result<UploadedVideo> {
        require_file(&params.file_path).await?;

        let mut status = json!({ "privacyStatus": params.privacy_status.as_str() });
        if let (Some(at), PrivacyStatus::Private) = (&params.scheduled_time, params.privacy_status)
        {
            status["publishAt"] = json!(at);
        }
        let metadata = json!({
            "snippet": {
                "title": params.title,
                "description": params.description,
                "tags": params.tags,
                "categoryId": params.category_id,
            },
            "status": status,
        });

        let request = UploadRequest {
            url: format!("{UPLOAD_API}/videos"),
            query: vec![("part".to_string(), "snippet,status".to_string())],
            metadata: Some(metadata),
            content_type: content_type_for(&params.file_path, "video/*"),
            media_path: params.file_path.clone(),
        };
        let uploaded: Resource = self
            .upload(cost::UPLOAD, "videos.insert (upload)", request)
            .await?;

        self.invalidate("list_videos:%").await;
        info!(video_id = %uploaded.id, "Video uploaded");

        Ok(UploadedVideo {
            url: format!("https://www.youtube.com/watch?v={}", uploaded.id),
            status: uploaded
                .status
                .and_then(|s| s.upload_status)
                .unwrap_or_else(|| "unknown".to_string()),
            video_id: uploaded.id,
        })
    }

    /// Change title, description, tags, category or visibility.
    pub async fn update_video(&self, params: &UpdateVideoParams) -> Result<Video> {
        let current: ListResponse<Resource> = self
            .call_as(
                cost::LIST,
                "videos.list (current metadata)",
                ApiRequest::get(format!("{DATA_API}/videos"))
                    .param("part", "snippet,status")
                    .param("id", &params.video_id),
            )
            .await?;
        let current = current
            .items
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("video {}", params.video_id)))?
            .into_video(PrivacyStatus::Private);

        let body = json!({
            "id": params.video_id,
            "snippet": {
                "title": params.title.as_ref().unwrap_or(&current.title),
                "description": params.description.as_ref().unwrap_or(&current.description),
                "tags": params.tags.as_ref().unwrap_or(&current.tags),
                "categoryId": params.category_id.as_ref().unwrap_or(&current.category_id),
            },
            "status": {
                "privacyStatus": params.privacy_status.unwrap_or(current.privacy_status).as_str(),
            },
        });

        let updated: Resource = self
            .call_as(
                cost::WRITE,
                "videos.update",
                ApiRequest::put(format!("{DATA_API}/videos"), body).param("part", "snippet,status"),
            )
            .await?;

        self.invalidate("list_videos:%").await;
        self.invalidate(&format!("video_details:{}", params.video_id))
            .await;
        info!(video_id = %params.video_id, "Video updated");

        Ok(updated.into_video(PrivacyStatus::Private))
    }

    /// Permanently delete a video.
    pub async fn delete_video(&self, video_id: &str) -> Result<()> {
        self.call(
            cost::WRITE,
            "videos.delete",
            ApiRequest::delete(format!("{DATA_API}/videos")).param("id", video_id),
        )
        .await?;

        self.invalidate("list_videos:%").await;
        self.invalidate(&format!("video_details:{video_id}")).await;
        info!(video_id, "Video deleted");
        Ok(())
    }

    /// Replace a video's custom thumbnail.
    pub async fn set_thumbnail(&self, video_id: &str, image_path: &Path) -> Result<ThumbnailSet> {
        require_file(image_path).await?;

        let request = UploadRequest {
            url: format!("{UPLOAD_API}/thumbnails/set"),
            query: vec![("videoId".to_string(), video_id.to_string())],
            metadata: None,
            content_type: content_type_for(image_path, "application/octet-stream"),
            media_path: image_path.to_path_buf(),
        };
        let response: ThumbnailSetResponse =
            self.upload(cost::WRITE, "thumbnails.set", request).await?;

        self.invalidate(&format!("video_details:{video_id}")).await;

        Ok(ThumbnailSet {
            video_id: video_id.to_string(),
            thumbnail_url: response
                .items
                .first()
                .and_then(|t| t.best())
                .unwrap_or_default(),
        })
    }
}
