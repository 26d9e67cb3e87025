//! Playlist management

use super::YouTubeService;
use crate::cost;
use crate::error::{Error, Result};
use crate::transport::{ApiRequest, DATA_API};
use crate::types::raw::{ListResponse, PlaylistItem, Resource};
use crate::types::{CreatedPlaylist, Playlist, PrivacyStatus};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

const PLAYLISTS_KEY: &str = "list_playlists";

/// A new playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePlaylistParams {
    /// Title
    pub title: String,
    /// Description
    pub description: Option<String>,
    /// Visibility
    pub privacy_status: PrivacyStatus,
}

impl YouTubeService {
    /// Create a playlist on the channel.
    pub async fn create_playlist(&self, params: &CreatePlaylistParams) -> Result<CreatedPlaylist> {
        let body = json!({
            "snippet": {
                "title": params.title,
                "description": params.description.as_deref().unwrap_or_default(),
            },
            "status": { "privacyStatus": params.privacy_status.as_str() },
        });
        let created: Resource = self
            .call_as(
                cost::WRITE,
                "playlists.insert",
                ApiRequest::post(format!("{DATA_API}/playlists"), body)
                    .param("part", "snippet,status"),
            )
            .await?;

        self.invalidate(PLAYLISTS_KEY).await;
        info!(playlist_id = %created.id, "Playlist created");

        Ok(CreatedPlaylist {
            url: format!("https://www.youtube.com/playlist?list={}", created.id),
            playlist_id: created.id,
        })
    }

    /// Append (or insert at `position`) a video. Returns the playlist item id.
    pub async fn add_to_playlist(
        &self,
        playlist_id: &str,
        video_id: &str,
        position: Option<u32>,
    ) -> Result<String> {
        let mut snippet = json!({
            "playlistId": playlist_id,
            "resourceId": { "kind": "youtube#video", "videoId": video_id },
        });
        if let Some(position) = position {
            snippet["position"] = json!(position);
        }

        let item: Resource = self
            .call_as(
                cost::WRITE,
                "playlistItems.insert",
                ApiRequest::post(
                    format!("{DATA_API}/playlistItems"),
                    json!({ "snippet": snippet }),
                )
                .param("part", "snippet"),
            )
            .await?;

        self.invalidate(PLAYLISTS_KEY).await;
        Ok(item.id)
    }

    /// Up to 50 playlists owned by the authorized user.
    pub async fn list_playlists(&self) -> Result<Vec<Playlist>> {
        self.read_through(PLAYLISTS_KEY, None, || async {
            let response: ListResponse<Resource> = self
                .call_as(
                    cost::LIST,
                    "playlists.list",
                    ApiRequest::get(format!("{DATA_API}/playlists"))
                        .param("part", "snippet,contentDetails,status")
                        .param("mine", "true")
                        .param("maxResults", 50),
                )
                .await?;
            Ok(response
                .items
                .into_iter()
                .map(Resource::into_playlist)
                .collect())
        })
        .await
    }

    /// Move a video to `new_position` (zero-based) within a playlist.
    pub async fn reorder_playlist(
        &self,
        playlist_id: &str,
        video_id: &str,
        new_position: u32,
    ) -> Result<()> {
        let items: ListResponse<PlaylistItem> = self
            .call_as(
                cost::LIST,
                "playlistItems.list",
                ApiRequest::get(format!("{DATA_API}/playlistItems"))
                    .param("part", "snippet")
                    .param("playlistId", playlist_id)
                    .param("maxResults", 50),
            )
            .await?;

        let target = items
            .items
            .into_iter()
            .find(|item| item.snippet.resource_id.video_id.as_deref() == Some(video_id))
            .ok_or_else(|| {
                Error::NotFound(format!("video {video_id} in playlist {playlist_id}"))
            })?;

        let body = json!({
            "id": target.id,
            "snippet": {
                "playlistId": playlist_id,
                "resourceId": { "kind": "youtube#video", "videoId": video_id },
                "position": new_position,
            },
        });
        self.call(
            cost::WRITE,
            "playlistItems.update",
            ApiRequest::put(format!("{DATA_API}/playlistItems"), body).param("part", "snippet"),
        )
        .await?;

        info!(
            playlist_id,
            video_id,
            from = target.snippet.position,
            to = new_position,
            "Playlist reordered"
        );
        Ok(())
    }
}
