//! Channel statistics, search and video lookups

use super::YouTubeService;
use crate::cost;
use crate::error::{Error, Result};
use crate::transport::{ApiRequest, DATA_API};
use crate::types::raw::{ListResponse, Resource, SearchItem};
use crate::types::{ChannelStats, PrivacyStatus, SearchOrder, SearchPage, Video};
use serde::{Deserialize, Serialize};
use tubekit_core::cache_key;

/// Free-text video search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Query
    pub query: String,
    /// Page size (1-50)
    pub max_results: u32,
    /// Ordering
    pub order: SearchOrder,
}

/// Most-popular chart selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingParams {
    /// Restrict to a video category
    pub category_id: Option<String>,
    /// ISO 3166 region, `US` when absent
    pub region_code: Option<String>,
    /// Page size (1-50)
    pub max_results: u32,
}

impl YouTubeService {
    /// Statistics for `channel_id`, or for the configured channel.
    ///
    /// The authorized user's own channel is keyed with an empty id, which
    /// no explicit channel id can produce.
    pub async fn channel_stats(&self, channel_id: Option<&str>) -> Result<ChannelStats> {
        let id = channel_id
            .filter(|id| !id.is_empty())
            .or(self.channel_id())
            .map(str::to_string);
        let key = format!("channel_stats:{}", id.as_deref().unwrap_or_default());

        self.read_through(&key, None, || async {
            let request = ApiRequest::get(format!("{DATA_API}/channels"))
                .param("part", "snippet,statistics");
            let request = match &id {
                Some(id) => request.param("id", id),
                None => request.param("mine", "true"),
            };

            let response: ListResponse<Resource> =
                self.call_as(cost::LIST, "channels.list", request).await?;
            response
                .items
                .into_iter()
                .next()
                .map(Resource::into_channel_stats)
                .ok_or_else(|| {
                    Error::NotFound(format!("channel {}", id.as_deref().unwrap_or("(mine)")))
                })
        })
        .await
    }

    /// Search public videos. Costs 100 units on a miss.
    pub async fn search_videos(&self, params: &SearchParams) -> Result<SearchPage> {
        let key = cache_key("search", params)?;
        self.read_through(&key, Some(cost::SEARCH_TTL), || async {
            let response: ListResponse<SearchItem> = self
                .call_as(
                    cost::SEARCH,
                    "search.list",
                    ApiRequest::get(format!("{DATA_API}/search"))
                        .param("part", "snippet")
                        .param("type", "video")
                        .param("q", &params.query)
                        .param("maxResults", params.max_results)
                        .param("order", params.order.as_str()),
                )
                .await?;

            Ok(SearchPage {
                total_results: response
                    .page_info
                    .and_then(|p| p.total_results)
                    .unwrap_or(0),
                results: response
                    .items
                    .into_iter()
                    .map(SearchItem::into_result)
                    .collect(),
            })
        })
        .await
    }

    /// Full metadata and statistics for one video.
    pub async fn video_details(&self, video_id: &str) -> Result<Video> {
        let key = format!("video_details:{video_id}");
        self.read_through(&key, None, || async {
            let response: ListResponse<Resource> = self
                .call_as(
                    cost::LIST,
                    "videos.list",
                    ApiRequest::get(format!("{DATA_API}/videos"))
                        .param("part", "snippet,statistics,contentDetails,status")
                        .param("id", video_id),
                )
                .await?;

            response
                .items
                .into_iter()
                .next()
                .map(|r| r.into_video(PrivacyStatus::Public))
                .ok_or_else(|| Error::NotFound(format!("video {video_id}")))
        })
        .await
    }

    /// Current most-popular chart.
    pub async fn trending_videos(&self, params: &TrendingParams) -> Result<Vec<Video>> {
        let key = cache_key("trending", params)?;
        self.read_through(&key, Some(cost::TRENDING_TTL), || async {
            let response: ListResponse<Resource> = self
                .call_as(
                    cost::LIST,
                    "videos.list (trending)",
                    ApiRequest::get(format!("{DATA_API}/videos"))
                        .param("part", "snippet,statistics,contentDetails")
                        .param("chart", "mostPopular")
                        .param("regionCode", params.region_code.as_deref().unwrap_or("US"))
                        .param_opt("videoCategoryId", params.category_id.as_deref())
                        .param("maxResults", params.max_results),
                )
                .await?;

            Ok(response
                .items
                .into_iter()
                .map(|r| r.into_video(PrivacyStatus::Public))
                .collect())
        })
        .await
    }

    /// Most-viewed videos of any channel, with statistics.
    pub async fn channel_videos(&self, channel_id: &str, max_results: u32) -> Result<Vec<Video>> {
        let key = format!("channel_videos:{channel_id}:{max_results}");
        self.read_through(&key, Some(cost::SEARCH_TTL), || async {
            let found: ListResponse<SearchItem> = self
                .call_as(
                    cost::SEARCH,
                    "search.list (channel videos)",
                    ApiRequest::get(format!("{DATA_API}/search"))
                        .param("part", "snippet")
                        .param("channelId", channel_id)
                        .param("type", "video")
                        .param("order", "viewCount")
                        .param("maxResults", max_results),
                )
                .await?;

            let ids: Vec<String> = found
                .items
                .into_iter()
                .filter_map(|item| item.id.video_id)
                .collect();
            if ids.is_empty() {
                return Ok(Vec::new());
            }

            let details: ListResponse<Resource> = self
                .call_as(
                    cost::LIST,
                    "videos.list",
                    ApiRequest::get(format!("{DATA_API}/videos"))
                        .param("part", "snippet,statistics,contentDetails")
                        .param("id", ids.join(",")),
                )
                .await?;

            Ok(details
                .items
                .into_iter()
                .map(|r| r.into_video(PrivacyStatus::Public))
                .collect())
        })
        .await
    }
}
