//! Domain types returned by the service, and the raw API shapes they are
//! decoded from.
//!
//! Domain types serialize in camelCase; they are both cached and handed to
//! MCP clients as tool output.

use serde::{Deserialize, Serialize};

// ============================================================================
// Enumerations
// ============================================================================

/// Video or playlist visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyStatus {
    /// Anyone can watch
    Public,
    /// Only the owner
    #[default]
    Private,
    /// Anyone with the link
    Unlisted,
}

impl PrivacyStatus {
    /// API value
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Unlisted => "unlisted",
        }
    }

    fn from_api(value: Option<&str>, fallback: Self) -> Self {
        match value {
            Some("public") => Self::Public,
            Some("private") => Self::Private,
            Some("unlisted") => Self::Unlisted,
            _ => fallback,
        }
    }
}

/// `search.list` ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchOrder {
    /// Best match
    #[default]
    Relevance,
    /// Newest first
    Date,
    /// Most viewed first
    ViewCount,
    /// Highest rated first
    Rating,
}

impl SearchOrder {
    /// API value
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Date => "date",
            Self::ViewCount => "viewCount",
            Self::Rating => "rating",
        }
    }
}

/// `commentThreads.list` ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentOrder {
    /// Newest first
    #[default]
    Time,
    /// Most relevant first
    Relevance,
}

impl CommentOrder {
    /// API value
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Relevance => "relevance",
        }
    }
}

/// Ranking metric for top videos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopMetric {
    /// Views
    Views,
    /// Estimated minutes watched
    WatchTime,
    /// Likes
    Likes,
    /// Comments
    Comments,
}

impl TopMetric {
    /// Analytics API metric name
    #[must_use]
    pub fn api_name(&self) -> &'static str {
        match self {
            Self::Views => "views",
            Self::WatchTime => "estimatedMinutesWatched",
            Self::Likes => "likes",
            Self::Comments => "comments",
        }
    }

    /// Name used in tool arguments and cache keys
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Views => "views",
            Self::WatchTime => "watch_time",
            Self::Likes => "likes",
            Self::Comments => "comments",
        }
    }
}

/// Analytics reporting period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateRange {
    /// Last 7 days
    #[serde(rename = "7d")]
    Week,
    /// Last 30 days
    #[default]
    #[serde(rename = "30d")]
    Month,
    /// Last 90 days
    #[serde(rename = "90d")]
    Quarter,
    /// Last 365 days
    #[serde(rename = "365d")]
    Year,
}

impl DateRange {
    /// `"<N>d"` form
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "7d",
            Self::Month => "30d",
            Self::Quarter => "90d",
            Self::Year => "365d",
        }
    }
}

// ============================================================================
// Domain types
// ============================================================================

/// Public counters of a video
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStats {
    /// Views
    pub view_count: u64,
    /// Likes
    pub like_count: u64,
    /// Comments
    pub comment_count: u64,
    /// Favorites
    pub favorite_count: u64,
}

/// A video with metadata and statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// Video id
    pub id: String,
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Tags
    pub tags: Vec<String>,
    /// Category id
    pub category_id: String,
    /// Visibility
    pub privacy_status: PrivacyStatus,
    /// Publish time (RFC 3339)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// High-resolution thumbnail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Owning channel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    /// Owning channel title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_title: Option<String>,
    /// ISO-8601 duration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Counters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<VideoStats>,
}

/// One page of the channel's own videos
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPage {
    /// Videos, newest first
    pub videos: Vec<Video>,
    /// Cursor for the next page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    /// Total results reported by search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u64>,
}

/// Result of an upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedVideo {
    /// New video id
    pub video_id: String,
    /// Watch URL
    pub url: String,
    /// Upload processing status
    pub status: String,
}

/// Result of a thumbnail change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailSet {
    /// Video id
    pub video_id: String,
    /// URL of the new thumbnail
    pub thumbnail_url: String,
}

/// Channel-level counters and profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    /// Subscribers
    pub subscriber_count: u64,
    /// Public videos
    pub video_count: u64,
    /// Lifetime views
    pub view_count: u64,
    /// Whether the subscriber count is hidden
    pub hidden_subscriber_count: bool,
    /// Channel title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Channel description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Handle / custom URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_url: Option<String>,
    /// Avatar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// One search hit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Video id
    pub id: String,
    /// Resource kind
    pub kind: String,
    /// Title
    pub title: String,
    /// Description snippet
    pub description: String,
    /// Channel id
    pub channel_id: String,
    /// Channel title
    pub channel_title: String,
    /// Publish time
    pub published_at: String,
    /// Thumbnail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// Search results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    /// Hits
    pub results: Vec<SearchResult>,
    /// Total reported by the API
    pub total_results: u64,
}

/// A playlist owned by the channel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Playlist id
    pub id: String,
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Number of items
    pub item_count: u64,
    /// Visibility
    pub privacy_status: String,
    /// Creation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// Thumbnail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// A newly created playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPlaylist {
    /// Playlist id
    pub playlist_id: String,
    /// Playlist URL
    pub url: String,
}

/// A single comment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment id
    pub id: String,
    /// Author
    pub author_display_name: String,
    /// Author avatar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_profile_image_url: Option<String>,
    /// Rendered text (may contain HTML)
    pub text_display: String,
    /// Likes
    pub like_count: u64,
    /// Post time
    pub published_at: String,
    /// Edit time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A top-level comment and its loaded replies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThread {
    /// Thread id
    pub id: String,
    /// Top-level comment
    pub top_level_comment: Comment,
    /// Total replies (not all may be loaded)
    pub total_reply_count: u64,
    /// Loaded replies
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<Comment>,
}

/// Per-video analytics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPerformance {
    /// Video id
    pub video_id: String,
    /// Views
    pub views: f64,
    /// Likes
    pub likes: f64,
    /// Comments
    pub comments: f64,
    /// Minutes watched
    pub estimated_minutes_watched: f64,
    /// Seconds
    pub average_view_duration: f64,
    /// Impression click-through rate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_through_rate: Option<f64>,
    /// Impressions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impressions: Option<f64>,
}

/// Viewer share by age group and gender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Demographic {
    /// e.g. `age25-34`
    pub age_group: String,
    /// e.g. `female`
    pub gender: String,
    /// Percent of viewers
    pub viewer_percentage: f64,
}

/// Views from one country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryViews {
    /// ISO country code
    pub country: String,
    /// Views
    pub views: f64,
}

/// Views from one traffic source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficSource {
    /// Source type
    pub source: String,
    /// Views
    pub views: f64,
}

/// Views from one device class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceViews {
    /// Device type
    pub device: String,
    /// Views
    pub views: f64,
}

/// Audience breakdown over a period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudienceInsights {
    /// Age/gender split
    pub demographics: Vec<Demographic>,
    /// Top 10 countries
    pub top_countries: Vec<CountryViews>,
    /// Traffic sources
    pub traffic_sources: Vec<TrafficSource>,
    /// Devices
    pub devices: Vec<DeviceViews>,
}

/// A ranked video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopVideo {
    /// Video id
    pub video_id: String,
    /// Title (empty if lookup failed)
    pub title: String,
    /// Metric value
    pub value: f64,
}

/// Monetization summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueReport {
    /// Estimated revenue (USD)
    pub estimated_revenue: f64,
    /// Revenue per 1000 monetized playbacks
    pub rpm: f64,
    /// Cost per 1000 ad impressions
    pub cpm: f64,
    /// Monetized playbacks
    pub monetized_playbacks: f64,
    /// Window start
    pub start_date: String,
    /// Window end
    pub end_date: String,
}

// ============================================================================
// Raw API shapes
// ============================================================================

pub(crate) mod raw {
    use super::*;
    use serde_json::Value;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ListResponse<T> {
        #[serde(default = "Vec::new")]
        pub items: Vec<T>,
        #[serde(default)]
        pub next_page_token: Option<String>,
        #[serde(default)]
        pub page_info: Option<PageInfo>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct PageInfo {
        pub total_results: Option<u64>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct Thumbnails {
        pub high: Option<ThumbnailRef>,
        #[serde(rename = "default")]
        pub fallback: Option<ThumbnailRef>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct ThumbnailRef {
        pub url: String,
    }

    impl Thumbnails {
        pub fn best(&self) -> Option<String> {
            self.high
                .as_ref()
                .or(self.fallback.as_ref())
                .map(|t| t.url.clone())
        }
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct Snippet {
        pub title: String,
        pub description: String,
        pub tags: Vec<String>,
        pub category_id: String,
        pub published_at: Option<String>,
        pub channel_id: Option<String>,
        pub channel_title: Option<String>,
        pub custom_url: Option<String>,
        pub thumbnails: Option<Thumbnails>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct Statistics {
        pub view_count: Option<String>,
        pub like_count: Option<String>,
        pub comment_count: Option<String>,
        pub favorite_count: Option<String>,
        pub subscriber_count: Option<String>,
        pub video_count: Option<String>,
        pub hidden_subscriber_count: bool,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct Status {
        pub privacy_status: Option<String>,
        pub upload_status: Option<String>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct ContentDetails {
        pub duration: Option<String>,
        pub item_count: Option<u64>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct Resource {
        pub id: String,
        pub snippet: Option<Snippet>,
        pub statistics: Option<Statistics>,
        pub status: Option<Status>,
        pub content_details: Option<ContentDetails>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct SearchId {
        pub kind: String,
        pub video_id: Option<String>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct SearchItem {
        pub id: SearchId,
        pub snippet: Option<Snippet>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct PlaylistItemResourceId {
        pub video_id: Option<String>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct PlaylistItemSnippet {
        pub resource_id: PlaylistItemResourceId,
        pub position: Option<u64>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct PlaylistItem {
        pub id: String,
        pub snippet: PlaylistItemSnippet,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct CommentSnippet {
        pub author_display_name: String,
        pub author_profile_image_url: Option<String>,
        pub text_display: String,
        pub like_count: u64,
        pub published_at: String,
        pub updated_at: Option<String>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct RawComment {
        pub id: String,
        pub snippet: CommentSnippet,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct ThreadSnippet {
        pub top_level_comment: RawComment,
        pub total_reply_count: u64,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct Replies {
        pub comments: Vec<RawComment>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct RawThread {
        pub id: String,
        pub snippet: ThreadSnippet,
        pub replies: Option<Replies>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct ThumbnailSetResponse {
        pub items: Vec<Thumbnails>,
    }

    /// Analytics `reports.query` result; cells are strings or numbers.
    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct Report {
        pub rows: Vec<Vec<Value>>,
    }

    pub fn count(value: Option<&String>) -> u64 {
        value.and_then(|v| v.parse().ok()).unwrap_or(0)
    }

    pub fn number(value: Option<&Value>) -> f64 {
        match value {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    pub fn text(value: Option<&Value>) -> String {
        match value {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    impl From<RawComment> for Comment {
        fn from(raw: RawComment) -> Self {
            Self {
                id: raw.id,
                author_display_name: raw.snippet.author_display_name,
                author_profile_image_url: raw.snippet.author_profile_image_url,
                text_display: raw.snippet.text_display,
                like_count: raw.snippet.like_count,
                published_at: raw.snippet.published_at,
                updated_at: raw.snippet.updated_at,
            }
        }
    }

    impl From<RawThread> for CommentThread {
        fn from(raw: RawThread) -> Self {
            Self {
                id: raw.id,
                top_level_comment: raw.snippet.top_level_comment.into(),
                total_reply_count: raw.snippet.total_reply_count,
                replies: raw
                    .replies
                    .map(|r| r.comments.into_iter().map(Comment::from).collect())
                    .unwrap_or_default(),
            }
        }
    }

    impl Resource {
        /// Decode as a video; `default_privacy` fills a missing status part.
        pub fn into_video(self, default_privacy: PrivacyStatus) -> Video {
            let snippet = self.snippet.unwrap_or_default();
            let privacy_status = PrivacyStatus::from_api(
                self.status.as_ref().and_then(|s| s.privacy_status.as_deref()),
                default_privacy,
            );
            let stats = self.statistics.map(|s| VideoStats {
                view_count: count(s.view_count.as_ref()),
                like_count: count(s.like_count.as_ref()),
                comment_count: count(s.comment_count.as_ref()),
                favorite_count: count(s.favorite_count.as_ref()),
            });

            Video {
                id: self.id,
                thumbnail_url: snippet.thumbnails.as_ref().and_then(Thumbnails::best),
                title: snippet.title,
                description: snippet.description,
                tags: snippet.tags,
                category_id: snippet.category_id,
                privacy_status,
                published_at: snippet.published_at,
                channel_id: snippet.channel_id,
                channel_title: snippet.channel_title,
                duration: self.content_details.and_then(|c| c.duration),
                stats,
            }
        }

        pub fn into_channel_stats(self) -> ChannelStats {
            let snippet = self.snippet.unwrap_or_default();
            let stats = self.statistics.unwrap_or_default();
            ChannelStats {
                subscriber_count: count(stats.subscriber_count.as_ref()),
                video_count: count(stats.video_count.as_ref()),
                view_count: count(stats.view_count.as_ref()),
                hidden_subscriber_count: stats.hidden_subscriber_count,
                thumbnail_url: snippet.thumbnails.as_ref().and_then(Thumbnails::best),
                title: Some(snippet.title).filter(|t| !t.is_empty()),
                description: Some(snippet.description).filter(|d| !d.is_empty()),
                custom_url: snippet.custom_url,
            }
        }

        pub fn into_playlist(self) -> Playlist {
            let snippet = self.snippet.unwrap_or_default();
            Playlist {
                id: self.id,
                thumbnail_url: snippet.thumbnails.as_ref().and_then(Thumbnails::best),
                title: snippet.title,
                description: snippet.description,
                item_count: self
                    .content_details
                    .and_then(|c| c.item_count)
                    .unwrap_or(0),
                privacy_status: self
                    .status
                    .and_then(|s| s.privacy_status)
                    .unwrap_or_default(),
                published_at: snippet.published_at,
            }
        }
    }

    impl SearchItem {
        pub fn into_result(self) -> SearchResult {
            let snippet = self.snippet.unwrap_or_default();
            SearchResult {
                id: self.id.video_id.unwrap_or_default(),
                kind: self.id.kind,
                thumbnail_url: snippet.thumbnails.as_ref().and_then(Thumbnails::best),
                title: snippet.title,
                description: snippet.description,
                channel_id: snippet.channel_id.unwrap_or_default(),
                channel_title: snippet.channel_title.unwrap_or_default(),
                published_at: snippet.published_at.unwrap_or_default(),
            }
        }
    }
}
