//! Builtins - the tubekit tool catalog
//!
//! - Video: upload_video, update_video, delete_video, list_videos, set_thumbnail
//! - Analytics: get_channel_stats, get_video_performance, get_audience_insights,
//!   get_top_videos, get_revenue_report
//! - SEO: generate_title_suggestions, generate_description, suggest_tags,
//!   generate_chapters
//! - Research: search_trending_topics, analyze_competitor, search_videos,
//!   get_video_details
//! - Playlist: create_playlist, add_to_playlist, list_playlists, reorder_playlist
//! - Comment: get_comments, reply_comment, delete_comment, get_comment_summary
//! - Community: create_community_post
//! - Calendar: add_content_plan, list_content_plans, update_content_plan,
//!   delete_content_plan
//! - Utility: get_quota_status

mod analytics;
mod calendar;
mod comments;
mod community;
mod playlist;
mod quota;
mod research;
mod seo;
mod video;

pub use analytics::{
    AudienceInsightsTool, ChannelStatsTool, RevenueReportTool, TopVideosTool, VideoPerformanceTool,
};
pub use calendar::{
    AddContentPlanTool, DeleteContentPlanTool, ListContentPlansTool, UpdateContentPlanTool,
};
pub use comments::{CommentSummaryTool, DeleteCommentTool, GetCommentsTool, ReplyCommentTool};
pub use community::CommunityPostTool;
pub use playlist::{
    AddToPlaylistTool, CreatePlaylistTool, ListPlaylistsTool, ReorderPlaylistTool,
};
pub use quota::QuotaStatusTool;
pub use research::{AnalyzeCompetitorTool, SearchVideosTool, TrendingTopicsTool, VideoDetailsTool};
pub use seo::{ChaptersTool, DescriptionTool, SuggestTagsTool, TitleSuggestionsTool};
pub use video::{DeleteVideoTool, ListVideosTool, SetThumbnailTool, UpdateVideoTool, UploadVideoTool};

use crate::registry::ToolRegistry;
use std::sync::Arc;
use tubekit_core::CalendarStore;
use tubekit_youtube::YouTubeService;

/// Shared services the builtin tools operate on
#[derive(Clone)]
pub struct ToolContext {
    /// Quota-governed, cached YouTube access
    pub youtube: Arc<YouTubeService>,
    /// Content calendar
    pub calendar: Arc<CalendarStore>,
}

impl ToolContext {
    /// Bundle the services
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>, calendar: Arc<CalendarStore>) -> Self {
        Self { youtube, calendar }
    }
}

/// Register the full tool catalog
pub fn register_youtube_tools(registry: &mut ToolRegistry, ctx: &ToolContext) {
    let yt = &ctx.youtube;

    // Video management
    registry.register(Arc::new(UploadVideoTool::new(yt.clone())));
    registry.register(Arc::new(UpdateVideoTool::new(yt.clone())));
    registry.register(Arc::new(DeleteVideoTool::new(yt.clone())));
    registry.register(Arc::new(ListVideosTool::new(yt.clone())));
    registry.register(Arc::new(SetThumbnailTool::new(yt.clone())));

    // Analytics
    registry.register(Arc::new(ChannelStatsTool::new(yt.clone())));
    registry.register(Arc::new(VideoPerformanceTool::new(yt.clone())));
    registry.register(Arc::new(AudienceInsightsTool::new(yt.clone())));
    registry.register(Arc::new(TopVideosTool::new(yt.clone())));
    registry.register(Arc::new(RevenueReportTool::new(yt.clone())));

    // SEO
    registry.register(Arc::new(TitleSuggestionsTool::new(yt.clone())));
    registry.register(Arc::new(DescriptionTool::new()));
    registry.register(Arc::new(SuggestTagsTool::new(yt.clone())));
    registry.register(Arc::new(ChaptersTool::new(yt.clone())));

    // Research
    registry.register(Arc::new(TrendingTopicsTool::new(yt.clone())));
    registry.register(Arc::new(AnalyzeCompetitorTool::new(yt.clone())));
    registry.register(Arc::new(SearchVideosTool::new(yt.clone())));
    registry.register(Arc::new(VideoDetailsTool::new(yt.clone())));

    // Playlists
    registry.register(Arc::new(CreatePlaylistTool::new(yt.clone())));
    registry.register(Arc::new(AddToPlaylistTool::new(yt.clone())));
    registry.register(Arc::new(ListPlaylistsTool::new(yt.clone())));
    registry.register(Arc::new(ReorderPlaylistTool::new(yt.clone())));

    // Comments
    registry.register(Arc::new(GetCommentsTool::new(yt.clone())));
    registry.register(Arc::new(ReplyCommentTool::new(yt.clone())));
    registry.register(Arc::new(DeleteCommentTool::new(yt.clone())));
    registry.register(Arc::new(CommentSummaryTool::new(yt.clone())));

    // Community
    registry.register(Arc::new(CommunityPostTool::new()));

    // Content calendar
    registry.register(Arc::new(AddContentPlanTool::new(ctx.calendar.clone())));
    registry.register(Arc::new(ListContentPlansTool::new(ctx.calendar.clone())));
    registry.register(Arc::new(UpdateContentPlanTool::new(ctx.calendar.clone())));
    registry.register(Arc::new(DeleteContentPlanTool::new(ctx.calendar.clone())));

    // Utility
    registry.register(Arc::new(QuotaStatusTool::new(yt.clone())));
}

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
mod tests;
