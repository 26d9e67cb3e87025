//! YouTube API unit costs and cache lifetimes

/// Any `*.list` read on the Data API
pub const LIST: u64 = 1;
/// `search.list`
pub const SEARCH: u64 = 100;
/// `*.insert`, `*.update`, `*.delete`, `thumbnails.set`
pub const WRITE: u64 = 50;
/// `videos.insert` with media
pub const UPLOAD: u64 = 1600;
/// One Analytics API report query
pub const ANALYTICS_QUERY: u64 = 1;

/// Comment threads change quickly
pub const COMMENTS_TTL: u64 = 120;
/// Search results and per-channel listings
pub const SEARCH_TTL: u64 = 600;
/// Analytics aggregates
pub const ANALYTICS_TTL: u64 = 600;
/// Most-popular chart
pub const TRENDING_TTL: u64 = 1800;
