//! YouTube Analytics reports

use super::YouTubeService;
use crate::cost;
use crate::error::{Error, Result};
use crate::helpers::{parse_date_range, DateWindow};
use crate::transport::{ApiRequest, ANALYTICS_API, DATA_API};
use crate::types::raw::{number, text, ListResponse, Report, Resource};
use crate::types::{
    AudienceInsights, CountryViews, DateRange, Demographic, DeviceViews, RevenueReport, TopMetric,
    TopVideo, TrafficSource, VideoPerformance,
};
use std::collections::HashMap;
use tracing::debug;

impl YouTubeService {
    /// Lifetime-to-date (last 365 days) metrics for one video.
    ///
    /// Impressions and click-through rate come from a second query that
    /// Google rejects for some videos; any failure other than quota
    /// exhaustion leaves those fields empty.
    pub async fn video_performance(&self, video_id: &str) -> Result<VideoPerformance> {
        let key = format!("video_performance:{video_id}");
        self.read_through(&key, None, || async {
            let window = self.window(DateRange::Year.as_str());
            let filter = format!("video=={video_id}");

            let report = self
                .report(
                    "youtubeAnalytics.query (video performance)",
                    self.report_request(&window)
                        .param(
                            "metrics",
                            "views,likes,comments,estimatedMinutesWatched,averageViewDuration",
                        )
                        .param("filters", &filter),
                )
                .await?;
            let row = report.rows.first();
            let cell = |i: usize| number(row.and_then(|r| r.get(i)));

            let mut performance = VideoPerformance {
                video_id: video_id.to_string(),
                views: cell(0),
                likes: cell(1),
                comments: cell(2),
                estimated_minutes_watched: cell(3),
                average_view_duration: cell(4),
                click_through_rate: None,
                impressions: None,
            };

            let ctr = self
                .report(
                    "youtubeAnalytics.query (impressions)",
                    self.report_request(&window)
                        .param("metrics", "impressions,impressionClickThroughRate")
                        .param("filters", &filter),
                )
                .await;
            match ctr {
                Ok(report) => {
                    if let Some(row) = report.rows.first() {
                        performance.impressions = Some(number(row.first()));
                        performance.click_through_rate = Some(number(row.get(1)));
                    }
                }
                Err(Error::Quota(e)) => return Err(Error::Quota(e)),
                Err(e) => debug!(video_id, error = %e, "Impression metrics unavailable"),
            }

            Ok(performance)
        })
        .await
    }

    /// Demographics, countries, traffic sources and devices.
    pub async fn audience_insights(&self, range: DateRange) -> Result<AudienceInsights> {
        let key = format!("audience_insights:{}", range.as_str());
        self.read_through(&key, Some(cost::ANALYTICS_TTL), || async {
            let window = self.window(range.as_str());

            let demographics = self
                .report(
                    "youtubeAnalytics.query (demographics)",
                    self.report_request(&window)
                        .param("metrics", "viewerPercentage")
                        .param("dimensions", "ageGroup,gender")
                        .param("sort", "-viewerPercentage"),
                )
                .await?
                .rows
                .iter()
                .map(|row| Demographic {
                    age_group: text(row.first()),
                    gender: text(row.get(1)),
                    viewer_percentage: number(row.get(2)),
                })
                .collect();

            let top_countries = self
                .dimension_views("countries", "country", &window, Some(10))
                .await?
                .into_iter()
                .map(|(country, views)| CountryViews { country, views })
                .collect();

            let traffic_sources = self
                .dimension_views("traffic sources", "insightTrafficSourceType", &window, None)
                .await?
                .into_iter()
                .map(|(source, views)| TrafficSource { source, views })
                .collect();

            let devices = self
                .dimension_views("devices", "deviceType", &window, None)
                .await?
                .into_iter()
                .map(|(device, views)| DeviceViews { device, views })
                .collect();

            Ok(AudienceInsights {
                demographics,
                top_countries,
                traffic_sources,
                devices,
            })
        })
        .await
    }

    /// Best videos by `metric`, with titles.
    pub async fn top_videos(
        &self,
        metric: TopMetric,
        range: DateRange,
        limit: u32,
    ) -> Result<Vec<TopVideo>> {
        let key = format!("top_videos:{}:{}:{limit}", metric.as_str(), range.as_str());
        self.read_through(&key, Some(cost::ANALYTICS_TTL), || async {
            let window = self.window(range.as_str());
            let report = self
                .report(
                    "youtubeAnalytics.query (top videos)",
                    self.report_request(&window)
                        .param("metrics", metric.api_name())
                        .param("dimensions", "video")
                        .param("sort", format!("-{}", metric.api_name()))
                        .param("maxResults", limit),
                )
                .await?;

            let ranked: Vec<(String, f64)> = report
                .rows
                .iter()
                .map(|row| (text(row.first()), number(row.get(1))))
                .collect();
            if ranked.is_empty() {
                return Ok(Vec::new());
            }

            let ids: Vec<&str> = ranked.iter().map(|(id, _)| id.as_str()).collect();
            let titles: ListResponse<Resource> = self
                .call_as(
                    cost::LIST,
                    "videos.list (titles)",
                    ApiRequest::get(format!("{DATA_API}/videos"))
                        .param("part", "snippet")
                        .param("id", ids.join(",")),
                )
                .await?;
            let titles: HashMap<String, String> = titles
                .items
                .into_iter()
                .map(|r| {
                    let title = r.snippet.map(|s| s.title).unwrap_or_default();
                    (r.id, title)
                })
                .collect();

            Ok(ranked
                .into_iter()
                .map(|(video_id, value)| TopVideo {
                    title: titles.get(&video_id).cloned().unwrap_or_default(),
                    video_id,
                    value,
                })
                .collect())
        })
        .await
    }

    /// Estimated revenue, RPM and CPM over a period.
    pub async fn revenue_report(&self, range: DateRange) -> Result<RevenueReport> {
        let key = format!("revenue:{}", range.as_str());
        self.read_through(&key, Some(cost::ANALYTICS_TTL), || async {
            let window = self.window(range.as_str());
            let report = self
                .report(
                    "youtubeAnalytics.query (revenue)",
                    self.report_request(&window).param(
                        "metrics",
                        "estimatedRevenue,estimatedAdRevenue,estimatedRedPartnerRevenue,grossRevenue,monetizedPlaybacks,cpm",
                    ),
                )
                .await?;
            let row = report.rows.first();
            let cell = |i: usize| number(row.and_then(|r| r.get(i)));

            let estimated_revenue = cell(0);
            let monetized_playbacks = cell(4);
            Ok(RevenueReport {
                estimated_revenue,
                rpm: revenue_per_mille(estimated_revenue, monetized_playbacks),
                cpm: cell(5),
                monetized_playbacks,
                start_date: window.start_date,
                end_date: window.end_date,
            })
        })
        .await
    }

    fn window(&self, range: &str) -> DateWindow {
        parse_date_range(range, self.clock.today())
    }

    fn report_request(&self, window: &DateWindow) -> ApiRequest {
        ApiRequest::get(ANALYTICS_API)
            .param(
                "ids",
                format!("channel=={}", self.channel_id().unwrap_or("MINE")),
            )
            .param("startDate", &window.start_date)
            .param("endDate", &window.end_date)
    }

    async fn report(&self, operation: &str, request: ApiRequest) -> Result<Report> {
        self.call_as(cost::ANALYTICS_QUERY, operation, request).await
    }

    /// Views split by one dimension, largest first.
    async fn dimension_views(
        &self,
        label: &str,
        dimension: &str,
        window: &DateWindow,
        limit: Option<u32>,
    ) -> Result<Vec<(String, f64)>> {
        let request = self
            .report_request(window)
            .param("metrics", "views")
            .param("dimensions", dimension)
            .param("sort", "-views")
            .param_opt("maxResults", limit);
        let report = self
            .report(&format!("youtubeAnalytics.query ({label})"), request)
            .await?;
        Ok(report
            .rows
            .iter()
            .map(|row| (text(row.first()), number(row.get(1))))
            .collect())
    }
}

fn revenue_per_mille(revenue: f64, playbacks: f64) -> f64 {
    if playbacks > 0.0 {
        revenue / playbacks * 1000.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revenue_per_mille() {
        assert_eq!(revenue_per_mille(25.0, 10_000.0), 2.5);
        assert_eq!(revenue_per_mille(25.0, 0.0), 0.0);
    }
}
