//! Identifier parsing and display formatting

use chrono::{Duration, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

static BARE_VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").expect("valid regex"));
static VIDEO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:youtube\.com/watch\?(?:.*&)?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/|youtube\.com/shorts/)([a-zA-Z0-9_-]{11})",
    )
    .expect("valid regex")
});
static BARE_CHANNEL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^UC[a-zA-Z0-9_-]{22}$").expect("valid regex"));
static CHANNEL_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"youtube\.com/channel/(UC[a-zA-Z0-9_-]{22})").expect("valid regex")
});
static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").expect("valid regex")
});

/// Pull an 11-character video id out of a bare id or any common YouTube
/// URL form (watch, youtu.be, embed, v, shorts). Unrecognized input is
/// returned trimmed and unchanged.
#[must_use]
pub fn extract_video_id(input: &str) -> String {
    let input = input.trim();
    if BARE_VIDEO_ID.is_match(input) {
        return input.to_string();
    }
    VIDEO_URL
        .captures(input)
        .and_then(|c| c.get(1))
        .map_or_else(|| input.to_string(), |m| m.as_str().to_string())
}

/// Pull a `UC...` channel id out of a bare id or a `/channel/` URL.
#[must_use]
pub fn extract_channel_id(input: &str) -> String {
    let input = input.trim();
    if BARE_CHANNEL_ID.is_match(input) {
        return input.to_string();
    }
    CHANNEL_URL
        .captures(input)
        .and_then(|c| c.get(1))
        .map_or_else(|| input.to_string(), |m| m.as_str().to_string())
}

/// Inclusive analytics reporting window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWindow {
    /// YYYY-MM-DD
    pub start_date: String,
    /// YYYY-MM-DD
    pub end_date: String,
}

/// Turn `"<N>d"` into a window ending `today`. Anything unparsable (or a
/// zero length) means 30 days.
#[must_use]
pub fn parse_date_range(range: &str, today: NaiveDate) -> DateWindow {
    let days = range
        .trim()
        .trim_end_matches('d')
        .parse::<i64>()
        .ok()
        .filter(|d| *d > 0)
        .unwrap_or(30);

    DateWindow {
        start_date: (today - Duration::days(days)).format("%Y-%m-%d").to_string(),
        end_date: today.format("%Y-%m-%d").to_string(),
    }
}

/// Compact view-count rendering: `1.5K`, `2.35M`, `1.00B`.
#[must_use]
pub fn format_count(count: u64) -> String {
    let n = count as f64;
    if count >= 1_000_000_000 {
        format!("{:.2}B", n / 1_000_000_000.0)
    } else if count >= 1_000_000 {
        format!("{:.2}M", n / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", n / 1_000.0)
    } else {
        count.to_string()
    }
}

/// ISO-8601 duration (`PT1H2M3S`) to clock form (`1:02:03`, `4:05`).
/// Input that doesn't look like a duration is returned as is.
#[must_use]
pub fn format_duration(iso: &str) -> String {
    let Some(caps) = ISO_DURATION.captures(iso) else {
        return iso.to_string();
    };
    let part = |i: usize| {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };
    let (hours, minutes, seconds) = (part(1), part(2), part(3));

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}
