//! SEO helpers: titles, descriptions, tags and chapters
//!
//! The text generation here is template based. Only title suggestions,
//! competitor tag mining and chapter extraction touch the API.

use crate::args::{output, parse, require_text, truncate_chars};
use crate::error::{Error, Result};
use crate::registry::{Tool, ToolCategory, ToolDefinition, ToolResult};
use chrono::Datelike;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use std::time::Instant;
use tracing::debug;
use tubekit_youtube::helpers::extract_video_id;
use tubekit_youtube::service::SearchParams;
use tubekit_youtube::types::SearchOrder;
use tubekit_youtube::YouTubeService;

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));
static HOW_TO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)how to|วิธี").expect("valid regex"));
static CHAPTER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2}:\d{2}(?::\d{2})?)\s*[-–—]\s*(.+)").expect("valid regex")
});
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

const RESEARCH_SAMPLE: u32 = 20;
const MAX_TAGS: usize = 30;
const CHAPTER_SEGMENTS: usize = 8;
/// Assumed video length, in minutes, when spreading transcript chapters.
const ASSUMED_MINUTES: f64 = 30.0;

// ============================================================================
// Title suggestions
// ============================================================================

/// Title phrasing family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TitleStyle {
    /// Open loops and teasers
    Curiosity,
    /// Instructional
    HowTo,
    /// Numbered lists
    Listicle,
    /// Walkthroughs
    Tutorial,
}

impl TitleStyle {
    const ALL: [TitleStyle; 4] = [Self::Curiosity, Self::HowTo, Self::Listicle, Self::Tutorial];

    fn templates(self, topic: &str, year: i32) -> Vec<String> {
        match self {
            Self::Curiosity => vec![
                format!("{topic} - What Nobody Tells You"),
                format!("The Truth About {topic}"),
                format!("Why {topic} Changes Everything"),
                format!("{topic}: You Won't Believe What Happened"),
                format!("I Tried {topic} for 30 Days - Here's What Happened"),
            ],
            Self::HowTo => vec![
                format!("How to {topic} (Step by Step Guide)"),
                format!("{topic} Tutorial for Beginners"),
                format!("Complete Guide to {topic} ({year})"),
                format!("{topic} Made Easy - Beginner to Pro"),
                format!("Learn {topic} in 10 Minutes"),
            ],
            Self::Listicle => vec![
                format!("Top 10 {topic} Tips You Need to Know"),
                format!("5 {topic} Mistakes Everyone Makes"),
                format!("7 Best {topic} Strategies for {year}"),
                format!("{topic}: 10 Things I Wish I Knew Sooner"),
                format!("3 {topic} Hacks That Actually Work"),
            ],
            Self::Tutorial => vec![
                format!("{topic} Tutorial - Complete Walkthrough"),
                format!("{topic} from Scratch (Full Tutorial)"),
                format!("Master {topic} - Step by Step Tutorial"),
                format!("{topic} Tutorial {year} (Updated)"),
                format!("{topic} - Everything You Need to Know"),
            ],
        }
    }
}

/// Candidate titles: the chosen style's templates, or the first ten across
/// all styles.
pub(crate) fn title_candidates(topic: &str, style: Option<TitleStyle>, year: i32) -> Vec<String> {
    match style {
        Some(style) => style.templates(topic, year),
        None => TitleStyle::ALL
            .iter()
            .flat_map(|s| s.templates(topic, year))
            .take(10)
            .collect(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TitleSuggestion {
    title: String,
    char_count: usize,
    has_keywords: bool,
    rank: usize,
}

/// Shape of the best-performing titles for a topic
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TitlePatterns {
    pub(crate) with_numbers: Vec<String>,
    pub(crate) with_questions: Vec<String>,
    pub(crate) with_how_to: Vec<String>,
    pub(crate) avg_length: usize,
}

pub(crate) fn title_patterns(titles: &[String]) -> TitlePatterns {
    let pick = |pred: &dyn Fn(&str) -> bool| -> Vec<String> {
        titles.iter().filter(|t| pred(t)).cloned().collect()
    };
    let total_chars: usize = titles.iter().map(|t| t.chars().count()).sum();
    TitlePatterns {
        with_numbers: pick(&|t| DIGITS.is_match(t)),
        with_questions: pick(&|t| t.contains('?')),
        with_how_to: pick(&|t| HOW_TO.is_match(t)),
        avg_length: if titles.is_empty() {
            0
        } else {
            (total_chars as f64 / titles.len() as f64).round() as usize
        },
    }
}

/// Title ideas informed by the most viewed videos on the topic
pub struct TitleSuggestionsTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl TitleSuggestionsTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition = ToolDefinition::new(
            "generate_title_suggestions",
            "Generate SEO-optimized title suggestions based on topic analysis and competitor research.",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "topic": {"type": "string", "description": "Video topic or subject"},
                "target_keywords": {"type": "array", "items": {"type": "string"}, "description": "Target keywords to include"},
                "style": {"type": "string", "enum": ["curiosity", "how-to", "listicle", "tutorial"], "description": "Title style"}
            },
            "required": ["topic"]
        }))
        .with_category(ToolCategory::Seo);

        Self {
            definition,
            youtube,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TitleInput {
    topic: String,
    #[serde(default)]
    target_keywords: Vec<String>,
    style: Option<TitleStyle>,
}

#[async_trait::async_trait]
impl Tool for TitleSuggestionsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: TitleInput = parse("generate_title_suggestions", input)?;
        require_text("topic", &input.topic)?;

        let page = self
            .youtube
            .search_videos(&SearchParams {
                query: input.topic.clone(),
                max_results: RESEARCH_SAMPLE,
                order: SearchOrder::ViewCount,
            })
            .await?;
        let top_titles: Vec<String> = page.results.into_iter().map(|r| r.title).collect();
        let patterns = title_patterns(&top_titles);

        let keywords: Vec<String> = input
            .target_keywords
            .iter()
            .map(|k| k.to_lowercase())
            .collect();
        let year = chrono::Utc::now().year();
        let suggestions: Vec<TitleSuggestion> =
            title_candidates(&input.topic, input.style, year)
                .into_iter()
                .enumerate()
                .map(|(i, title)| {
                    let lower = title.to_lowercase();
                    TitleSuggestion {
                        char_count: title.chars().count(),
                        has_keywords: keywords.iter().any(|k| lower.contains(k.as_str())),
                        rank: i + 1,
                        title,
                    }
                })
                .collect();

        let total = top_titles.len();
        let tips = vec![
            format!(
                "Average title length in your niche: {} characters",
                patterns.avg_length
            ),
            format!(
                "{}/{total} top videos use numbers in titles",
                patterns.with_numbers.len()
            ),
            format!(
                "{}/{total} top videos use questions",
                patterns.with_questions.len()
            ),
            "Keep titles under 60 characters for full display".to_string(),
            "Include main keyword near the beginning of the title".to_string(),
        ];

        output(
            &json!({
                "suggestions": suggestions,
                "topPerformingTitles": top_titles.iter().take(5).collect::<Vec<_>>(),
                "patterns": patterns,
                "tips": tips,
            }),
            start,
        )
    }
}

// ============================================================================
// Description template
// ============================================================================

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━\n";

fn hashtag(text: &str) -> String {
    format!("#{}", WHITESPACE.replace_all(text, ""))
}

/// Description skeleton with optional timestamp and link sections.
pub(crate) fn build_description(
    title: &str,
    topic: &str,
    keywords: &[String],
    include_timestamps: bool,
    include_links: bool,
) -> String {
    let mut description = format!("{title}\n\n");
    description.push_str(&format!("In this video, we explore {topic}.\n\n"));

    if include_timestamps {
        description.push_str("📌 Timestamps:\n");
        description.push_str("0:00 - Introduction\n");
        description.push_str("[Add your timestamps here]\n\n");
    }

    if !keywords.is_empty() {
        description.push_str(&keywords.join(" | "));
        description.push_str("\n\n");
    }

    description.push_str(DIVIDER);
    if include_links {
        description.push_str("🔗 Links & Resources:\n");
        description.push_str("[Add your links here]\n\n");
    }

    description.push_str(DIVIDER);
    description.push_str("📱 Follow me:\n");
    description.push_str("[Add your social links here]\n\n");

    description.push_str(&hashtag(topic));
    if !keywords.is_empty() {
        let tags: Vec<String> = keywords.iter().map(|k| hashtag(k)).collect();
        description.push(' ');
        description.push_str(&tags.join(" "));
    }
    description
}

/// Description template generator (no API calls)
pub struct DescriptionTool {
    definition: ToolDefinition,
}

impl DescriptionTool {
    /// Create the tool
    #[must_use]
    pub fn new() -> Self {
        let definition = ToolDefinition::new(
            "generate_description",
            "Generate an optimized video description template with sections for timestamps, links, and hashtags.",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "title": {"type": "string", "description": "Video title"},
                "topic": {"type": "string", "description": "Video topic"},
                "keywords": {"type": "array", "items": {"type": "string"}, "description": "SEO keywords"},
                "include_timestamps": {"type": "boolean", "description": "Include timestamp section (default: false)"},
                "include_links": {"type": "boolean", "description": "Include links section (default: false)"}
            },
            "required": ["title", "topic"]
        }))
        .with_category(ToolCategory::Seo);

        Self { definition }
    }
}

impl Default for DescriptionTool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct DescriptionInput {
    title: String,
    topic: String,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    include_timestamps: bool,
    #[serde(default)]
    include_links: bool,
}

#[async_trait::async_trait]
impl Tool for DescriptionTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: DescriptionInput = parse("generate_description", input)?;
        require_text("title", &input.title)?;
        require_text("topic", &input.topic)?;

        let description = build_description(
            &input.title,
            &input.topic,
            &input.keywords,
            input.include_timestamps,
            input.include_links,
        );
        output(
            &json!({
                "charCount": description.chars().count(),
                "description": description,
                "tips": [
                    "First 150 characters appear in search results - make them count",
                    "Include 3-5 relevant hashtags at the end",
                    "Add timestamps for longer videos (10+ minutes)",
                    "Include links to related videos/playlists",
                    "Use keywords naturally in the first 2-3 sentences",
                ],
            }),
            start,
        )
    }
}

// ============================================================================
// Tag suggestions
// ============================================================================

/// A scored tag candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScoredTag {
    pub(crate) tag: String,
    pub(crate) relevance_score: f64,
    pub(crate) rank: usize,
}

/// Insertion-ordered score table; ties keep first-seen order after sorting.
#[derive(Default)]
struct TagScores {
    index: HashMap<String, usize>,
    entries: Vec<(String, f64)>,
}

impl TagScores {
    fn add(&mut self, tag: String, score: f64) {
        match self.index.get(&tag) {
            Some(&i) => self.entries[i].1 += score,
            None => {
                self.index.insert(tag.clone(), self.entries.len());
                self.entries.push((tag, score));
            }
        }
    }
}

fn long_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|w| w.chars().count() > 3)
        .map(str::to_string)
        .collect()
}

/// Rank tags: each competitor tag scores 1 per video, each title word
/// longer than 3 characters scores 1, and the first 20 such description
/// words score 0.5.
pub(crate) fn score_tags(
    competitor_tags: &[Vec<String>],
    title: &str,
    description: Option<&str>,
) -> Vec<ScoredTag> {
    let mut scores = TagScores::default();
    for tags in competitor_tags {
        for tag in tags {
            scores.add(tag.trim().to_lowercase(), 1.0);
        }
    }
    for word in long_words(title) {
        scores.add(word, 1.0);
    }
    if let Some(description) = description {
        for word in long_words(description).into_iter().take(20) {
            scores.add(word, 0.5);
        }
    }

    let mut entries = scores.entries;
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    entries
        .into_iter()
        .take(MAX_TAGS)
        .enumerate()
        .map(|(i, (tag, score))| ScoredTag {
            tag,
            relevance_score: (score * 10.0).round() / 10.0,
            rank: i + 1,
        })
        .collect()
}

/// Tag suggestions mined from the title, description and competitor videos
pub struct SuggestTagsTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl SuggestTagsTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition = ToolDefinition::new(
            "suggest_tags",
            "Suggest relevant tags based on title, description, and competitor video analysis.",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "title": {"type": "string", "description": "Video title"},
                "description": {"type": "string", "description": "Video description (optional)"},
                "competitor_video_ids": {"type": "array", "items": {"type": "string"}, "description": "Competitor video IDs to analyze tags from"}
            },
            "required": ["title"]
        }))
        .with_category(ToolCategory::Seo);

        Self {
            definition,
            youtube,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TagsInput {
    title: String,
    description: Option<String>,
    #[serde(default)]
    competitor_video_ids: Vec<String>,
}

#[async_trait::async_trait]
impl Tool for SuggestTagsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: TagsInput = parse("suggest_tags", input)?;
        require_text("title", &input.title)?;

        let mut competitor_tags = Vec::with_capacity(input.competitor_video_ids.len());
        for raw_id in &input.competitor_video_ids {
            let video_id = extract_video_id(raw_id);
            match self.youtube.video_details(&video_id).await {
                Ok(video) => competitor_tags.push(video.tags),
                Err(tubekit_youtube::Error::Quota(q)) => return Err(Error::Quota(q)),
                Err(e) => debug!(video_id = %video_id, error = %e, "Skipping competitor video"),
            }
        }

        let tags = score_tags(&competitor_tags, &input.title, input.description.as_deref());
        let total_char_count = tags
            .iter()
            .map(|t| t.tag.chars().count())
            .sum::<usize>()
            + tags.len().saturating_sub(1);

        output(
            &json!({
                "tags": tags,
                "totalCharCount": total_char_count,
                "tips": [
                    "YouTube allows up to 500 characters for tags",
                    "Use a mix of broad and specific tags",
                    "Include your brand/channel name as a tag",
                    "Add common misspellings if relevant",
                    "First 3-5 tags carry the most weight",
                ],
            }),
            start,
        )
    }
}

// ============================================================================
// Chapters
// ============================================================================

/// A chapter marker found in a description
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Chapter {
    pub(crate) timestamp: String,
    pub(crate) title: String,
}

/// A chapter proposed from transcript text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ProposedChapter {
    pub(crate) timestamp: String,
    pub(crate) title: String,
    pub(crate) preview: String,
}

/// `m:ss - Title` style markers, one per line.
pub(crate) fn extract_chapters(description: &str) -> Vec<Chapter> {
    CHAPTER_LINE
        .captures_iter(description)
        .map(|caps| Chapter {
            timestamp: caps[1].to_string(),
            title: caps[2].trim().to_string(),
        })
        .collect()
}

/// Split non-blank transcript lines into about eight segments spread over
/// a nominal 30 minute timeline.
pub(crate) fn chapters_from_transcript(transcript: &str) -> Vec<ProposedChapter> {
    let lines: Vec<&str> = transcript
        .split('\n')
        .filter(|l| !l.trim().is_empty())
        .collect();
    if lines.is_empty() {
        return Vec::new();
    }
    let segment_size = lines.len().div_ceil(CHAPTER_SEGMENTS);

    (0..lines.len())
        .step_by(segment_size)
        .map(|i| {
            let segment = &lines[i..(i + segment_size).min(lines.len())];
            let position = i as f64 / lines.len() as f64 * ASSUMED_MINUTES;
            let minutes = position.floor();
            let seconds = ((position - minutes) * 60.0).floor();
            ProposedChapter {
                timestamp: format!("{}:{:02}", minutes as u32, seconds as u32),
                title: truncate_chars(segment[0], 60).trim().to_string(),
                preview: truncate_chars(&segment[..segment.len().min(2)].join(" "), 100),
            }
        })
        .collect()
}

/// Extract chapters from a video description or propose them from a transcript
pub struct ChaptersTool {
    definition: ToolDefinition,
    youtube: Arc<YouTubeService>,
}

impl ChaptersTool {
    /// Create the tool
    #[must_use]
    pub fn new(youtube: Arc<YouTubeService>) -> Self {
        let definition = ToolDefinition::new(
            "generate_chapters",
            "Extract or generate video chapters. Provide either video_id (to extract from description) or transcript_text (to generate).",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "video_id": {"type": "string", "description": "YouTube video ID (to extract existing chapters)"},
                "transcript_text": {"type": "string", "description": "Video transcript text (to generate chapters)"}
            }
        }))
        .with_category(ToolCategory::Seo);

        Self {
            definition,
            youtube,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChaptersInput {
    video_id: Option<String>,
    transcript_text: Option<String>,
}

#[async_trait::async_trait]
impl Tool for ChaptersTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: ChaptersInput = parse("generate_chapters", input)?;

        if let Some(raw_id) = input.video_id.filter(|id| !id.is_empty()) {
            let video = self
                .youtube
                .video_details(&extract_video_id(&raw_id))
                .await?;
            let chapters = extract_chapters(&video.description);
            let result = if chapters.is_empty() {
                json!({
                    "source": "no_chapters_found",
                    "videoTitle": video.title,
                    "message": "No chapters found in video description. Provide transcript_text to generate chapters.",
                })
            } else {
                json!({
                    "source": "existing_description",
                    "chapters": chapters,
                    "videoTitle": video.title,
                })
            };
            return output(&result, start);
        }

        if let Some(transcript) = input.transcript_text.filter(|t| !t.is_empty()) {
            return output(
                &json!({
                    "source": "generated_from_transcript",
                    "chapters": chapters_from_transcript(&transcript),
                    "tips": [
                        "First chapter must start at 0:00",
                        "Minimum 3 chapters required by YouTube",
                        "Each chapter title should be descriptive but concise",
                        "Review and adjust timestamps manually for accuracy",
                    ],
                }),
                start,
            );
        }

        Err(Error::InvalidInput(
            "Either video_id or transcript_text must be provided".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_candidates_for_style() {
        let titles = title_candidates("Rust", Some(TitleStyle::HowTo), 2025);
        assert_eq!(titles.len(), 5);
        assert_eq!(titles[0], "How to Rust (Step by Step Guide)");
        assert_eq!(titles[2], "Complete Guide to Rust (2025)");
    }

    #[test]
    fn test_title_candidates_without_style_mixes_first_two_styles() {
        let titles = title_candidates("Rust", None, 2025);
        assert_eq!(titles.len(), 10);
        assert_eq!(titles[0], "Rust - What Nobody Tells You");
        assert_eq!(titles[9], "Learn Rust in 10 Minutes");
    }

    #[test]
    fn test_title_style_parses_kebab_case() {
        let style: TitleStyle = serde_json::from_value(json!("how-to")).unwrap();
        assert_eq!(style, TitleStyle::HowTo);
    }

    #[test]
    fn test_title_patterns() {
        let titles = vec![
            "How to bake bread".to_string(),
            "10 bread mistakes".to_string(),
            "Is sourdough worth it?".to_string(),
        ];
        let patterns = title_patterns(&titles);
        assert_eq!(patterns.with_numbers, vec!["10 bread mistakes"]);
        assert_eq!(patterns.with_questions, vec!["Is sourdough worth it?"]);
        assert_eq!(patterns.with_how_to, vec!["How to bake bread"]);
        assert_eq!(patterns.avg_length, 19);

        assert_eq!(title_patterns(&[]).avg_length, 0);
    }

    #[test]
    fn test_build_description_minimal() {
        let text = build_description("My Video", "home baking", &[], false, false);
        assert!(text.starts_with("My Video\n\nIn this video, we explore home baking.\n\n"));
        assert!(!text.contains("Timestamps"));
        assert!(!text.contains("Links & Resources"));
        assert!(text.ends_with("#homebaking"));
    }

    #[test]
    fn test_build_description_with_sections_and_keywords() {
        let keywords = vec!["sour dough".to_string(), "bread".to_string()];
        let text = build_description("T", "baking", &keywords, true, true);
        assert!(text.contains("📌 Timestamps:\n0:00 - Introduction\n"));
        assert!(text.contains("sour dough | bread\n\n"));
        assert!(text.contains("🔗 Links & Resources:\n"));
        assert!(text.ends_with("#baking #sourdough #bread"));
    }

    #[test]
    fn test_score_tags_weights_sources() {
        let competitors = vec![
            vec!["Rust".to_string(), "programming".to_string()],
            vec![" rust ".to_string()],
        ];
        let tags = score_tags(
            &competitors,
            "Learn Rust programming fast",
            Some("rust ownership explained"),
        );

        assert_eq!(tags[0].tag, "rust");
        assert_eq!(tags[0].relevance_score, 3.5);
        assert_eq!(tags[0].rank, 1);
        assert_eq!(tags[1].tag, "programming");
        assert_eq!(tags[1].relevance_score, 2.0);
        let ownership = tags.iter().find(|t| t.tag == "ownership").unwrap();
        assert_eq!(ownership.relevance_score, 0.5);
        assert!(tags.iter().any(|t| t.tag == "fast"));
        assert!(!tags.iter().any(|t| t.tag == "fast" && t.relevance_score > 1.0));
    }

    #[test]
    fn test_score_tags_caps_at_thirty() {
        let title: Vec<String> = (0..40).map(|i| format!("word{i:02}")).collect();
        let tags = score_tags(&[], &title.join(" "), None);
        assert_eq!(tags.len(), 30);
        assert_eq!(tags[0].tag, "word00");
        assert_eq!(tags[29].rank, 30);
    }

    #[test]
    fn test_extract_chapters() {
        let description = "Intro text\n0:00 - Intro\n1:23 – Setup\n1:02:03 — Wrap up \nno marker";
        let chapters = extract_chapters(description);
        assert_eq!(
            chapters,
            vec![
                Chapter {
                    timestamp: "0:00".into(),
                    title: "Intro".into()
                },
                Chapter {
                    timestamp: "1:23".into(),
                    title: "Setup".into()
                },
                Chapter {
                    timestamp: "1:02:03".into(),
                    title: "Wrap up".into()
                },
            ]
        );
    }

    #[test]
    fn test_chapters_from_transcript() {
        let transcript: Vec<String> = (0..16).map(|i| format!("line {i}")).collect();
        let chapters = chapters_from_transcript(&transcript.join("\n\n"));
        assert_eq!(chapters.len(), 8);
        assert_eq!(chapters[0].timestamp, "0:00");
        assert_eq!(chapters[0].title, "line 0");
        assert_eq!(chapters[0].preview, "line 0 line 1");
        // line 2 of 16 sits at 3.75 minutes
        assert_eq!(chapters[1].timestamp, "3:45");
    }

    #[test]
    fn test_chapters_from_short_or_blank_transcript() {
        assert!(chapters_from_transcript("\n  \n").is_empty());
        let chapters = chapters_from_transcript("only line");
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].preview, "only line");
    }
}
