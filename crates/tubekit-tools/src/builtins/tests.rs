//! Catalog-level tests: registration, dispatch, quota and cache behaviour
//! observed through the tools.

use super::test_support::{env, env_with_budget, video};
use super::*;
use crate::error::Error;
use crate::registry::ToolCategory;
use serde_json::json;
use std::collections::HashSet;

async fn registry_for(env: &super::test_support::TestEnv) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    register_youtube_tools(&mut registry, &env.ctx);
    registry
}

#[tokio::test]
async fn test_catalog_has_all_tools() {
    let env = env(vec![]).await;
    let registry = registry_for(&env).await;

    assert_eq!(registry.len(), 33);
    let names: HashSet<&str> = registry.list_names().into_iter().collect();
    for expected in [
        "upload_video",
        "update_video",
        "delete_video",
        "list_videos",
        "set_thumbnail",
        "get_channel_stats",
        "get_video_performance",
        "get_audience_insights",
        "get_top_videos",
        "get_revenue_report",
        "generate_title_suggestions",
        "generate_description",
        "suggest_tags",
        "generate_chapters",
        "search_trending_topics",
        "analyze_competitor",
        "search_videos",
        "get_video_details",
        "create_playlist",
        "add_to_playlist",
        "list_playlists",
        "reorder_playlist",
        "get_comments",
        "reply_comment",
        "delete_comment",
        "get_comment_summary",
        "create_community_post",
        "add_content_plan",
        "list_content_plans",
        "update_content_plan",
        "delete_content_plan",
        "get_quota_status",
    ] {
        assert!(names.contains(expected), "missing {expected}");
    }
    assert_eq!(registry.list_names()[0], "upload_video");

    let per_category: usize = ToolCategory::ALL
        .iter()
        .map(|c| registry.list_by_category(*c).len())
        .sum();
    assert_eq!(per_category, 33);
}

#[tokio::test]
async fn test_schemas_declare_required_properties() {
    let env = env(vec![]).await;
    let registry = registry_for(&env).await;

    for def in registry.list_definitions() {
        assert_eq!(def.parameters["type"], "object", "{}", def.name);
        let properties = def.parameters["properties"]
            .as_object()
            .unwrap_or_else(|| panic!("{} has no properties", def.name));
        if let Some(required) = def.parameters["required"].as_array() {
            for field in required {
                let field = field.as_str().unwrap();
                assert!(properties.contains_key(field), "{}: {field}", def.name);
            }
        }
    }
}

#[tokio::test]
async fn test_unknown_tool() {
    let env = env(vec![]).await;
    let registry = registry_for(&env).await;
    let err = registry.execute("get_weather", json!({})).await.unwrap_err();
    assert_eq!(err.to_string(), "Unknown tool: get_weather");
}

#[tokio::test]
async fn test_search_is_metered_then_cached() {
    let env = env(vec![(
        "/search",
        json!({"items": [{"id": {"kind": "youtube#video", "videoId": "abc"}, "snippet": {"title": "Hit"}}],
               "pageInfo": {"totalResults": 1}}),
    )])
    .await;
    let registry = registry_for(&env).await;

    let args = json!({"query": "rust", "max_results": 5});
    let first = registry.execute("search_videos", args.clone()).await.unwrap();
    assert_eq!(first.output["results"][0]["title"], "Hit");
    assert_eq!(env.governor.status().used, 100);

    let second = registry.execute("search_videos", args).await.unwrap();
    assert_eq!(second.output, first.output);
    assert_eq!(env.governor.status().used, 100);
    assert_eq!(env.transport.sent_urls().len(), 1);
}

#[tokio::test]
async fn test_invalid_arguments_spend_no_quota() {
    let env = env(vec![]).await;
    let registry = registry_for(&env).await;

    let err = registry
        .execute("list_videos", json!({"max_results": 51}))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    let err = registry
        .execute("search_videos", json!({"max_results": 5}))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("query"));

    let err = registry
        .execute("generate_chapters", json!({}))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid input: Either video_id or transcript_text must be provided"
    );

    assert_eq!(env.governor.status().used, 0);
    assert!(env.transport.sent_urls().is_empty());
}

#[tokio::test]
async fn test_quota_exhaustion_surfaces_as_quota_error() {
    let env = env_with_budget(vec![("/search", json!({"items": []}))], 99).await;
    let registry = registry_for(&env).await;

    let err = registry
        .execute("search_videos", json!({"query": "rust"}))
        .await
        .unwrap_err();
    match err {
        Error::Quota(q) => {
            assert_eq!(q.requested, 100);
            assert_eq!(q.limit, 99);
        }
        other => panic!("expected quota error, got {other:?}"),
    }
    assert!(env.transport.sent_urls().is_empty());
}

#[tokio::test]
async fn test_channel_stats_include_quota_status() {
    let env = env(vec![(
        "/channels",
        json!({"items": [{
            "id": "UCowner",
            "snippet": {"title": "Owner"},
            "statistics": {"subscriberCount": "42", "videoCount": "7", "viewCount": "1000"}
        }]}),
    )])
    .await;
    let registry = registry_for(&env).await;

    let result = registry.execute("get_channel_stats", json!({})).await.unwrap();
    assert_eq!(result.output["subscriberCount"], 42);
    assert_eq!(result.output["quotaStatus"]["used"], 1);
    assert_eq!(result.output["quotaStatus"]["remaining"], 9_999);
}

#[tokio::test]
async fn test_video_details_formats_duration() {
    let mut resource = video("vid00000001", "Clip", &["a"], 5);
    resource["contentDetails"] = json!({"duration": "PT1H2M3S"});
    let env = env(vec![("/videos", json!({"items": [resource]}))]).await;
    let registry = registry_for(&env).await;

    let result = registry
        .execute(
            "get_video_details",
            json!({"video_id": "https://youtu.be/vid00000001"}),
        )
        .await
        .unwrap();
    assert_eq!(result.output["id"], "vid00000001");
    assert_eq!(result.output["durationFormatted"], "1:02:03");
}

#[tokio::test]
async fn test_suggest_tags_skips_unavailable_competitors() {
    let env = env(vec![("/videos", json!({"items": []}))]).await;
    let registry = registry_for(&env).await;

    let result = registry
        .execute(
            "suggest_tags",
            json!({"title": "Sourdough bread basics", "competitor_video_ids": ["gone0000000"]}),
        )
        .await
        .unwrap();
    let tags: Vec<&str> = result.output["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["tag"].as_str().unwrap())
        .collect();
    assert_eq!(tags, vec!["sourdough", "bread", "basics"]);
    assert_eq!(result.output["totalCharCount"], "sourdough,bread,basics".len());
}

#[tokio::test]
async fn test_trending_topics_use_region_default() {
    let env = env(vec![(
        "/videos",
        json!({"items": [
            video("v1", "One", &["Cats", "funny"], 100),
            video("v2", "Two", &["cats"], 50)
        ]}),
    )])
    .await;
    let registry = registry_for(&env).await;

    let result = registry
        .execute("search_trending_topics", json!({}))
        .await
        .unwrap();
    assert_eq!(result.output["region"], "US");
    assert_eq!(result.output["topics"][0]["topic"], "cats");
    assert_eq!(result.output["topics"][0]["videoCount"], 2);
    assert_eq!(result.output["trendingVideos"][1]["title"], "Two");

    let sent = env.transport.sent.lock().unwrap();
    assert_eq!(sent[0].query_value("regionCode"), Some("US"));
}

#[tokio::test]
async fn test_calendar_tool_lifecycle() {
    let env = env(vec![]).await;
    let registry = registry_for(&env).await;

    let added = registry
        .execute(
            "add_content_plan",
            json!({"title": "Bread video", "planned_date": "2024-06-01"}),
        )
        .await
        .unwrap();
    assert_eq!(added.output["success"], true);
    assert_eq!(added.output["plan"]["status"], "idea");
    let id = added.output["plan"]["id"].as_i64().unwrap();

    registry
        .execute(
            "add_content_plan",
            json!({"title": "Cake video", "planned_date": "2024-05-25", "status": "filming"}),
        )
        .await
        .unwrap();

    let listed = registry
        .execute("list_content_plans", json!({}))
        .await
        .unwrap();
    assert_eq!(listed.output["total"], 2);
    assert_eq!(listed.output["plans"][0]["title"], "Cake video");
    assert_eq!(listed.output["statusSummary"]["filming"], 1);

    let updated = registry
        .execute(
            "update_content_plan",
            json!({"plan_id": id, "status": "ready", "notes": "thumbnail pending"}),
        )
        .await
        .unwrap();
    assert_eq!(updated.output["plan"]["status"], "ready");
    assert_eq!(updated.output["plan"]["notes"], "thumbnail pending");

    let filtered = registry
        .execute("list_content_plans", json!({"status_filter": "ready"}))
        .await
        .unwrap();
    assert_eq!(filtered.output["total"], 1);

    let deleted = registry
        .execute("delete_content_plan", json!({"plan_id": id}))
        .await
        .unwrap();
    assert_eq!(deleted.output["deletedPlan"]["title"], "Bread video");

    let err = registry
        .execute("delete_content_plan", json!({"plan_id": id}))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err = registry
        .execute("update_content_plan", json!({"plan_id": 0, "title": "x"}))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn test_quota_status_tool() {
    let env = env_with_budget(vec![], 500).await;
    let registry = registry_for(&env).await;
    tokio_test::assert_ok!(env.governor.consume(120, "test"));

    let result = registry.execute("get_quota_status", json!({})).await.unwrap();
    assert_eq!(result.output["used"], 120);
    assert_eq!(result.output["remaining"], 380);
    assert_eq!(result.output["limit"], 500);
    assert!(registry
        .get_definition("get_quota_status")
        .unwrap()
        .description
        .contains("500"));
}
