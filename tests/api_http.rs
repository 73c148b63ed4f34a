// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - GET /api/news/latest (defaults, filters, region validation)
// - GET /api/news/sources

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use vn_market_monitor::api::{create_router, AppState};
use vn_market_monitor::cache::ExpiringCache;
use vn_market_monitor::news::registry::SourceRegistry;
use vn_market_monitor::news::types::{NewsItem, Region, SourceConfig, SourceFetcher};
use vn_market_monitor::news::NewsService;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

struct CannedFetcher {
    responses: HashMap<String, Vec<NewsItem>>,
}

#[async_trait]
impl SourceFetcher for CannedFetcher {
    async fn fetch(&self, cfg: &SourceConfig, _limit: usize) -> Vec<NewsItem> {
        self.responses.get(&cfg.source).cloned().unwrap_or_default()
    }
}

fn canned_item(source: &str, url: &str) -> NewsItem {
    NewsItem {
        title: format!("story {url}"),
        summary: "plain text".to_string(),
        url: url.to_string(),
        source: source.to_string(),
        publish_time: None,
        image_url: None,
        tags: vec![],
    }
}

/// Build the same Router the binary uses, backed by a canned fetch strategy.
fn test_router() -> Router {
    let registry = SourceRegistry::new(vec![
        SourceConfig {
            source: "alpha".into(),
            region: Region::Vn,
            rss_urls: vec!["https://alpha.example/feed.rss".into()],
            html_seed_urls: vec![],
            article_url_pattern: None,
        },
        SourceConfig {
            source: "beta".into(),
            region: Region::Vn,
            rss_urls: vec![],
            html_seed_urls: vec!["https://beta.example/".into()],
            article_url_pattern: None,
        },
    ])
    .expect("test registry");

    let responses = HashMap::from([
        (
            "alpha".to_string(),
            vec![canned_item("alpha", "https://alpha.example/a1")],
        ),
        (
            "beta".to_string(),
            vec![canned_item("beta", "https://beta.example/b1")],
        ),
    ]);

    let news = NewsService::with_fetcher(
        registry,
        Arc::new(ExpiringCache::new()),
        Arc::new(CannedFetcher { responses }),
    );
    let state = AppState {
        news: Arc::new(news),
    };
    create_router(state, &["http://localhost:8501".to_string()])
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Json) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let json = serde_json::from_slice(&bytes).unwrap_or(Json::Null);
    (status, json)
}

#[tokio::test]
async fn health_returns_200_and_ok_body() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    assert_eq!(String::from_utf8(bytes).expect("utf8"), "ok");
}

#[tokio::test]
async fn latest_news_defaults_to_vn_region() {
    let (status, json) = get_json(test_router(), "/api/news/latest").await;
    assert_eq!(status, StatusCode::OK);

    let items = json["items"].as_array().expect("items array");
    assert_eq!(items.len(), 2);
    for it in items {
        assert!(it.get("title").is_some(), "missing 'title'");
        assert!(it.get("url").is_some(), "missing 'url'");
        assert!(it.get("source").is_some(), "missing 'source'");
        assert!(it.get("publish_time").is_some(), "missing 'publish_time'");
        assert!(it.get("tags").is_some(), "missing 'tags'");
    }
}

#[tokio::test]
async fn latest_news_applies_source_filter() {
    let (status, json) =
        get_json(test_router(), "/api/news/latest?region=vn&sources=beta&limit=5").await;
    assert_eq!(status, StatusCode::OK);

    let items = json["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["source"], "beta");
}

#[tokio::test]
async fn latest_news_rejects_unknown_region() {
    let (status, json) = get_json(test_router(), "/api/news/latest?region=mars").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        json["detail"].as_str().unwrap_or_default().contains("region"),
        "error body should name the offending parameter"
    );
}

#[tokio::test]
async fn sources_endpoint_lists_sorted_keys() {
    let (status, json) = get_json(test_router(), "/api/news/sources").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["sources"], serde_json::json!(["alpha", "beta"]));
}
