// src/api.rs
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::news::types::NewsItem;
use crate::news::NewsService;

#[derive(Clone)]
pub struct AppState {
    pub news: Arc<NewsService>,
}

pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/news/latest", get(latest_news))
        .route("/api/news/sources", get(list_sources))
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

/// Restrict CORS to the configured origins; fall back to a permissive layer
/// when none of them parse (mirrors an empty config in dev).
fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    if parsed.is_empty() {
        CorsLayer::very_permissive()
    } else {
        CorsLayer::new()
            .allow_origin(parsed)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

#[derive(serde::Deserialize)]
struct LatestNewsQuery {
    #[serde(default = "default_region")]
    region: String,
    /// Comma-separated source keys.
    #[serde(default)]
    sources: Option<String>,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_region() -> String {
    "vn".to_string()
}

fn default_limit() -> usize {
    50
}

#[derive(serde::Serialize)]
struct NewsResponse {
    items: Vec<NewsItem>,
}

#[derive(serde::Serialize)]
struct ErrorDetail {
    detail: String,
}

type ApiError = (StatusCode, Json<ErrorDetail>);

fn bad_request(detail: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorDetail {
            detail: detail.into(),
        }),
    )
}

/// Multi-source news feed (VN + global).
async fn latest_news(
    State(state): State<AppState>,
    Query(q): Query<LatestNewsQuery>,
) -> Result<Json<NewsResponse>, ApiError> {
    let region = q.region.trim().to_lowercase();
    if !matches!(region.as_str(), "vn" | "global" | "all") {
        return Err(bad_request(format!(
            "region must be one of vn, global, all (got '{}')",
            q.region
        )));
    }

    let source_list: Vec<String> = q
        .sources
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    let sources = (!source_list.is_empty()).then_some(source_list.as_slice());

    let items = state.news.latest(&region, sources, q.limit).await;
    Ok(Json(NewsResponse { items }))
}

#[derive(serde::Serialize)]
struct SourcesResponse {
    sources: Vec<String>,
}

async fn list_sources(State(state): State<AppState>) -> Json<SourcesResponse> {
    Json(SourcesResponse {
        sources: state.news.available_sources(),
    })
}
