// src/news/mod.rs
pub mod fetch;
pub mod html;
pub mod registry;
pub mod rss;
pub mod types;

use std::sync::Arc;

use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

use crate::cache::{policy, ExpiringCache};
use crate::news::fetch::HttpSourceFetcher;
use crate::news::registry::SourceRegistry;
use crate::news::types::{NewsItem, SourceFetcher};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "news_items_total",
            "Items produced by the fetch strategies."
        );
        describe_counter!(
            "news_fetch_errors_total",
            "Per-URL fetch/parse errors (recovered, not propagated)."
        );
        describe_counter!("news_cache_hits_total", "Aggregated-feed cache hits.");
        describe_counter!("news_cache_misses_total", "Aggregated-feed cache misses.");
        describe_histogram!("news_parse_ms", "Feed parse time in milliseconds.");
    });
}

/// Reduce an HTML fragment to plain text: strip tags, decode entities,
/// collapse whitespace.
pub fn strip_html(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }

    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    let without_tags = re_tags.replace_all(s, " ");

    let decoded = html_escape::decode_html_entities(without_tags.as_ref()).to_string();

    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    re_ws.replace_all(&decoded, " ").trim().to_string()
}

/// Multi-source news aggregator: selects sources from the registry, fans out
/// one fetch task per source, merges, sorts, truncates, and caches the
/// composed result. The registry and cache are injected once at startup.
pub struct NewsService {
    registry: SourceRegistry,
    cache: Arc<ExpiringCache<Vec<NewsItem>>>,
    fetcher: Arc<dyn SourceFetcher>,
}

impl NewsService {
    pub fn new(registry: SourceRegistry, cache: Arc<ExpiringCache<Vec<NewsItem>>>) -> Self {
        Self::with_fetcher(registry, cache, Arc::new(HttpSourceFetcher::new()))
    }

    pub fn with_fetcher(
        registry: SourceRegistry,
        cache: Arc<ExpiringCache<Vec<NewsItem>>>,
        fetcher: Arc<dyn SourceFetcher>,
    ) -> Self {
        ensure_metrics_described();
        Self {
            registry,
            cache,
            fetcher,
        }
    }

    /// Sorted keys of every configured source.
    pub fn available_sources(&self) -> Vec<String> {
        self.registry.keys()
    }

    /// Aggregated latest-news feed.
    ///
    /// `region` is lowercased; `vn`/`global` filter by region, `all`/`both`
    /// match everything, anything else selects no sources (the HTTP boundary
    /// validates before calling). `limit` is clamped into [1, 200]. A
    /// non-empty `sources` filter restricts selection case-insensitively;
    /// unknown keys are ignored. Fetch failures never escape: partial source
    /// outages silently degrade completeness.
    pub async fn latest(
        &self,
        region: &str,
        sources: Option<&[String]>,
        limit: usize,
    ) -> Vec<NewsItem> {
        let region = region.trim().to_lowercase();
        let limit = limit.clamp(1, 200);
        let filter: Vec<String> = sources
            .unwrap_or(&[])
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let selected = self.registry.select(&region, &filter);
        if selected.is_empty() {
            // Nothing matches: no network activity at all.
            return Vec::new();
        }

        let mut selected_keys: Vec<String> =
            selected.iter().map(|c| c.source.clone()).collect();
        selected_keys.sort();
        let cache_key = policy::news_latest(&region, &selected_keys, limit);

        if let Some(hit) = self.cache.get(&cache_key) {
            counter!("news_cache_hits_total").increment(1);
            return hit;
        }
        counter!("news_cache_misses_total").increment(1);

        let per_source_limit = (limit / selected.len()).clamp(5, 30);

        // Fan out one task per source; join them all before merging. The
        // strategies swallow their own failures, so a task only "fails" by
        // panicking, which counts as an empty contribution.
        let mut handles = Vec::with_capacity(selected.len());
        for cfg in &selected {
            let fetcher = Arc::clone(&self.fetcher);
            let cfg = (*cfg).clone();
            handles.push(tokio::spawn(async move {
                fetcher.fetch(&cfg, per_source_limit).await
            }));
        }

        let mut merged: Vec<NewsItem> = Vec::new();
        for (handle, cfg) in handles.into_iter().zip(selected.iter()) {
            match handle.await {
                Ok(items) => merged.extend(items),
                Err(e) => {
                    tracing::warn!(error = ?e, source = %cfg.source, "fetch task panicked");
                    counter!("news_fetch_errors_total").increment(1);
                }
            }
        }

        // Stable sort, newest first; undated items order below every dated one
        // (`None < Some(_)`), ties keep the post-merge order.
        merged.sort_by(|a, b| b.publish_time.cmp(&a.publish_time));
        merged.truncate(limit);

        self.cache
            .set(&cache_key, merged.clone(), policy::NEWS_LATEST_TTL);
        merged
    }
}
