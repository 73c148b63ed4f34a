// src/news/fetch.rs
use std::time::Duration;

use async_trait::async_trait;

use crate::news::html::fetch_html_items;
use crate::news::rss::fetch_rss_items;
use crate::news::types::{NewsItem, SourceConfig, SourceFetcher};

/// Per-HTTP-call timeout shared by both strategies.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const USER_AGENT: &str = "VN-Market-Monitor/0.1 (+https://localhost)";

/// Production strategy dispatch: sources with any RSS feed use the RSS
/// strategy exclusively, everything else gets its seed pages scraped. The
/// choice comes from the config shape, never from a fetch outcome.
pub struct HttpSourceFetcher {
    client: reqwest::Client,
}

impl HttpSourceFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for HttpSourceFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceFetcher for HttpSourceFetcher {
    async fn fetch(&self, cfg: &SourceConfig, limit: usize) -> Vec<NewsItem> {
        if cfg.uses_rss() {
            fetch_rss_items(&self.client, &cfg.source, &cfg.rss_urls, limit).await
        } else {
            fetch_html_items(
                &self.client,
                &cfg.source,
                &cfg.html_seed_urls,
                limit,
                cfg.article_url_pattern.as_deref(),
            )
            .await
        }
    }
}
