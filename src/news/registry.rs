// src/news/registry.rs
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::news::types::{Region, SourceConfig};

const ENV_PATH: &str = "NEWS_SOURCES_PATH";
const DEFAULT_PATH: &str = "config/news_sources.toml";

/// Hard cap on sources selected for one aggregation. Extra sources beyond the
/// tenth are dropped, keeping the registry-order prefix.
pub const MAX_SELECTED_SOURCES: usize = 10;

/// Ordered, immutable registry of configured news sources. Built once at
/// startup and never mutated; order is the selection order.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    sources: Vec<SourceConfig>,
}

impl SourceRegistry {
    pub fn new(sources: Vec<SourceConfig>) -> Result<Self> {
        for cfg in &sources {
            if cfg.rss_urls.is_empty() && cfg.html_seed_urls.is_empty() {
                anyhow::bail!(
                    "source '{}' has neither rss_urls nor html_seed_urls",
                    cfg.source
                );
            }
        }
        Ok(Self { sources })
    }

    /// Built-in source set: four Vietnamese market outlets plus one global
    /// wire, RSS where the outlet publishes feeds, HTML seeds otherwise.
    pub fn builtin() -> Self {
        let sources = vec![
            SourceConfig {
                source: "vnexpress".into(),
                region: Region::Vn,
                rss_urls: vec![
                    "https://vnexpress.net/rss/kinh-doanh.rss".into(),
                    "https://vnexpress.net/rss/tin-moi-nhat.rss".into(),
                ],
                html_seed_urls: vec!["https://vnexpress.net/kinh-doanh/chung-khoan".into()],
                article_url_pattern: None,
            },
            SourceConfig {
                source: "cafef".into(),
                region: Region::Vn,
                rss_urls: vec![],
                html_seed_urls: vec![
                    "https://cafef.vn/thi-truong-chung-khoan.chn".into(),
                    "https://cafef.vn/chung-khoan.chn".into(),
                ],
                article_url_pattern: None,
            },
            SourceConfig {
                source: "tinnhanhchungkhoan".into(),
                region: Region::Vn,
                rss_urls: vec![],
                html_seed_urls: vec![
                    "https://www.tinnhanhchungkhoan.vn/".into(),
                    "https://www.tinnhanhchungkhoan.vn/chung-khoan/".into(),
                ],
                article_url_pattern: None,
            },
            SourceConfig {
                source: "vietstock".into(),
                region: Region::Vn,
                rss_urls: vec![
                    "https://en.stockbiz.vn/RSS/News/Market.ashx".into(),
                    "https://en.stockbiz.vn/RSS/News/TopStories.ashx".into(),
                ],
                html_seed_urls: vec![
                    "https://vietstock.vn/".into(),
                    "https://finance.vietstock.vn/".into(),
                ],
                article_url_pattern: None,
            },
            SourceConfig {
                source: "bloomberg".into(),
                region: Region::Global,
                rss_urls: vec!["https://feeds.bloomberg.com/markets/news.rss".into()],
                html_seed_urls: vec!["https://www.bloomberg.com/markets/".into()],
                article_url_pattern: None,
            },
        ];
        Self { sources }
    }

    /// Load the registry from an explicit TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading news sources from {}", path.display()))?;
        Self::parse_toml(&content)
            .with_context(|| format!("parsing news sources from {}", path.display()))
    }

    /// Load using env var + fallbacks:
    /// 1) $NEWS_SOURCES_PATH
    /// 2) config/news_sources.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            anyhow::bail!("NEWS_SOURCES_PATH points to non-existent path");
        }
        let repo_default = PathBuf::from(DEFAULT_PATH);
        if repo_default.exists() {
            return Self::load_from(&repo_default);
        }
        Ok(Self::builtin())
    }

    fn parse_toml(s: &str) -> Result<Self> {
        #[derive(serde::Deserialize)]
        struct File {
            sources: Vec<SourceConfig>,
        }
        let file: File = toml::from_str(s)?;
        Self::new(file.sources)
    }

    /// Select sources for one aggregation call, in registry order.
    ///
    /// `region` must already be trimmed and lowercased; `all` and `both` match
    /// every region, any other unrecognized value matches nothing. A non-empty
    /// `filter` (lowercase keys) restricts selection; unknown keys are ignored.
    /// The result is capped at [`MAX_SELECTED_SOURCES`].
    pub fn select(&self, region: &str, filter: &[String]) -> Vec<&SourceConfig> {
        let wildcard = matches!(region, "all" | "both");
        let wanted: Option<Region> = region.parse().ok();

        let mut selected = Vec::new();
        for cfg in &self.sources {
            let region_ok = wildcard || wanted == Some(cfg.region);
            if !region_ok {
                continue;
            }
            if !filter.is_empty() && !filter.iter().any(|f| f == &cfg.source) {
                continue;
            }
            selected.push(cfg);
            if selected.len() == MAX_SELECTED_SOURCES {
                break;
            }
        }
        selected
    }

    /// Sorted source keys, for the sources endpoint.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.sources.iter().map(|c| c.source.clone()).collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
