// src/news/types.rs
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of tags carried on a single item.
pub const MAX_TAGS: usize = 10;

/// One normalized news entry, regardless of which strategy produced it.
///
/// Admission invariant: `title` and `url` are both non-empty. HTML-scraped
/// items carry only `title`/`url`/`source`; the other fields stay empty/absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsItem {
    pub title: String,
    /// Plain text, HTML already stripped.
    pub summary: String,
    /// Absolute URL; dedup key within one aggregation call.
    pub url: String,
    /// Registry key of the source that produced this item.
    pub source: String,
    /// UTC publish time; absent when the source provides no parseable date.
    pub publish_time: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
}

/// Coarse geographic classification of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Vn,
    Global,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Vn => "vn",
            Region::Global => "global",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vn" => Ok(Region::Vn),
            "global" => Ok(Region::Global),
            other => Err(anyhow::anyhow!("unknown region: {other}")),
        }
    }
}

/// Static registry entry describing one news origin and its fetch strategy.
///
/// At least one of `rss_urls` / `html_seed_urls` must be non-empty. A source
/// with any `rss_urls` uses the RSS strategy exclusively; HTML seeds on such a
/// source are never consulted, even when every feed fails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceConfig {
    /// Unique registry key, lowercase.
    pub source: String,
    pub region: Region,
    #[serde(default)]
    pub rss_urls: Vec<String>,
    #[serde(default)]
    pub html_seed_urls: Vec<String>,
    /// Optional per-source override for the article-like URL heuristic
    /// (case-insensitive regex). Falls back to the built-in pattern.
    #[serde(default)]
    pub article_url_pattern: Option<String>,
}

impl SourceConfig {
    pub fn uses_rss(&self) -> bool {
        !self.rss_urls.is_empty()
    }
}

/// Strategy seam the aggregator fans out through. The production
/// implementation dispatches RSS vs. HTML scraping over HTTP; tests inject
/// stubs. Implementations never fail: per-URL errors degrade to fewer items.
#[async_trait::async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, cfg: &SourceConfig, limit: usize) -> Vec<NewsItem>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_round_trips_through_strings() {
        assert_eq!("vn".parse::<Region>().unwrap(), Region::Vn);
        assert_eq!(" GLOBAL ".parse::<Region>().unwrap(), Region::Global);
        assert!("both".parse::<Region>().is_err());
        assert_eq!(Region::Vn.to_string(), "vn");
    }

    #[test]
    fn publish_time_serializes_as_iso8601() {
        let item = NewsItem {
            title: "t".into(),
            summary: String::new(),
            url: "https://example.com/a".into(),
            source: "alpha".into(),
            publish_time: Some(
                DateTime::parse_from_rfc3339("2025-03-01T08:30:00Z")
                    .unwrap()
                    .with_timezone(&Utc),
            ),
            image_url: None,
            tags: vec![],
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["publish_time"], "2025-03-01T08:30:00Z");
        assert_eq!(json["image_url"], serde_json::Value::Null);
    }

    #[test]
    fn rss_presence_decides_strategy() {
        let cfg = SourceConfig {
            source: "x".into(),
            region: Region::Vn,
            rss_urls: vec!["https://x/rss".into()],
            html_seed_urls: vec!["https://x/".into()],
            article_url_pattern: None,
        };
        assert!(cfg.uses_rss());
    }
}
