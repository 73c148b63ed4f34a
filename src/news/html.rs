// src/news/html.rs
use std::collections::HashSet;

use metrics::counter;
use once_cell::sync::OnceCell;
use scraper::{Html, Selector};
use url::Url;

use crate::news::types::NewsItem;

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Default article-like URL heuristic, tuned to the configured Vietnamese
/// outlets. Sources can override it via `article_url_pattern`.
pub const DEFAULT_ARTICLE_PATTERN: &str = r"(?i)(post|\.html|\.chn|/news|/chung-khoan|/thi-truong)";

fn default_article_regex() -> &'static regex::Regex {
    static RE: OnceCell<regex::Regex> = OnceCell::new();
    RE.get_or_init(|| regex::Regex::new(DEFAULT_ARTICLE_PATTERN).unwrap())
}

/// Compile a per-source pattern override, falling back to the default on an
/// invalid pattern.
fn article_regex(source: &str, pattern: Option<&str>) -> regex::Regex {
    match pattern {
        None => default_article_regex().clone(),
        Some(p) => match regex::Regex::new(&format!("(?i){p}")) {
            Ok(re) => re,
            Err(e) => {
                tracing::warn!(error = ?e, source, pattern = p, "invalid article_url_pattern, using default");
                default_article_regex().clone()
            }
        },
    }
}

/// Resolve an anchor href per the extraction rules: root-relative paths are
/// joined against the seed's scheme+host, everything else must already be an
/// absolute http(s) URL.
fn resolve_href(href: &str, seed: &Url) -> Option<String> {
    if href.starts_with('#') || href.to_ascii_lowercase().starts_with("javascript:") {
        return None;
    }
    let candidate = if href.starts_with('/') {
        seed.join(href).ok()?.to_string()
    } else {
        href.to_string()
    };
    let parsed = Url::parse(&candidate).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    Some(candidate)
}

/// Pull `(title, url)` pairs out of one page. Anchors need a non-empty href
/// and non-empty visible text; titles get whitespace-collapsed.
/// `scraper::Html` is not `Send`, so this stays synchronous and returns owned
/// pairs before the caller awaits again.
pub fn extract_links(html: &str, seed: &Url) -> Vec<(String, String)> {
    let document = Html::parse_document(html);
    let anchor_selector = Selector::parse("a[href]").unwrap();

    let mut links = Vec::new();
    for element in document.select(&anchor_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        let title = element
            .text()
            .collect::<Vec<_>>()
            .join(" ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if href.is_empty() || title.is_empty() {
            continue;
        }
        if let Some(url) = resolve_href(href, seed) {
            links.push((title, url));
        }
    }
    links
}

fn dedupe_keep_order(pairs: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(pairs.len());
    for (title, url) in pairs {
        if seen.insert(url.clone()) {
            out.push((title, url));
        }
    }
    out
}

/// Rank article-like links first, preserving relative order inside each group.
fn rank_article_like(
    pairs: Vec<(String, String)>,
    article_re: &regex::Regex,
) -> Vec<(String, String)> {
    let (mut article_like, other): (Vec<_>, Vec<_>) =
        pairs.into_iter().partition(|(_, url)| article_re.is_match(url));
    article_like.extend(other);
    article_like
}

/// Turn accumulated `(title, url)` pairs into items: dedupe by URL keeping
/// first occurrence, article-like links first, truncate to `limit`.
pub fn build_items(
    source: &str,
    collected: Vec<(String, String)>,
    limit: usize,
    article_pattern: Option<&str>,
) -> Vec<NewsItem> {
    let article_re = article_regex(source, article_pattern);
    let mut ranked = rank_article_like(dedupe_keep_order(collected), &article_re);
    ranked.truncate(limit);
    counter!("news_items_total").increment(ranked.len() as u64);

    ranked
        .into_iter()
        .map(|(title, url)| NewsItem {
            title,
            summary: String::new(),
            url,
            source: source.to_string(),
            publish_time: None,
            image_url: None,
            tags: vec![],
        })
        .collect()
}

/// Scrape a source's seed pages for article links. Per-seed failures are
/// logged and skipped; this never fails, it degrades to an empty list. Items
/// produced here carry only title/url/source.
pub async fn fetch_html_items(
    client: &reqwest::Client,
    source: &str,
    seed_urls: &[String],
    limit: usize,
    article_pattern: Option<&str>,
) -> Vec<NewsItem> {
    let mut collected: Vec<(String, String)> = Vec::new();

    for seed in seed_urls {
        let base = match Url::parse(seed) {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!(error = ?e, source, %seed, "invalid seed url");
                counter!("news_fetch_errors_total").increment(1);
                continue;
            }
        };
        let resp = match client
            .get(seed)
            .header(reqwest::header::ACCEPT, HTML_ACCEPT)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = ?e, source, %seed, "html fetch failed");
                counter!("news_fetch_errors_total").increment(1);
                continue;
            }
        };
        if resp.status() != reqwest::StatusCode::OK {
            tracing::warn!(status = %resp.status(), source, %seed, "html fetch non-200 status");
            counter!("news_fetch_errors_total").increment(1);
            continue;
        }
        let body = match resp.text().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(error = ?e, source, %seed, "html body read failed");
                counter!("news_fetch_errors_total").increment(1);
                continue;
            }
        };
        collected.extend(extract_links(&body, &base));
    }

    build_items(source, collected, limit, article_pattern)
}
