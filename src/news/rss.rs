// src/news/rss.rs
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use once_cell::sync::OnceCell;
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::news::strip_html;
use crate::news::types::{NewsItem, MAX_TAGS};

const RSS_ACCEPT: &str = "application/rss+xml, application/xml;q=0.9, text/xml;q=0.8, */*;q=0.5";

// ---- RSS 2.0 shape ----

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    #[serde(rename = "category", default)]
    categories: Vec<Category>,
    #[serde(rename = "enclosure", default)]
    enclosures: Vec<MediaRef>,
    // quick-xml's deserializer exposes namespaced elements by local name,
    // so `media:content` / `media:thumbnail` arrive as `content` / `thumbnail`.
    #[serde(rename = "content", default)]
    media_content: Vec<MediaRef>,
    #[serde(rename = "thumbnail", default)]
    media_thumbnail: Vec<MediaRef>,
}

#[derive(Debug, Deserialize)]
struct Category {
    #[serde(rename = "$text")]
    term: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MediaRef {
    #[serde(rename = "@url")]
    url: Option<String>,
}

// ---- Atom shape (fallback when the body is not RSS 2.0) ----

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<AtomText>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    published: Option<String>,
    updated: Option<String>,
    summary: Option<AtomText>,
    #[serde(rename = "category", default)]
    categories: Vec<AtomCategory>,
}

#[derive(Debug, Deserialize)]
struct AtomText {
    #[serde(rename = "$text")]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomCategory {
    #[serde(rename = "@term")]
    term: Option<String>,
}

/// Publish times arrive as RFC 2822 (RSS `pubDate`) or RFC 3339 (Atom);
/// anything else is treated as absent.
fn parse_publish_time(s: &str) -> Option<DateTime<Utc>> {
    let trimmed = s.trim();
    DateTime::parse_from_rfc2822(trimmed)
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Best-effort `<img src>` scan over an HTML fragment.
fn first_img_src(html: &str) -> Option<String> {
    static RE_IMG: OnceCell<regex::Regex> = OnceCell::new();
    let re = RE_IMG.get_or_init(|| {
        regex::Regex::new(r#"(?is)<img[^>]+src\s*=\s*["']([^"']+)["']"#).unwrap()
    });
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Image resolution order: media:content, media:thumbnail, first enclosure,
/// then an `<img>` scan of the raw HTML summary.
fn extract_image(item: &Item) -> Option<String> {
    item.media_content
        .iter()
        .chain(item.media_thumbnail.iter())
        .chain(item.enclosures.iter())
        .find_map(|m| m.url.clone())
        .or_else(|| item.description.as_deref().and_then(first_img_src))
}

/// Parse one feed body into normalized items, in feed order, up to `cap`.
/// Tries RSS 2.0 first and falls back to Atom when that yields nothing.
pub fn parse_feed(source: &str, body: &str, cap: usize) -> anyhow::Result<Vec<NewsItem>> {
    let t0 = std::time::Instant::now();

    let mut out = parse_rss(source, body, cap).unwrap_or_default();
    if out.is_empty() {
        out = parse_atom(source, body, cap)?;
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("news_parse_ms").record(ms);
    counter!("news_items_total").increment(out.len() as u64);
    Ok(out)
}

fn parse_rss(source: &str, body: &str, cap: usize) -> anyhow::Result<Vec<NewsItem>> {
    let rss: Rss = from_str(body)?;
    let mut out = Vec::new();
    for item in rss.channel.items.into_iter().take(cap) {
        let title = item.title.as_deref().unwrap_or_default().trim().to_string();
        let link = item.link.as_deref().unwrap_or_default().trim().to_string();
        if title.is_empty() || link.is_empty() {
            continue;
        }
        let summary = strip_html(item.description.as_deref().unwrap_or_default());
        let publish_time = item.pub_date.as_deref().and_then(parse_publish_time);
        let mut tags: Vec<String> = item
            .categories
            .iter()
            .filter_map(|c| c.term.as_deref())
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        tags.truncate(MAX_TAGS);
        let image_url = extract_image(&item);

        out.push(NewsItem {
            title,
            summary,
            url: link,
            source: source.to_string(),
            publish_time,
            image_url,
            tags,
        });
    }
    Ok(out)
}

fn parse_atom(source: &str, body: &str, cap: usize) -> anyhow::Result<Vec<NewsItem>> {
    let feed: AtomFeed = from_str(body)?;
    let mut out = Vec::new();
    for entry in feed.entries.into_iter().take(cap) {
        let title = entry
            .title
            .as_ref()
            .and_then(|t| t.value.as_deref())
            .unwrap_or_default()
            .trim()
            .to_string();
        let link = entry
            .links
            .iter()
            .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
            .or_else(|| entry.links.first())
            .and_then(|l| l.href.as_deref())
            .unwrap_or_default()
            .trim()
            .to_string();
        if title.is_empty() || link.is_empty() {
            continue;
        }
        let raw_summary = entry
            .summary
            .as_ref()
            .and_then(|t| t.value.as_deref())
            .unwrap_or_default();
        let publish_time = entry
            .published
            .as_deref()
            .and_then(parse_publish_time)
            .or_else(|| entry.updated.as_deref().and_then(parse_publish_time));
        let mut tags: Vec<String> = entry
            .categories
            .iter()
            .filter_map(|c| c.term.as_deref())
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        tags.truncate(MAX_TAGS);
        let image_url = first_img_src(raw_summary);

        out.push(NewsItem {
            title,
            summary: strip_html(raw_summary),
            url: link,
            source: source.to_string(),
            publish_time,
            image_url,
            tags,
        });
    }
    Ok(out)
}

/// Fetch a source's feeds in order, stopping at the first URL that yields at
/// least one item. Per-URL transport/parse failures are logged and skipped;
/// this never fails, it degrades to an empty list.
pub async fn fetch_rss_items(
    client: &reqwest::Client,
    source: &str,
    urls: &[String],
    limit: usize,
) -> Vec<NewsItem> {
    let mut items: Vec<NewsItem> = Vec::new();
    for url in urls {
        let resp = match client
            .get(url)
            .header(reqwest::header::ACCEPT, RSS_ACCEPT)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = ?e, source, %url, "rss fetch failed");
                counter!("news_fetch_errors_total").increment(1);
                continue;
            }
        };
        if !resp.status().is_success() {
            tracing::warn!(status = %resp.status(), source, %url, "rss fetch non-success status");
            counter!("news_fetch_errors_total").increment(1);
            continue;
        }
        let body = match resp.text().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(error = ?e, source, %url, "rss body read failed");
                counter!("news_fetch_errors_total").increment(1);
                continue;
            }
        };

        match parse_feed(source, &body, limit.max(10)) {
            Ok(parsed) if !parsed.is_empty() => {
                // First feed URL that produced anything wins for this source.
                items = parsed;
                break;
            }
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(error = ?e, source, %url, "rss parse failed");
                counter!("news_fetch_errors_total").increment(1);
                continue;
            }
        }
    }
    items.truncate(limit);
    items
}
