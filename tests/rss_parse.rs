// tests/rss_parse.rs
//
// Fixture-driven tests for the feed parser: entry filtering, summary
// stripping, publish-time resolution, image extraction order, tags, and the
// Atom fallback.

use chrono::{DateTime, Utc};
use vn_market_monitor::news::rss::parse_feed;

const VNEXPRESS_RSS: &str = include_str!("fixtures/vnexpress_rss.xml");
const BLOOMBERG_ATOM: &str = include_str!("fixtures/bloomberg_atom.xml");

fn utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

#[test]
fn rss_fixture_skips_entries_missing_title_or_link() {
    let items = parse_feed("vnexpress", VNEXPRESS_RSS, 10).expect("rss parse ok");
    // Fixture has 5 raw items; one lacks a title, one lacks a link.
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|i| !i.title.is_empty() && !i.url.is_empty()));
    assert!(items.iter().all(|i| i.source == "vnexpress"));
}

#[test]
fn rss_summary_is_plain_text() {
    let items = parse_feed("vnexpress", VNEXPRESS_RSS, 10).unwrap();
    assert_eq!(
        items[0].summary,
        "Chi so VN-Index tang manh & thanh khoan cai thien."
    );
}

#[test]
fn rss_publish_time_converts_to_utc_and_bad_dates_become_absent() {
    let items = parse_feed("vnexpress", VNEXPRESS_RSS, 10).unwrap();
    // +0700 local time normalized to UTC.
    assert_eq!(items[0].publish_time, Some(utc("2025-03-03T02:15:00Z")));
    // "not a date" parses as neither RFC 2822 nor RFC 3339.
    assert_eq!(items[2].publish_time, None);
}

#[test]
fn rss_image_extraction_order() {
    let items = parse_feed("vnexpress", VNEXPRESS_RSS, 10).unwrap();
    // No media/enclosure on the first entry: scanned out of the HTML summary.
    assert_eq!(
        items[0].image_url.as_deref(),
        Some("https://i1-kinhdoanh.vnecdn.net/chart.jpg")
    );
    // media:content wins over media:thumbnail.
    assert_eq!(
        items[1].image_url.as_deref(),
        Some("https://i1-kinhdoanh.vnecdn.net/foreign.jpg")
    );
    // Enclosure when there is no media attachment.
    assert_eq!(
        items[2].image_url.as_deref(),
        Some("https://i1-kinhdoanh.vnecdn.net/rates.jpg")
    );
}

#[test]
fn rss_tags_come_from_categories() {
    let items = parse_feed("vnexpress", VNEXPRESS_RSS, 10).unwrap();
    assert_eq!(items[0].tags, vec!["Chung khoan", "Thi truong"]);
    assert!(items[1].tags.is_empty());
}

#[test]
fn rss_cap_applies_to_raw_feed_order() {
    let items = parse_feed("vnexpress", VNEXPRESS_RSS, 2).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "VN-Index vuot 1.300 diem");
}

#[test]
fn atom_fallback_parses_entries() {
    let items = parse_feed("bloomberg", BLOOMBERG_ATOM, 10).expect("atom parse ok");
    assert_eq!(items.len(), 2);

    let first = &items[0];
    assert_eq!(first.title, "Asian stocks rise as trading resumes");
    assert_eq!(
        first.url,
        "https://www.bloomberg.com/news/articles/2025-03-03/asian-stocks"
    );
    // "published" beats "updated".
    assert_eq!(first.publish_time, Some(utc("2025-03-03T03:30:00Z")));
    assert_eq!(first.tags, vec!["markets", "asia"]);
    assert_eq!(
        first.image_url.as_deref(),
        Some("https://assets.bwbx.io/s1.jpg")
    );
    assert_eq!(
        first.summary,
        "Benchmarks across the region advanced."
    );
}

#[test]
fn atom_prefers_alternate_links_and_falls_back_to_updated() {
    let items = parse_feed("bloomberg", BLOOMBERG_ATOM, 10).unwrap();
    let second = &items[1];
    // rel="self" is skipped in favor of the rel-less link.
    assert_eq!(
        second.url,
        "https://www.bloomberg.com/news/articles/2025-03-03/oil-steadies"
    );
    assert_eq!(second.publish_time, Some(utc("2025-03-02T22:10:00Z")));
}

#[test]
fn garbage_body_is_an_error_not_a_panic() {
    assert!(parse_feed("x", "this is not xml at all", 10).is_err());
}
