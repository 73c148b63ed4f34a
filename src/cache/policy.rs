// src/cache/policy.rs
//
// Per-endpoint cache key shapes and TTLs. Every read path that caches goes
// through one of these builders so the key format lives in exactly one place.

use std::time::Duration;

pub const NEWS_LATEST_TTL: Duration = Duration::from_secs(300);
pub const MARKET_CARDS_TTL: Duration = Duration::from_secs(60);
pub const STOCK_LIST_TTL: Duration = Duration::from_secs(60 * 60 * 12);
pub const TOP_MOVERS_TTL: Duration = Duration::from_secs(60);
pub const STOCK_QUOTE_TTL: Duration = Duration::from_secs(15);
pub const HISTORY_TTL: Duration = Duration::from_secs(120);
pub const PRICE_BOARD_TTL: Duration = Duration::from_secs(15);
pub const STOCK_NEWS_TTL: Duration = Duration::from_secs(600);

/// Key for the aggregated news feed. `sources` must already be the selected
/// source keys in sorted order so that equivalent selections share an entry.
pub fn news_latest(region: &str, sources: &[String], limit: usize) -> String {
    format!("news_latest:{}:{}:{}", region, sources.join(","), limit)
}

pub fn market_cards() -> String {
    "market_cards_vn30_hnx30".to_string()
}

pub fn stock_list(exchange: Option<&str>) -> String {
    format!("stocks_list:{}", exchange.unwrap_or("ALL").to_uppercase())
}

pub fn top_movers(kind: &str, universe: &str, limit: usize) -> String {
    format!("top_movers:{kind}:{universe}:{limit}")
}

pub fn stock_quote(symbol: &str) -> String {
    format!("stock_quote:{}", symbol.to_uppercase())
}

pub fn history(
    symbol: &str,
    start: Option<&str>,
    end: Option<&str>,
    interval: &str,
    length: Option<&str>,
) -> String {
    format!(
        "history:{}:{}:{}:{}:{}",
        symbol.to_uppercase(),
        start.unwrap_or(""),
        end.unwrap_or(""),
        interval,
        length.unwrap_or("")
    )
}

pub fn price_board(universe: &str, limit: usize) -> String {
    format!("price_board:{}:{}", universe.to_uppercase(), limit)
}

pub fn stock_news(symbol: &str, limit: usize) -> String {
    format!("stock_news:{}:{}", symbol.to_uppercase(), limit)
}
