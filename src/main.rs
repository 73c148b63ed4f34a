//! VN Market Monitor — Binary Entrypoint
//! Boots the Axum HTTP server: settings, source registry, shared TTL cache,
//! Prometheus exporter, and the news routes.

use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vn_market_monitor::api::{self, AppState};
use vn_market_monitor::cache::ExpiringCache;
use vn_market_monitor::metrics::Metrics;
use vn_market_monitor::news::registry::SourceRegistry;
use vn_market_monitor::news::NewsService;
use vn_market_monitor::settings::Settings;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("vn_market_monitor=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let settings = Settings::from_env();
    let registry = SourceRegistry::load_default()?;
    tracing::info!(sources = registry.len(), "source registry loaded");

    // Process-wide cache: created once here, injected, never torn down mid-run.
    let cache = Arc::new(ExpiringCache::new());
    let news = Arc::new(NewsService::new(registry, cache));

    let metrics = Metrics::init()?;
    let state = AppState { news };
    let router = api::create_router(state, &settings.allowed_origins).merge(metrics.router());

    let addr = settings.bind_addr();
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
