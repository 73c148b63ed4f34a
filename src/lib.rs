// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod cache;
pub mod metrics;
pub mod news;
pub mod settings;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::cache::ExpiringCache;
pub use crate::news::registry::SourceRegistry;
pub use crate::news::types::{NewsItem, Region, SourceConfig, SourceFetcher};
pub use crate::news::NewsService;
pub use crate::settings::Settings;
