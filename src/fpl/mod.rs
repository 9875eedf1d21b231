pub mod cache;
pub mod client;
pub mod history;
pub mod models;
pub mod types;

pub use cache::{clear_cache, CacheConfig, ResponseCache};
pub use client::{ApiError, FplClient, DEFAULT_BASE_URL};
pub use history::enrich_with_history;
pub use models::{BootstrapStatic, ElementSummary, RawElement};
pub use types::{Fixture, Gameweek, Player, Position, Team};
