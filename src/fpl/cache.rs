use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Configuration for HTTP response caching
#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub enabled: bool, // false when --no-cache
    pub ttl: Duration,
}

/// Get the platform-appropriate cache directory for fpl-picker
pub fn get_cache_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("fpl-picker/http-cache"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.cache/fpl-picker/http-cache",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Clear the HTTP cache directory
pub fn clear_cache() -> Result<()> {
    let cache_path = get_cache_path();
    match std::fs::remove_dir_all(&cache_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to remove cache directory"),
    }
}

/// Cached response body with the time it was fetched
#[derive(Debug, Serialize, Deserialize)]
struct CachedEntry {
    fetched_at: u64, // Unix timestamp
    body: serde_json::Value,
}

/// Disk cache of decoded JSON responses, keyed by request URL.
///
/// FPL data only changes between gameweeks and after matches, so responses
/// are reused until they are older than `ttl`.
#[derive(Clone, Debug)]
pub struct ResponseCache {
    cache_path: PathBuf,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(cache_path: PathBuf, ttl: Duration) -> Self {
        Self { cache_path, ttl }
    }

    /// Build from config, returning None when caching is disabled
    pub fn from_config(config: &CacheConfig) -> Option<Self> {
        if config.enabled {
            Some(Self::new(get_cache_path(), config.ttl))
        } else {
            None
        }
    }

    /// Read a cached body if present and still fresh
    pub fn read_fresh(&self, key: &str) -> Option<serde_json::Value> {
        let bytes = cacache::read_sync(&self.cache_path, key).ok()?;
        let entry: CachedEntry = serde_json::from_slice(&bytes).ok()?;
        if is_fresh(entry.fetched_at, now_secs(), self.ttl) {
            Some(entry.body)
        } else {
            None
        }
    }

    /// Store a body under `key`, stamped with the current time
    pub fn write(&self, key: &str, body: &serde_json::Value) -> Result<()> {
        let entry = CachedEntry {
            fetched_at: now_secs(),
            body: body.clone(),
        };
        let json = serde_json::to_vec(&entry)?;
        cacache::write_sync(&self.cache_path, key, &json)
            .with_context(|| format!("Failed to write cache entry for {}", key))?;
        Ok(())
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// An entry is fresh while its age is strictly below the TTL
fn is_fresh(fetched_at: u64, now: u64, ttl: Duration) -> bool {
    now.saturating_sub(fetched_at) < ttl.as_secs()
}
