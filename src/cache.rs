//! Whole-response cache for read-heavy listings.
//!
//! Entries live for a fixed time and are only dropped by expiry or an
//! explicit [`PageCache::clear`]. Writes elsewhere never touch it, so a cached
//! listing can be stale for up to the configured TTL.

use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

use crate::render::{Format, Rendered};

#[derive(Debug, Clone)]
pub struct PageCache {
    inner: Cache<String, Rendered>,
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// `prefix` names the route, `path_and_query` tells pages apart.
    pub fn key(prefix: &str, path_and_query: &str, format: Format) -> String {
        format!("{prefix}:{format:?}:{path_and_query}")
    }

    pub async fn get(&self, key: &str) -> Option<Rendered> {
        let hit = self.inner.get(key).await;
        debug!("page cache {} for {key}", if hit.is_some() { "hit" } else { "miss" });
        hit
    }

    pub async fn insert(&self, key: String, page: Rendered) {
        self.inner.insert(key, page).await;
    }

    pub fn clear(&self) {
        self.inner.invalidate_all();
    }
}
