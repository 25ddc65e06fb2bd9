//! In-memory document cache with atomic whole-value replacement

use crate::types::{CacheStats, CachedDocument};
use arc_swap::ArcSwapOption;
use chrono::Utc;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Cache for a single JSON document and its load statistics.
///
/// The document and its timestamp live in one [`CachedDocument`] behind a
/// single swappable pointer, so they are always present or absent together.
/// Counters are lifetime statistics and survive [`CacheStore::clear`].
#[derive(Debug, Default)]
pub struct CacheStore {
    current: ArcSwapOption<CachedDocument>,
    successful_loads: AtomicU64,
    failed_loads: AtomicU64,
}

impl CacheStore {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached document and count a successful load
    pub fn update(&self, document: Value) {
        self.current.store(Some(Arc::new(CachedDocument {
            document,
            updated_at: Utc::now(),
        })));
        let total = self.successful_loads.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(successful_loads = total, "Cache updated");
    }

    /// Count a failed load without touching the cached document
    pub fn record_failure(&self) {
        let total = self.failed_loads.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(failed_loads = total, "Failed load recorded");
    }

    /// Current document and its timestamp, if any
    pub fn read(&self) -> Option<Arc<CachedDocument>> {
        self.current.load_full()
    }

    /// Snapshot of the counters and cache state
    pub fn stats(&self) -> CacheStats {
        let current = self.current.load_full();
        CacheStats {
            successful_loads: self.successful_loads.load(Ordering::Relaxed),
            failed_loads: self.failed_loads.load(Ordering::Relaxed),
            last_update_time: current.as_ref().map(|c| c.updated_at),
            has_data: current.is_some(),
        }
    }

    /// Drop the cached document; counters are kept
    pub fn clear(&self) {
        self.current.store(None);
        info!("Cache cleared");
    }
}
