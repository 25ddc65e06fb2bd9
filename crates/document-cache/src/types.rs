//! Cache types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A loaded document and the time it was stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedDocument {
    pub document: Value,
    pub updated_at: DateTime<Utc>,
}

/// Point-in-time view of the cache counters and state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub successful_loads: u64,
    pub failed_loads: u64,
    pub last_update_time: Option<DateTime<Utc>>,
    pub has_data: bool,
}
