//! Response bodies for the HTTP endpoints

use crate::scheduler::LifecycleState;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Process liveness
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

/// Scheduler state combined with the cache statistics
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerStatusResponse {
    pub scheduler_running: bool,
    pub scheduler_state: LifecycleState,
    pub successful_loads: u64,
    pub failed_loads: u64,
    pub last_update_time: Option<DateTime<Utc>>,
    pub has_data: bool,
}

/// Counters reported after a manual load
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadStats {
    pub successful_loads: u64,
    pub failed_loads: u64,
    pub last_update_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct TriggerLoadResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<LoadStats>,
}

/// Acknowledgement for operations without a payload
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// `UP`, `DOWN` or `DEGRADED`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Down,
    Degraded,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerHealthResponse {
    pub status: HealthStatus,
    pub scheduler_running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_successful_update: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
