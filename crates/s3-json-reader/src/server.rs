//! HTTP server for the JSON document endpoints
//!
//! Provides /health, /api/json and the /api/scheduler/* endpoints.

use crate::error::ApiError;
use crate::reader::JsonReader;
use crate::scheduler::RefreshScheduler;
use crate::types::{
    HealthResponse, HealthStatus, LoadStats, MessageResponse, SchedulerHealthResponse,
    SchedulerStatusResponse, TriggerLoadResponse,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::{DateTime, Utc};
use document_cache::CacheStore;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// Shared state for the HTTP server
pub struct ServerState {
    pub cache: Arc<CacheStore>,
    pub scheduler: Arc<RefreshScheduler>,
    pub reader: JsonReader,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(cache: Arc<CacheStore>, scheduler: Arc<RefreshScheduler>, reader: JsonReader) -> Self {
        Self {
            cache,
            scheduler,
            reader,
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<ServerState>;

#[derive(Debug, Deserialize)]
pub struct JsonQuery {
    pub key: Option<String>,
}

/// Create the HTTP router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/json", get(get_json))
        .route("/api/scheduler/status", get(scheduler_status))
        .route("/api/scheduler/cached-data", get(cached_data))
        .route("/api/scheduler/trigger-load", post(trigger_load))
        .route("/api/scheduler/cache", delete(clear_cache))
        .route("/api/scheduler/health", get(scheduler_health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server and run until a shutdown signal arrives
pub async fn start_server(state: SharedState, port: u16) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => tracing::error!(error = %e, "Failed to install Ctrl+C handler"),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received SIGTERM, shutting down");
            }
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime_secs = (Utc::now() - state.started_at).num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
    })
}

/// Read a document straight from the object store, bypassing the cache
async fn get_json(
    State(state): State<SharedState>,
    Query(query): Query<JsonQuery>,
) -> Result<Json<Value>, ApiError> {
    let document = match query.key {
        Some(key) => state.reader.read_key(&key).await?,
        None => state.reader.read_default().await?,
    };
    Ok(Json(document))
}

async fn scheduler_status(State(state): State<SharedState>) -> Json<SchedulerStatusResponse> {
    let stats = state.cache.stats();

    Json(SchedulerStatusResponse {
        scheduler_running: state.scheduler.is_running(),
        scheduler_state: state.scheduler.state(),
        successful_loads: stats.successful_loads,
        failed_loads: stats.failed_loads,
        last_update_time: stats.last_update_time,
        has_data: stats.has_data,
    })
}

async fn cached_data(State(state): State<SharedState>) -> Response {
    match state.cache.read() {
        Some(cached) => (StatusCode::OK, Json(cached.document.clone())).into_response(),
        None => (
            StatusCode::NO_CONTENT,
            Json(MessageResponse {
                message: "No data available in cache. The scheduler may still be loading initial data."
                    .to_string(),
                timestamp: None,
            }),
        )
            .into_response(),
    }
}

async fn trigger_load(State(state): State<SharedState>) -> Response {
    let success = state.scheduler.trigger_manual_load().await;
    let timestamp = Utc::now();

    if success {
        let stats = state.cache.stats();
        let body = TriggerLoadResponse {
            success: true,
            message: "Data loaded successfully".to_string(),
            timestamp,
            stats: Some(LoadStats {
                successful_loads: stats.successful_loads,
                failed_loads: stats.failed_loads,
                last_update_time: stats.last_update_time,
            }),
        };
        (StatusCode::OK, Json(body)).into_response()
    } else {
        let body = TriggerLoadResponse {
            success: false,
            message: "Failed to load data from object store".to_string(),
            timestamp,
            stats: None,
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

async fn clear_cache(State(state): State<SharedState>) -> Json<MessageResponse> {
    state.cache.clear();

    Json(MessageResponse {
        message: "Cache cleared successfully".to_string(),
        timestamp: Some(Utc::now()),
    })
}

async fn scheduler_health(State(state): State<SharedState>) -> Response {
    let stats = state.cache.stats();
    let running = state.scheduler.is_running();

    let (status, code, warning) = if stats.successful_loads == 0 && stats.failed_loads > 0 {
        warn!(
            failed_loads = stats.failed_loads,
            "No successful loads, only failures detected"
        );
        (
            HealthStatus::Degraded,
            StatusCode::OK,
            Some("No successful loads, only failures detected".to_string()),
        )
    } else if running {
        (HealthStatus::Up, StatusCode::OK, None)
    } else {
        (HealthStatus::Down, StatusCode::SERVICE_UNAVAILABLE, None)
    };

    let body = SchedulerHealthResponse {
        status,
        scheduler_running: running,
        last_successful_update: stats.last_update_time,
        warning,
    };

    (code, Json(body)).into_response()
}
