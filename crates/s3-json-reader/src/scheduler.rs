//! Background refresh of the cached document
//!
//! The [`RefreshScheduler`] owns a single periodic task that loads the
//! default document on a fixed-delay cadence and stores it in the shared
//! [`CacheStore`]. Manual loads run on the caller's task and share the same
//! worker permits. Failed loads are counted and logged but never stop the
//! schedule.

use crate::error::{ReaderError, Result};
use crate::reader::JsonReader;
use document_cache::{CacheStats, CacheStore};
use futures::FutureExt;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const DEFAULT_FIXED_DELAY: Duration = Duration::from_secs(30);
const DEFAULT_WORKER_POOL_SIZE: usize = 2;
const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);
const DEFAULT_SHUTDOWN_FORCE_WAIT: Duration = Duration::from_secs(5);

/// Scheduler settings
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Whether the periodic task is started at all
    pub enabled: bool,
    pub initial_delay: Duration,
    /// Pause between the end of one tick and the start of the next
    pub fixed_delay: Duration,
    /// Maximum number of loads (periodic and manual) running at once
    pub worker_pool_size: usize,
    /// How long shutdown waits for an in-flight tick
    pub shutdown_grace: Duration,
    /// How long shutdown waits after aborting the task
    pub shutdown_force_wait: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_delay: Duration::ZERO,
            fixed_delay: DEFAULT_FIXED_DELAY,
            worker_pool_size: DEFAULT_WORKER_POOL_SIZE,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
            shutdown_force_wait: DEFAULT_SHUTDOWN_FORCE_WAIT,
        }
    }
}

/// Lifecycle of the periodic task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    NotStarted,
    Running,
    ShuttingDown,
    Stopped,
}

/// Performs one load attempt and records its outcome in the cache
struct Loader {
    reader: JsonReader,
    cache: Arc<CacheStore>,
    permits: Semaphore,
}

impl Loader {
    async fn refresh(&self, trigger: &'static str) -> bool {
        // The semaphore is never closed, so acquire only fails if that changes.
        let _permit = self.permits.acquire().await.ok();

        match AssertUnwindSafe(self.reader.read_default())
            .catch_unwind()
            .await
        {
            Ok(Ok(document)) => {
                self.cache.update(document);
                let stats = self.cache.stats();
                info!(
                    trigger,
                    key = self.reader.default_key(),
                    successful_loads = stats.successful_loads,
                    failed_loads = stats.failed_loads,
                    "Loaded and cached document"
                );
                true
            }
            Ok(Err(e)) => {
                self.cache.record_failure();
                error!(
                    trigger,
                    key = self.reader.default_key(),
                    error = %e,
                    "Failed to load document"
                );
                false
            }
            Err(_) => {
                self.cache.record_failure();
                error!(
                    trigger,
                    key = self.reader.default_key(),
                    "Document load panicked"
                );
                false
            }
        }
    }
}

/// Runs the periodic refresh task and on-demand loads
pub struct RefreshScheduler {
    config: SchedulerConfig,
    loader: Arc<Loader>,
    state: Mutex<LifecycleState>,
    task: Mutex<Option<JoinHandle<()>>>,
    cancel: CancellationToken,
    shutdown_lock: tokio::sync::Mutex<()>,
}

impl RefreshScheduler {
    /// Create a scheduler; nothing runs until [`start`](Self::start)
    pub fn new(config: SchedulerConfig, reader: JsonReader, cache: Arc<CacheStore>) -> Result<Self> {
        if config.worker_pool_size == 0 {
            return Err(ReaderError::SchedulerStartup(
                "worker pool size must be at least 1".to_string(),
            ));
        }
        if config.worker_pool_size > Semaphore::MAX_PERMITS {
            return Err(ReaderError::SchedulerStartup(format!(
                "worker pool size must be at most {}",
                Semaphore::MAX_PERMITS
            )));
        }
        if config.fixed_delay.is_zero() {
            return Err(ReaderError::SchedulerStartup(
                "fixed delay must be greater than zero".to_string(),
            ));
        }

        let loader = Loader {
            reader,
            cache,
            permits: Semaphore::new(config.worker_pool_size),
        };

        Ok(Self {
            config,
            loader: Arc::new(loader),
            state: Mutex::new(LifecycleState::NotStarted),
            task: Mutex::new(None),
            cancel: CancellationToken::new(),
            shutdown_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Start the periodic task. Does nothing when the scheduler is disabled.
    pub fn start(&self) -> Result<()> {
        if !self.config.enabled {
            info!("Refresh scheduler is disabled, skipping start");
            return Ok(());
        }

        let mut state = lock(&self.state);
        match *state {
            LifecycleState::NotStarted => {}
            LifecycleState::Running => {
                debug!("Refresh scheduler already running");
                return Ok(());
            }
            LifecycleState::ShuttingDown | LifecycleState::Stopped => {
                return Err(ReaderError::SchedulerStartup(
                    "scheduler has been shut down and cannot be restarted".to_string(),
                ));
            }
        }

        info!(
            initial_delay_ms = self.config.initial_delay.as_millis() as u64,
            fixed_delay_ms = self.config.fixed_delay.as_millis() as u64,
            worker_pool_size = self.config.worker_pool_size,
            "Starting refresh scheduler"
        );

        let handle = tokio::spawn(periodic_refresh(
            self.loader.clone(),
            self.config.initial_delay,
            self.config.fixed_delay,
            self.cancel.clone(),
        ));
        *lock(&self.task) = Some(handle);
        *state = LifecycleState::Running;

        Ok(())
    }

    /// Load the document now, outside the periodic cadence.
    ///
    /// Available whether or not the periodic task was started.
    pub async fn trigger_manual_load(&self) -> bool {
        info!("Manual document load triggered");
        self.loader.refresh("manual").await
    }

    pub fn is_running(&self) -> bool {
        self.state() == LifecycleState::Running
    }

    pub fn state(&self) -> LifecycleState {
        *lock(&self.state)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.loader.cache.stats()
    }

    /// Stop the periodic task.
    ///
    /// No new ticks start once this is called. An in-flight tick gets
    /// `shutdown_grace` to finish; after that the task is aborted and
    /// awaited for `shutdown_force_wait`. Safe to call more than once;
    /// concurrent callers wait for the first to finish.
    pub async fn shutdown(&self) -> Result<()> {
        let _guard = self.shutdown_lock.lock().await;

        let handle = {
            let mut state = lock(&self.state);
            match *state {
                LifecycleState::Stopped => {
                    debug!("Refresh scheduler already stopped");
                    return Ok(());
                }
                LifecycleState::NotStarted => {
                    *state = LifecycleState::Stopped;
                    self.cancel.cancel();
                    debug!("Refresh scheduler was never started");
                    return Ok(());
                }
                LifecycleState::Running | LifecycleState::ShuttingDown => {
                    *state = LifecycleState::ShuttingDown;
                }
            }
            lock(&self.task).take()
        };

        info!("Shutting down refresh scheduler");
        self.cancel.cancel();

        let result = match handle {
            Some(handle) => {
                stop_task(
                    handle,
                    self.config.shutdown_grace,
                    self.config.shutdown_force_wait,
                )
                .await
            }
            None => Ok(()),
        };

        *lock(&self.state) = LifecycleState::Stopped;
        info!("Refresh scheduler stopped");

        result
    }
}

async fn periodic_refresh(
    loader: Arc<Loader>,
    initial_delay: Duration,
    fixed_delay: Duration,
    cancel: CancellationToken,
) {
    tokio::select! {
        _ = cancel.cancelled() => {
            debug!("Refresh task cancelled before first tick");
            return;
        }
        _ = sleep(initial_delay) => {}
    }

    loop {
        if cancel.is_cancelled() {
            break;
        }

        debug!("Starting scheduled document load");
        loader.refresh("scheduled").await;

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = sleep(fixed_delay) => {}
        }
    }

    debug!("Refresh task finished");
}

async fn stop_task(
    mut handle: JoinHandle<()>,
    grace: Duration,
    force_wait: Duration,
) -> Result<()> {
    match timeout(grace, &mut handle).await {
        Ok(Ok(())) => return Ok(()),
        Ok(Err(e)) => {
            error!(error = %e, "Refresh task ended abnormally");
            return Ok(());
        }
        Err(_) => {
            warn!(
                grace_secs = grace.as_secs_f64(),
                "Refresh task did not finish in time, forcing shutdown"
            );
        }
    }

    handle.abort();

    match timeout(force_wait, handle).await {
        Ok(_) => Ok(()),
        Err(_) => {
            let err = ReaderError::ShutdownTimeout(force_wait);
            error!(error = %err, "Refresh task did not terminate after forced shutdown");
            Err(err)
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
