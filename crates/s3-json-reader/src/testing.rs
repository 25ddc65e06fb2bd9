//! In-process fetchers for tests

use async_trait::async_trait;
use object_fetcher::{BlobFetcher, FetchError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Serves fixed objects from memory and records requested keys
#[derive(Default)]
pub struct StaticFetcher {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    requested: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: &str, body: &str) -> Self {
        self.set(key, body);
        self
    }

    pub fn set(&self, key: &str, body: &str) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), body.as_bytes().to_vec());
    }

    pub fn remove(&self, key: &str) {
        self.objects.lock().unwrap().remove(key);
    }

    pub fn requested_keys(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobFetcher for StaticFetcher {
    async fn fetch(&self, key: &str) -> object_fetcher::Result<Vec<u8>> {
        self.requested.lock().unwrap().push(key.to_string());
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(key.to_string()))
    }
}

/// Always fails as if the object store were unavailable
pub struct FailingFetcher;

#[async_trait]
impl BlobFetcher for FailingFetcher {
    async fn fetch(&self, key: &str) -> object_fetcher::Result<Vec<u8>> {
        Err(FetchError::Status {
            key: key.to_string(),
            status: 503,
        })
    }
}

/// Panics on every fetch
pub struct PanickingFetcher;

#[async_trait]
impl BlobFetcher for PanickingFetcher {
    async fn fetch(&self, _key: &str) -> object_fetcher::Result<Vec<u8>> {
        panic!("fetcher exploded");
    }
}

/// Takes `delay` to return `body`, tracking how many fetches overlap
pub struct SlowFetcher {
    delay: Duration,
    body: Vec<u8>,
    started: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl SlowFetcher {
    pub fn new(delay: Duration, body: &str) -> Self {
        Self {
            delay,
            body: body.as_bytes().to_vec(),
            started: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlobFetcher for SlowFetcher {
    async fn fetch(&self, _key: &str) -> object_fetcher::Result<Vec<u8>> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        sleep(self.delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(self.body.clone())
    }
}

/// Poll `condition` until it holds or `timeout` elapses
pub async fn wait_until<F>(timeout: Duration, condition: F) -> bool
where
    F: Fn() -> bool,
{
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        sleep(Duration::from_millis(10)).await;
    }
    condition()
}
