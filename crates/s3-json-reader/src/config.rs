//! Configuration loaded from environment variables

use crate::error::{ReaderError, Result};
use crate::scheduler::SchedulerConfig;
use object_fetcher::{BlobFetcher, HttpObjectFetcher, OperatorFetcher, S3FetcherConfig};
use std::env;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_JSON_KEY: &str = "data.json";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Where documents are fetched from
#[derive(Debug, Clone)]
pub enum BackendConfig {
    S3(S3FetcherConfig),
    Http { base_url: String, timeout: Duration },
}

impl BackendConfig {
    /// Construct the fetcher for this backend
    pub fn build_fetcher(&self) -> Result<Arc<dyn BlobFetcher>> {
        let fetcher: Arc<dyn BlobFetcher> = match self {
            BackendConfig::S3(config) => Arc::new(OperatorFetcher::s3(config)?),
            BackendConfig::Http { base_url, timeout } => {
                Arc::new(HttpObjectFetcher::new(base_url.clone(), *timeout)?)
            }
        };
        Ok(fetcher)
    }
}

/// Application configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub backend: BackendConfig,
    pub json_file_key: String,
    pub scheduler: SchedulerConfig,
}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Parse configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |name: &str| lookup(name).and_then(|v| v.trim().parse::<u64>().ok());

        let port = lookup("PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let timeout =
            Duration::from_secs(parsed("FETCH_TIMEOUT_SECS").unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS));

        let backend_name = lookup("OBJECT_STORE_BACKEND").unwrap_or_else(|| "s3".to_string());
        let backend = match backend_name.trim().to_ascii_lowercase().as_str() {
            "s3" => {
                let bucket = lookup("S3_BUCKET")
                    .filter(|b| !b.trim().is_empty())
                    .ok_or_else(|| {
                        ReaderError::Config("S3_BUCKET environment variable is required".to_string())
                    })?;
                let region = lookup("S3_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());

                let mut s3 = S3FetcherConfig::new(bucket, region);
                s3.endpoint = lookup("S3_ENDPOINT").filter(|e| !e.trim().is_empty());
                s3.access_key_id = lookup("AWS_ACCESS_KEY_ID");
                s3.secret_access_key = lookup("AWS_SECRET_ACCESS_KEY");
                s3.timeout = timeout;
                BackendConfig::S3(s3)
            }
            "http" => {
                let base_url = lookup("OBJECT_BASE_URL")
                    .filter(|u| !u.trim().is_empty())
                    .ok_or_else(|| {
                        ReaderError::Config(
                            "OBJECT_BASE_URL environment variable is required for the http backend"
                                .to_string(),
                        )
                    })?;
                BackendConfig::Http { base_url, timeout }
            }
            other => {
                return Err(ReaderError::Config(format!(
                    "unknown OBJECT_STORE_BACKEND '{}'; expected 's3' or 'http'",
                    other
                )))
            }
        };

        let json_file_key = lookup("JSON_FILE_KEY")
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_JSON_KEY.to_string());

        let defaults = SchedulerConfig::default();
        let scheduler = SchedulerConfig {
            enabled: lookup("SCHEDULER_ENABLED")
                .and_then(|v| v.trim().parse::<bool>().ok())
                .unwrap_or(defaults.enabled),
            initial_delay: parsed("SCHEDULER_INITIAL_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.initial_delay),
            fixed_delay: parsed("SCHEDULER_FIXED_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.fixed_delay),
            worker_pool_size: parsed("SCHEDULER_WORKER_POOL_SIZE")
                .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
                .unwrap_or(defaults.worker_pool_size),
            shutdown_grace: parsed("SHUTDOWN_GRACE_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.shutdown_grace),
            shutdown_force_wait: parsed("SHUTDOWN_FORCE_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.shutdown_force_wait),
        };

        Ok(Self {
            port,
            backend,
            json_file_key,
            scheduler,
        })
    }
}
