//! Object fetching through OpenDAL operators

use crate::error::{FetchError, Result};
use crate::fetcher::BlobFetcher;
use async_trait::async_trait;
use opendal::layers::TimeoutLayer;
use opendal::{services, ErrorKind, Operator};
use std::time::Duration;
use tracing::{debug, info};

/// Connection settings for an S3 (or S3-compatible) bucket
#[derive(Debug, Clone)]
pub struct S3FetcherConfig {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible stores such as MinIO or R2
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub timeout: Duration,
}

impl S3FetcherConfig {
    pub fn new(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: region.into(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Fetches objects from any OpenDAL operator
#[derive(Clone)]
pub struct OperatorFetcher {
    operator: Operator,
}

impl OperatorFetcher {
    /// Wrap an already configured operator
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }

    /// Build a fetcher for an S3 bucket.
    ///
    /// When no explicit credentials are given, the standard AWS environment
    /// variables and profile files are consulted.
    pub fn s3(config: &S3FetcherConfig) -> Result<Self> {
        if config.bucket.trim().is_empty() {
            return Err(FetchError::Config("S3 bucket must not be empty".to_string()));
        }

        let mut builder = services::S3::default()
            .bucket(&config.bucket)
            .region(&config.region);

        if let Some(ref endpoint) = config.endpoint {
            builder = builder.endpoint(endpoint);
        }

        match (&config.access_key_id, &config.secret_access_key) {
            (Some(key_id), Some(secret)) => {
                builder = builder.access_key_id(key_id).secret_access_key(secret);
            }
            (None, None) => {}
            _ => {
                return Err(FetchError::Config(
                    "access key id and secret access key must be set together".to_string(),
                ))
            }
        }

        let operator = Operator::new(builder)?
            .layer(TimeoutLayer::new().with_timeout(config.timeout))
            .finish();

        info!(
            bucket = %config.bucket,
            region = %config.region,
            endpoint = ?config.endpoint,
            "S3 fetcher initialized"
        );

        Ok(Self::new(operator))
    }
}

#[async_trait]
impl BlobFetcher for OperatorFetcher {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        debug!(key, "Reading object");

        let data = match self.operator.read(key).await {
            Ok(buffer) => buffer.to_vec(),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(FetchError::NotFound(key.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        debug!(key, size = data.len(), "Object read complete");
        Ok(data)
    }
}
