//! Direct fetch-and-decode of JSON documents

use crate::error::{ReaderError, Result};
use object_fetcher::BlobFetcher;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Decode raw object bytes into a JSON value
pub fn decode_document(bytes: &[u8]) -> Result<Value> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Reads JSON documents from the object store without caching
#[derive(Clone)]
pub struct JsonReader {
    fetcher: Arc<dyn BlobFetcher>,
    default_key: String,
}

impl JsonReader {
    pub fn new(fetcher: Arc<dyn BlobFetcher>, default_key: impl Into<String>) -> Self {
        Self {
            fetcher,
            default_key: default_key.into(),
        }
    }

    /// The key used when no explicit key is requested
    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    /// Fetch and decode the default document
    pub async fn read_default(&self) -> Result<Value> {
        self.fetch_and_decode(&self.default_key).await
    }

    /// Fetch and decode the document stored under `key`
    pub async fn read_key(&self, key: &str) -> Result<Value> {
        if key.trim().is_empty() {
            error!("Invalid key provided: empty or whitespace");
            return Err(ReaderError::InvalidKey("key cannot be empty".to_string()));
        }
        self.fetch_and_decode(key).await
    }

    async fn fetch_and_decode(&self, key: &str) -> Result<Value> {
        debug!(key, "Reading JSON document");

        let bytes = self.fetcher.fetch(key).await.map_err(|e| {
            error!(key, error = %e, "Failed to fetch document");
            ReaderError::from(e)
        })?;

        let document = decode_document(&bytes).map_err(|e| {
            error!(key, size = bytes.len(), error = %e, "Failed to decode document");
            e
        })?;

        info!(key, size = bytes.len(), "Read and decoded JSON document");
        Ok(document)
    }
}
