//! The fetcher abstraction shared by all backends

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Fetches the raw bytes stored under a key.
///
/// Implementations own their own timeouts; a call is expected to either
/// return or fail within a bounded time.
#[async_trait]
pub trait BlobFetcher: Send + Sync {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>>;
}

#[async_trait]
impl<T: BlobFetcher + ?Sized> BlobFetcher for Arc<T> {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        (**self).fetch(key).await
    }
}
