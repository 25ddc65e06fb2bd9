//! Object Fetcher
//!
//! Fetches raw object bytes by key from a remote object store.
//! Supports S3 (and S3-compatible stores) through OpenDAL, and plain
//! HTTP GET against a base URL.

pub mod error;
pub mod fetcher;
pub mod http;
pub mod operator;

pub use error::{FetchError, Result};
pub use fetcher::BlobFetcher;
pub use http::HttpObjectFetcher;
pub use operator::{OperatorFetcher, S3FetcherConfig};
