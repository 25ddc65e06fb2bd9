//! Plain HTTP object fetching

use crate::error::{FetchError, Result};
use crate::fetcher::BlobFetcher;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// Fetches objects with `GET {base_url}/{key}`.
///
/// Suitable for public buckets and gateways that expose objects over
/// unauthenticated HTTP.
pub struct HttpObjectFetcher {
    client: Client,
    base_url: String,
}

impl HttpObjectFetcher {
    /// Create a fetcher for `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(FetchError::Config("base URL must not be empty".to_string()));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the object URL for a key, percent-encoding each path segment
    pub fn object_url(&self, key: &str) -> String {
        let path = key
            .trim_start_matches('/')
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl BlobFetcher for HttpObjectFetcher {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        let url = self.object_url(key);
        debug!(url = %url, "Fetching object over HTTP");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(key.to_string()));
        }

        if !status.is_success() {
            warn!(status = %status, url = %url, "Failed to fetch object");
            return Err(FetchError::Status {
                key: key.to_string(),
                status: status.as_u16(),
            });
        }

        let data = response.bytes().await?.to_vec();
        debug!(key, size = data.len(), "Fetched object over HTTP");

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::StatusCode as AxumStatus, routing::get, Router};

    async fn serve_objects() -> String {
        async fn object(Path(path): Path<String>) -> Result<Vec<u8>, AxumStatus> {
            match path.as_str() {
                "data.json" => Ok(br#"{"a":1}"#.to_vec()),
                "nested/dir/report 1.json" => Ok(br#"{"nested":true}"#.to_vec()),
                "forbidden.json" => Err(AxumStatus::FORBIDDEN),
                _ => Err(AxumStatus::NOT_FOUND),
            }
        }

        let router = Router::new().route("/bucket/{*path}", get(object));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        format!("http://{}/bucket/", addr)
    }

    #[test]
    fn test_object_url_encodes_segments() {
        let fetcher =
            HttpObjectFetcher::new("https://objects.example.com/", Duration::from_secs(1))
                .unwrap();

        assert_eq!(
            fetcher.object_url("/reports/2024 q1/data.json"),
            "https://objects.example.com/reports/2024%20q1/data.json"
        );
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let result = HttpObjectFetcher::new("  ", Duration::from_secs(1));
        assert!(matches!(result, Err(FetchError::Config(_))));
    }

    #[tokio::test]
    async fn test_fetch_existing_object() {
        let base = serve_objects().await;
        let fetcher = HttpObjectFetcher::new(base, Duration::from_secs(5)).unwrap();

        let data = fetcher.fetch("data.json").await.unwrap();
        assert_eq!(data, br#"{"a":1}"#.to_vec());

        let nested = fetcher.fetch("nested/dir/report 1.json").await.unwrap();
        assert_eq!(nested, br#"{"nested":true}"#.to_vec());
    }

    #[tokio::test]
    async fn test_fetch_missing_object() {
        let base = serve_objects().await;
        let fetcher = HttpObjectFetcher::new(base, Duration::from_secs(5)).unwrap();

        let err = fetcher.fetch("missing.json").await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound(ref key) if key == "missing.json"));
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let base = serve_objects().await;
        let fetcher = HttpObjectFetcher::new(base, Duration::from_secs(5)).unwrap();

        let err = fetcher.fetch("forbidden.json").await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 403, .. }));
    }
}
