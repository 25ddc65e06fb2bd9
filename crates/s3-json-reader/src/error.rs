//! Error types for the S3 JSON reader

use crate::types::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt;
use std::time::Duration;

#[derive(Debug)]
pub enum ReaderError {
    Fetch(object_fetcher::FetchError),
    Decode(Box<serde_json::Error>),
    InvalidKey(String),
    SchedulerStartup(String),
    ShutdownTimeout(Duration),
    Config(String),
    Io(Box<std::io::Error>),
}

impl fmt::Display for ReaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReaderError::Fetch(err) => write!(f, "Failed to read JSON from object store: {}", err),
            ReaderError::Decode(err) => write!(f, "Malformed JSON document: {}", err),
            ReaderError::InvalidKey(msg) => write!(f, "Invalid key: {}", msg),
            ReaderError::SchedulerStartup(msg) => write!(f, "Scheduler startup error: {}", msg),
            ReaderError::ShutdownTimeout(waited) => write!(
                f,
                "Scheduler did not stop within {:?} after forced shutdown",
                waited
            ),
            ReaderError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ReaderError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for ReaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReaderError::Fetch(err) => Some(err),
            ReaderError::Decode(err) => Some(err.as_ref()),
            ReaderError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<object_fetcher::FetchError> for ReaderError {
    fn from(err: object_fetcher::FetchError) -> Self {
        ReaderError::Fetch(err)
    }
}

impl From<serde_json::Error> for ReaderError {
    fn from(err: serde_json::Error) -> Self {
        ReaderError::Decode(Box::new(err))
    }
}

impl From<std::io::Error> for ReaderError {
    fn from(err: std::io::Error) -> Self {
        ReaderError::Io(Box::new(err))
    }
}

impl From<tracing_subscriber::filter::ParseError> for ReaderError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        ReaderError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReaderError>;

/// Error type that converts to HTTP responses
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(error = %msg, "Bad request");
                (StatusCode::BAD_REQUEST, msg)
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, axum::Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<ReaderError> for ApiError {
    fn from(err: ReaderError) -> Self {
        match err {
            ReaderError::InvalidKey(_) => ApiError::BadRequest(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
