//! Error types for object fetching

use std::fmt;

#[derive(Debug)]
pub enum FetchError {
    Http(Box<reqwest::Error>),
    Storage(Box<opendal::Error>),
    NotFound(String),
    Status { key: String, status: u16 },
    Config(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Http(err) => write!(f, "HTTP error: {}", err),
            FetchError::Storage(err) => write!(f, "Object store error: {}", err),
            FetchError::NotFound(key) => write!(f, "Object not found: {}", key),
            FetchError::Status { key, status } => {
                write!(f, "Object store returned status {} for {}", status, key)
            }
            FetchError::Config(msg) => write!(f, "Fetcher configuration error: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Http(err) => Some(err.as_ref()),
            FetchError::Storage(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Http(Box::new(err))
    }
}

impl From<opendal::Error> for FetchError {
    fn from(err: opendal::Error) -> Self {
        FetchError::Storage(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
