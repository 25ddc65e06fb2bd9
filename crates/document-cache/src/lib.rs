//! Single-document cache with lock-free snapshots
//!
//! Holds the most recently loaded JSON document together with the time it
//! was loaded, plus lifetime success/failure counters. Readers never block
//! writers, and the document and its timestamp are always swapped as one
//! value.

mod cache;
mod types;

pub use cache::CacheStore;
pub use types::{CacheStats, CachedDocument};
