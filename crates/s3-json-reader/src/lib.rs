//! Periodic JSON loader
//!
//! Fetches a single JSON document from an object store on a fixed-delay
//! schedule, keeps the latest good copy in memory, and serves it together
//! with load statistics over HTTP.

pub mod config;
pub mod error;
pub mod reader;
pub mod scheduler;
pub mod server;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::{BackendConfig, Config};
pub use error::{ApiError, ReaderError, Result};
pub use reader::{decode_document, JsonReader};
pub use scheduler::{LifecycleState, RefreshScheduler, SchedulerConfig};
pub use server::{create_router, start_server, ServerState, SharedState};
