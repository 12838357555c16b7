//! File-backed storage for history and incident records.
//!
//! Every record is a standalone JSON file so damage to one never spreads
//! to another.

mod history;
mod incidents;
mod models;

pub use history::*;
pub use incidents::*;
pub use models::*;

use thiserror::Error;

/// Storage error types.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
