//! Output Writers
//!
//! Exports consumed by the excluded collaborators: the JSONL day-summary
//! feed for offline tabular analysis and the plain-text chronicle consumed
//! by the narrative service. Both are observational; neither feeds back
//! into the simulation.

pub mod chronicle;
pub mod summary;

pub use chronicle::Chronicle;
pub use summary::SummaryWriter;

use thiserror::Error;

/// Errors raised while writing run outputs.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("output io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("output serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
