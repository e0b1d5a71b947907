//! Shared vocabulary and record types for the commons simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for all other crates in the workspace.

pub mod action;
pub mod archetype;
pub mod chronicle;
pub mod event;
pub mod summary;

// Re-export the vocabulary
pub use action::{Action, EventType};
pub use archetype::Archetype;

// Re-export event types
pub use event::{AgentId, Event, EventView};

// Re-export record types
pub use chronicle::ChronicleEntry;
pub use summary::DaySummary;
