//! Core simulation logic: payoffs, trust, grouping, events, agents,
//! environment, and the day loop.

pub mod agents;
pub mod config;
pub mod environment;
pub mod events;
pub mod grouping;
pub mod output;
pub mod payoff;
pub mod rng;
pub mod setup;
pub mod simulator;
pub mod trust;

pub use agents::Agent;
pub use config::SimConfig;
pub use environment::Environment;
pub use simulator::{RunReport, Simulator};
