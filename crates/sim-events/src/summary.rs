//! Day Summary Records
//!
//! One structured record per simulated day, exported as JSONL for offline
//! tabular analysis.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::archetype::Archetype;

/// Per-day population and resource statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    /// Day index, starting at 1
    pub day: u64,
    /// Mean resource balance among the living
    pub avg_resources: f64,
    /// Cumulative count of exploit decisions since day 1
    pub total_thefts: u64,
    /// Number of agents alive after settlement
    pub agents_alive: usize,
    /// Living population count per archetype
    pub archetype_counts: BTreeMap<Archetype, usize>,
    /// Mean resource balance per archetype (living members only)
    pub archetype_avg_resources: BTreeMap<Archetype, f64>,
}

impl DaySummary {
    /// Mean resources for one archetype, `0.0` when extinct.
    pub fn avg_for(&self, archetype: Archetype) -> f64 {
        self.archetype_avg_resources
            .get(&archetype)
            .copied()
            .unwrap_or(0.0)
    }

    /// Living population for one archetype, `0` when extinct.
    pub fn count_for(&self, archetype: Archetype) -> usize {
        self.archetype_counts.get(&archetype).copied().unwrap_or(0)
    }
}
