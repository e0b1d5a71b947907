//! Agent Archetypes
//!
//! Named desire-weight configurations. The decision logic behind each
//! archetype lives in sim-core; this is only the vocabulary used by
//! configuration, summaries, and the chronicle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named, fixed decision-policy configuration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    /// Always cooperates
    Pusilanime,
    /// Always exploits
    Thief,
    /// Uniform random action
    Random,
    /// Mirrors the majority action of its group
    TipForTap,
    /// Mirror, but never initiates exploitation
    TipForTapSecure,
    /// Adaptive based on group reputation
    Abr,
    /// Bounded lookahead over hypothetical futures
    Search,
    /// Refuses to act alongside known betrayers
    Resentful,
    /// Picks whatever has paid best historically
    Explote,
}

impl Archetype {
    /// Returns all archetype variants.
    pub fn all() -> &'static [Archetype] {
        &[
            Archetype::Pusilanime,
            Archetype::Thief,
            Archetype::Random,
            Archetype::TipForTap,
            Archetype::TipForTapSecure,
            Archetype::Abr,
            Archetype::Search,
            Archetype::Resentful,
            Archetype::Explote,
        ]
    }

    /// Stable name used in summary records and the chronicle.
    pub fn name(self) -> &'static str {
        match self {
            Archetype::Pusilanime => "Pusilanime",
            Archetype::Thief => "Thief",
            Archetype::Random => "Random",
            Archetype::TipForTap => "TipForTap",
            Archetype::TipForTapSecure => "TipForTapSecure",
            Archetype::Abr => "ABR",
            Archetype::Search => "Search",
            Archetype::Resentful => "Resentful",
            Archetype::Explote => "Explote",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_covers_every_name_once() {
        let names: Vec<&str> = Archetype::all().iter().map(|a| a.name()).collect();
        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len());
        assert_eq!(names.len(), 9);
    }
}
