//! Action Vocabulary
//!
//! The moves an agent can declare in a cooperation event, and the two kinds
//! of day event.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A participant's declared move in a cooperation event.
///
/// Declaration order matters: weighted-intention tie-breaks resolve to the
/// first maximal action in this order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Contribute to the group's share of the pool
    Coop,
    /// Take from cooperators without contributing
    Exploit,
    /// Sit the interaction out
    Inact,
}

impl Action {
    /// Number of action variants, for dense per-action tallies.
    pub const COUNT: usize = 3;

    /// Returns all action variants in declaration order.
    pub fn all() -> &'static [Action] {
        &[Action::Coop, Action::Exploit, Action::Inact]
    }

    /// Dense index of this action, matching declaration order.
    pub fn index(self) -> usize {
        match self {
            Action::Coop => 0,
            Action::Exploit => 1,
            Action::Inact => 2,
        }
    }

    /// Inverse of [`Action::index`]. Out-of-range indices wrap to `Inact`.
    pub fn from_index(index: usize) -> Action {
        match index {
            0 => Action::Coop,
            1 => Action::Exploit,
            _ => Action::Inact,
        }
    }

    /// Upper-case label used in the plain-text chronicle.
    pub fn label(self) -> &'static str {
        match self {
            Action::Coop => "COOP",
            Action::Exploit => "EXPLOIT",
            Action::Inact => "INACT",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind of day event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Grouped multiplayer dilemma: every group settles the pool through
    /// declared actions.
    Coop,
    /// No decisions: a random subset of the living splits the pool evenly.
    Special,
}

impl EventType {
    /// Upper-case label used in the plain-text chronicle.
    pub fn label(self) -> &'static str {
        match self {
            EventType::Coop => "COOP",
            EventType::Special => "SPECIAL",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_index_round_trip() {
        for &action in Action::all() {
            assert_eq!(Action::from_index(action.index()), action);
        }
    }

    #[test]
    fn test_declaration_order() {
        // Intention tie-breaking depends on this exact order.
        assert_eq!(
            Action::all(),
            &[Action::Coop, Action::Exploit, Action::Inact]
        );
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Action::Exploit).unwrap();
        assert_eq!(json, "\"exploit\"");
        let back: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Action::Exploit);
    }
}
