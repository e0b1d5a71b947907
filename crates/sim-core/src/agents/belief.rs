//! Belief State
//!
//! An agent's private view of the world, transitioned only by the daily
//! `update_beliefs` call: per-peer trust, last observed actions, known
//! betrayers, and the agent's own action-outcome history.

use sim_events::{Action, AgentId};
use std::collections::{HashMap, HashSet};

/// Constants of private belief drift.
pub mod belief_constants {
    /// Trust toward a peer before any observation
    pub const DEFAULT_PEER_TRUST: f64 = 50.0;
    /// Lower private trust bound
    pub const TRUST_FLOOR: f64 = 0.0;
    /// Upper private trust bound
    pub const TRUST_CEILING: f64 = 100.0;
    /// Private trust shift for an observed cooperation
    pub const COOP_DELTA: f64 = 10.0;
    /// Private trust shift for observed inaction
    pub const INACT_DELTA: f64 = 3.0;
    /// Private trust shift for an observed exploit
    pub const EXPLOIT_DELTA: f64 = -30.0;
}

use belief_constants::*;

/// Everything an agent privately believes about the world.
#[derive(Debug, Clone, Default)]
pub struct BeliefState {
    /// Private trust per peer; absent peers default to 50
    trust: HashMap<AgentId, f64>,
    /// Own balance as of the last update
    pub balance: i64,
    /// Current day as of the last update
    pub day: u64,
    /// Peers ever seen exploiting in one of this agent's own groups
    betrayers: HashSet<AgentId>,
    /// Own action -> resource delta history
    outcomes: Vec<(Action, i64)>,
    /// Last observed action per peer
    last_seen: HashMap<AgentId, Action>,
}

impl BeliefState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Private trust toward `peer`, defaulting to 50 for strangers.
    pub fn trust_toward(&self, peer: AgentId) -> f64 {
        self.trust.get(&peer).copied().unwrap_or(DEFAULT_PEER_TRUST)
    }

    /// The private trust map, for lookahead snapshots.
    pub fn trust_snapshot(&self) -> HashMap<AgentId, f64> {
        self.trust.clone()
    }

    /// Records one observed action: remembers it as the peer's latest and
    /// shifts private trust, clamped to [0, 100].
    pub fn observe(&mut self, peer: AgentId, action: Action) {
        self.last_seen.insert(peer, action);
        let entry = self.trust.entry(peer).or_insert(DEFAULT_PEER_TRUST);
        *entry = (*entry + trust_delta(action)).clamp(TRUST_FLOOR, TRUST_CEILING);
    }

    /// The last action this agent saw `peer` take, if any.
    pub fn last_seen(&self, peer: AgentId) -> Option<Action> {
        self.last_seen.get(&peer).copied()
    }

    pub fn mark_betrayer(&mut self, peer: AgentId) {
        self.betrayers.insert(peer);
    }

    pub fn is_betrayer(&self, peer: AgentId) -> bool {
        self.betrayers.contains(&peer)
    }

    /// Appends one own-action outcome for outcome-seeking policies.
    pub fn record_outcome(&mut self, action: Action, delta: i64) {
        self.outcomes.push((action, delta));
    }

    /// Mean historical resource delta for `action`; `None` when untried.
    pub fn mean_outcome(&self, action: Action) -> Option<f64> {
        let deltas: Vec<i64> = self
            .outcomes
            .iter()
            .filter(|(a, _)| *a == action)
            .map(|(_, d)| *d)
            .collect();
        if deltas.is_empty() {
            return None;
        }
        Some(deltas.iter().sum::<i64>() as f64 / deltas.len() as f64)
    }
}

/// Private trust shift for one observed action.
pub fn trust_delta(action: Action) -> f64 {
    match action {
        Action::Coop => COOP_DELTA,
        Action::Inact => INACT_DELTA,
        Action::Exploit => EXPLOIT_DELTA,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stranger_defaults_to_fifty() {
        let beliefs = BeliefState::new();
        assert_eq!(beliefs.trust_toward(7), 50.0);
        assert_eq!(beliefs.last_seen(7), None);
    }

    #[test]
    fn test_observation_shifts_trust_and_clamps() {
        let mut beliefs = BeliefState::new();
        beliefs.observe(1, Action::Exploit);
        assert_eq!(beliefs.trust_toward(1), 20.0);
        beliefs.observe(1, Action::Exploit);
        assert_eq!(beliefs.trust_toward(1), 0.0);
        assert_eq!(beliefs.last_seen(1), Some(Action::Exploit));

        for _ in 0..12 {
            beliefs.observe(1, Action::Coop);
        }
        assert_eq!(beliefs.trust_toward(1), 100.0);
    }

    #[test]
    fn test_mean_outcome() {
        let mut beliefs = BeliefState::new();
        assert_eq!(beliefs.mean_outcome(Action::Coop), None);
        beliefs.record_outcome(Action::Coop, 10);
        beliefs.record_outcome(Action::Coop, 30);
        beliefs.record_outcome(Action::Exploit, -5);
        assert_eq!(beliefs.mean_outcome(Action::Coop), Some(20.0));
        assert_eq!(beliefs.mean_outcome(Action::Exploit), Some(-5.0));
    }

    #[test]
    fn test_betrayers_accumulate() {
        let mut beliefs = BeliefState::new();
        assert!(!beliefs.is_betrayer(4));
        beliefs.mark_betrayer(4);
        assert!(beliefs.is_betrayer(4));
    }
}
