//! Trust & Reputation Store
//!
//! Dense, id-indexed pairwise trust plus the publicly inferable reputation
//! scalar. Trust drifts unbounded through small pairwise increments;
//! reputation is clamped to [0, 100]. A seen-bitset distinguishes a lazily
//! defaulted reputation from an observed one.

use sim_events::{Action, AgentId};
use std::collections::BTreeMap;

/// Constants governing trust and reputation drift.
pub mod trust_constants {
    /// Trust toward a peer before any interaction
    pub const DEFAULT_TRUST: f64 = 50.0;
    /// Reputation seeded on first observed action
    pub const DEFAULT_REPUTATION: f64 = 50.0;
    /// Lower reputation bound
    pub const REPUTATION_FLOOR: f64 = 0.0;
    /// Upper reputation bound
    pub const REPUTATION_CEILING: f64 = 100.0;
    /// Pairwise trust shift after observing a cooperation
    pub const TRUST_COOP_DELTA: f64 = 0.1;
    /// Pairwise trust shift after observing inaction
    pub const TRUST_INACT_DELTA: f64 = 0.05;
    /// Pairwise trust shift after observing an exploit
    pub const TRUST_EXPLOIT_DELTA: f64 = -0.2;
    /// Reputation shift for a cooperation
    pub const REP_COOP_DELTA: f64 = 10.0;
    /// Reputation shift for inaction
    pub const REP_INACT_DELTA: f64 = 3.0;
    /// Reputation shift for an exploit
    pub const REP_EXPLOIT_DELTA: f64 = -30.0;
}

use trust_constants::*;

/// Pairwise trust matrix and per-agent global reputation, owned by the
/// environment and sized to the maximum population ever reached.
#[derive(Debug, Clone)]
pub struct TrustStore {
    size: usize,
    /// Row-major: `matrix[i * size + j]` is i's private trust toward j
    matrix: Vec<f64>,
    reputation: Vec<f64>,
    /// Whether an agent's reputation has ever been observed
    seen: Vec<bool>,
}

impl TrustStore {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            matrix: vec![DEFAULT_TRUST; size * size],
            reputation: vec![DEFAULT_REPUTATION; size],
            seen: vec![false; size],
        }
    }

    /// Number of agents the store covers.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Extends the matrix and reputation arrays symmetrically to cover
    /// `new_size` agents, defaulting every new pair to 50.
    pub fn grow(&mut self, new_size: usize) {
        if new_size <= self.size {
            return;
        }
        let mut matrix = vec![DEFAULT_TRUST; new_size * new_size];
        for i in 0..self.size {
            let old_row = &self.matrix[i * self.size..(i + 1) * self.size];
            matrix[i * new_size..i * new_size + self.size].copy_from_slice(old_row);
        }
        self.matrix = matrix;
        self.reputation.resize(new_size, DEFAULT_REPUTATION);
        self.seen.resize(new_size, false);
        self.size = new_size;
    }

    /// i's private trust toward j.
    pub fn trust(&self, i: AgentId, j: AgentId) -> f64 {
        self.matrix[i * self.size + j]
    }

    pub fn set_trust(&mut self, i: AgentId, j: AgentId, value: f64) {
        self.matrix[i * self.size + j] = value;
    }

    /// i's trust toward j as an admission probability. Trust is unbounded,
    /// so the value is normalized by 100 and clamped into [0, 1].
    pub fn trust_probability(&self, i: AgentId, j: AgentId) -> f64 {
        (self.trust(i, j) / 100.0).clamp(0.0, 1.0)
    }

    /// Current reputation, defaulting to 50 when never observed.
    pub fn reputation(&self, agent: AgentId) -> f64 {
        self.reputation[agent]
    }

    /// Whether `agent`'s reputation reflects at least one observed action.
    pub fn reputation_seen(&self, agent: AgentId) -> bool {
        self.seen[agent]
    }

    /// All reputations, id-indexed, for the end-of-run report.
    pub fn reputations(&self) -> &[f64] {
        &self.reputation
    }

    /// Applies the public reputation update for one observed action.
    pub fn record_action(&mut self, agent: AgentId, action: Action) {
        self.seen[agent] = true;
        let delta = match action {
            Action::Coop => REP_COOP_DELTA,
            Action::Inact => REP_INACT_DELTA,
            Action::Exploit => REP_EXPLOIT_DELTA,
        };
        self.reputation[agent] =
            (self.reputation[agent] + delta).clamp(REPUTATION_FLOOR, REPUTATION_CEILING);
    }

    /// Shifts `observer`'s trust toward `target` for one revealed action.
    /// No clamp: trust drifts unbounded in either direction.
    pub fn update_pair(&mut self, observer: AgentId, target: AgentId, action: Action) {
        let delta = match action {
            Action::Coop => TRUST_COOP_DELTA,
            Action::Inact => TRUST_INACT_DELTA,
            Action::Exploit => TRUST_EXPLOIT_DELTA,
        };
        self.matrix[observer * self.size + target] += delta;
    }

    /// Applies the post-reveal trust shifts for every ordered pair within a
    /// group.
    pub fn apply_group_reveal(&mut self, group: &[AgentId], decisions: &BTreeMap<AgentId, Action>) {
        for &observer in group {
            for &target in group {
                if observer == target {
                    continue;
                }
                if let Some(&action) = decisions.get(&target) {
                    self.update_pair(observer, target, action);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_exploit_drops_reputation_to_twenty() {
        let mut store = TrustStore::new(3);
        assert!(!store.reputation_seen(1));
        store.record_action(1, Action::Exploit);
        assert!(store.reputation_seen(1));
        assert_eq!(store.reputation(1), 20.0);
    }

    #[test]
    fn test_reputation_clamps_both_ends() {
        let mut store = TrustStore::new(1);
        store.record_action(0, Action::Exploit);
        store.record_action(0, Action::Exploit);
        assert_eq!(store.reputation(0), 0.0);
        for _ in 0..20 {
            store.record_action(0, Action::Coop);
        }
        assert_eq!(store.reputation(0), 100.0);
    }

    #[test]
    fn test_trust_is_unclamped() {
        let mut store = TrustStore::new(2);
        for _ in 0..300 {
            store.update_pair(0, 1, Action::Exploit);
        }
        assert!(store.trust(0, 1) < 0.0);
        assert_eq!(store.trust_probability(0, 1), 0.0);
    }

    #[test]
    fn test_group_reveal_updates_every_ordered_pair() {
        let mut store = TrustStore::new(3);
        let mut decisions = BTreeMap::new();
        decisions.insert(0, Action::Coop);
        decisions.insert(1, Action::Exploit);
        decisions.insert(2, Action::Inact);
        store.apply_group_reveal(&[0, 1, 2], &decisions);

        assert_eq!(store.trust(0, 1), 50.0 + TRUST_EXPLOIT_DELTA);
        assert_eq!(store.trust(1, 0), 50.0 + TRUST_COOP_DELTA);
        assert_eq!(store.trust(0, 2), 50.0 + TRUST_INACT_DELTA);
        // Self-trust never moves
        assert_eq!(store.trust(1, 1), 50.0);
    }

    #[test]
    fn test_grow_preserves_existing_trust() {
        let mut store = TrustStore::new(2);
        store.update_pair(0, 1, Action::Exploit);
        let before = store.trust(0, 1);
        store.grow(4);
        assert_eq!(store.len(), 4);
        assert_eq!(store.trust(0, 1), before);
        assert_eq!(store.trust(0, 3), DEFAULT_TRUST);
        assert_eq!(store.trust(3, 0), DEFAULT_TRUST);
        assert!(!store.reputation_seen(3));
    }
}
