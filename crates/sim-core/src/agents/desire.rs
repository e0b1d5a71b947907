//! Desire Modules
//!
//! Each desire is a pure decision function from belief state and the
//! visible group to an action. An archetype is just a weighted bundle of
//! these.

use rand::seq::SliceRandom;
use rand::Rng;
use sim_events::{Action, AgentId, EventView};
use std::collections::HashMap;

use crate::agents::belief::{belief_constants, trust_delta, BeliefState};
use crate::payoff::settle;
use crate::rng::{poisson, GROUP_SIZE_LAMBDA};

/// Constants of the trust-bracket heuristics.
pub mod desire_constants {
    /// Group trust above which cooperation looks safe
    pub const COOP_TRUST_THRESHOLD: f64 = 55.0;
    /// Trust below which a peer is presumed hostile
    pub const EXPLOIT_TRUST_THRESHOLD: f64 = 40.0;
    /// Lookahead depth of the search policy
    pub const SEARCH_DEPTH: usize = 5;
}

use desire_constants::*;

/// A single decision policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Desire {
    /// Always cooperate
    Pusilanime,
    /// Always exploit
    Thief,
    /// Uniform random action
    Random,
    /// Mirror the majority action of the visible group
    TipForTap,
    /// Mirror, but never initiate exploitation
    TipForTapSecure,
    /// Cooperate only with reputable groups
    Abr,
    /// Bounded lookahead over hypothetical futures
    Search,
    /// Refuse to act alongside known betrayers
    Resentful,
    /// Repeat whatever has paid best historically
    Explote,
}

impl Desire {
    pub fn decide<R: Rng>(
        &self,
        beliefs: &BeliefState,
        view: &EventView,
        rng: &mut R,
    ) -> Action {
        match self {
            Desire::Pusilanime => Action::Coop,
            Desire::Thief => Action::Exploit,
            Desire::Random => *Action::all().choose(rng).unwrap_or(&Action::Inact),
            Desire::TipForTap => decide_reciprocal(beliefs, view, false),
            Desire::TipForTapSecure => decide_reciprocal(beliefs, view, true),
            Desire::Abr => decide_abr(beliefs, view),
            Desire::Search => Lookahead::new(beliefs, view, rng).best_action(),
            Desire::Resentful => decide_resentful(beliefs, view),
            Desire::Explote => decide_explote(beliefs),
        }
    }
}

/// Majority-mirroring policy. Unknown members count as cooperators; the
/// secure variant answers a winning exploit tally with inaction instead.
fn decide_reciprocal(beliefs: &BeliefState, view: &EventView, secure: bool) -> Action {
    let mut coop = 0usize;
    let mut exploit = 0usize;
    let mut inact = 0usize;
    for &peer in &view.peers {
        match beliefs.last_seen(peer) {
            None | Some(Action::Coop) => coop += 1,
            Some(Action::Exploit) => exploit += 1,
            Some(Action::Inact) => inact += 1,
        }
    }
    if coop > exploit && coop > inact {
        Action::Coop
    } else if exploit > inact {
        if secure {
            Action::Inact
        } else {
            Action::Exploit
        }
    } else {
        Action::Inact
    }
}

/// Adaptive-reputation policy: cooperate when the group's average private
/// trust clears the threshold.
fn decide_abr(beliefs: &BeliefState, view: &EventView) -> Action {
    if view.peers.is_empty() {
        return Action::Inact;
    }
    let total: f64 = view.peers.iter().map(|&p| beliefs.trust_toward(p)).sum();
    let average = total / view.peers.len() as f64;
    if average > COOP_TRUST_THRESHOLD {
        Action::Coop
    } else {
        Action::Inact
    }
}

fn decide_resentful(beliefs: &BeliefState, view: &EventView) -> Action {
    if view.peers.iter().any(|&p| beliefs.is_betrayer(p)) {
        Action::Inact
    } else {
        Action::Coop
    }
}

/// Outcome-seeking policy: highest historical mean delta wins, untried
/// actions count as zero, ties resolve in declaration order.
fn decide_explote(beliefs: &BeliefState) -> Action {
    let mut best = Action::Coop;
    let mut best_mean = f64::NEG_INFINITY;
    for &action in Action::all() {
        let mean = beliefs.mean_outcome(action).unwrap_or(0.0);
        if mean > best_mean {
            best_mean = mean;
            best = action;
        }
    }
    best
}

/// Heuristic action a hypothetical peer takes, from its trust bracket.
fn heuristic_action(trust: f64) -> Action {
    if trust > COOP_TRUST_THRESHOLD {
        Action::Coop
    } else if trust < EXPLOIT_TRUST_THRESHOLD {
        Action::Exploit
    } else {
        Action::Inact
    }
}

/// Bounded-depth lookahead for the search policy.
///
/// Each ply hypothesizes an interaction group from the peers the agent
/// knows of, assigns every member its trust-bracket action (nudging the
/// ply's trust snapshot accordingly), draws a random pool, and evaluates
/// the agent's three candidate actions through the payoff engine. Snapshots
/// live in a per-ply arena rather than being cloned per branch, so memory
/// stays bounded by the depth.
struct Lookahead<'a, R: Rng> {
    rng: &'a mut R,
    snapshots: Vec<HashMap<AgentId, f64>>,
    start_resources: i64,
}

impl<'a, R: Rng> Lookahead<'a, R> {
    fn new(beliefs: &BeliefState, view: &EventView, rng: &'a mut R) -> Self {
        let mut root = beliefs.trust_snapshot();
        // Visible strangers enter the hypothesis at default trust
        for &peer in &view.peers {
            root.entry(peer)
                .or_insert(belief_constants::DEFAULT_PEER_TRUST);
        }
        let mut snapshots = vec![HashMap::new(); SEARCH_DEPTH + 1];
        snapshots[0] = root;
        Self {
            rng,
            snapshots,
            start_resources: beliefs.balance,
        }
    }

    fn best_action(mut self) -> Action {
        self.evaluate(1, self.start_resources).0
    }

    /// Returns the best candidate action at this ply and the terminal
    /// resource total its subtree reaches. Ties break COOP > INACT >
    /// EXPLOIT by evaluation order.
    fn evaluate(&mut self, ply: usize, resources: i64) -> (Action, i64) {
        self.snapshots[ply] = self.snapshots[ply - 1].clone();

        let mut peers: Vec<AgentId> = self.snapshots[ply].keys().copied().collect();
        // HashMap order is arbitrary; sort before shuffling so the draw is
        // a function of the seed alone
        peers.sort_unstable();
        peers.shuffle(self.rng);
        let size = poisson(self.rng, GROUP_SIZE_LAMBDA).min(peers.len());
        peers.truncate(size);

        let pool = self.rng.gen_range(-100..=350) * (peers.len() as i64 + 1);

        let mut peer_actions = Vec::with_capacity(peers.len());
        for &peer in &peers {
            if let Some(trust) = self.snapshots[ply].get_mut(&peer) {
                let action = heuristic_action(*trust);
                *trust = (*trust + trust_delta(action)).clamp(
                    belief_constants::TRUST_FLOOR,
                    belief_constants::TRUST_CEILING,
                );
                peer_actions.push(action);
            }
        }

        let mut best_action = Action::Coop;
        let mut best_total = i64::MIN;
        for candidate in [Action::Coop, Action::Inact, Action::Exploit] {
            let mut actions = Vec::with_capacity(peer_actions.len() + 1);
            actions.push(candidate);
            actions.extend_from_slice(&peer_actions);
            let delta = settle(&actions, pool)[0];
            let total = if ply == SEARCH_DEPTH {
                resources + delta
            } else {
                self.evaluate(ply + 1, resources + delta).1
            };
            if total > best_total {
                best_total = total;
                best_action = candidate;
            }
        }
        (best_action, best_total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use sim_events::EventType;

    fn view_with_peers(peers: Vec<AgentId>) -> EventView {
        EventView {
            event_type: EventType::Coop,
            peers,
            resources: 1000,
        }
    }

    #[test]
    fn test_fixed_policies() {
        let beliefs = BeliefState::new();
        let view = view_with_peers(vec![1, 2]);
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(
            Desire::Pusilanime.decide(&beliefs, &view, &mut rng),
            Action::Coop
        );
        assert_eq!(
            Desire::Thief.decide(&beliefs, &view, &mut rng),
            Action::Exploit
        );
    }

    #[test]
    fn test_reciprocal_defaults_unknowns_to_coop() {
        let beliefs = BeliefState::new();
        let view = view_with_peers(vec![1, 2, 3]);
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(
            Desire::TipForTap.decide(&beliefs, &view, &mut rng),
            Action::Coop
        );
    }

    #[test]
    fn test_reciprocal_mirrors_exploiters() {
        let mut beliefs = BeliefState::new();
        beliefs.observe(1, Action::Exploit);
        beliefs.observe(2, Action::Exploit);
        beliefs.observe(3, Action::Coop);
        let view = view_with_peers(vec![1, 2, 3]);
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(
            Desire::TipForTap.decide(&beliefs, &view, &mut rng),
            Action::Exploit
        );
        // The secure variant never initiates exploitation
        assert_eq!(
            Desire::TipForTapSecure.decide(&beliefs, &view, &mut rng),
            Action::Inact
        );
    }

    #[test]
    fn test_reciprocal_tie_defaults_to_inact() {
        let mut beliefs = BeliefState::new();
        beliefs.observe(1, Action::Exploit);
        beliefs.observe(2, Action::Inact);
        let view = view_with_peers(vec![1, 2]);
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(
            Desire::TipForTap.decide(&beliefs, &view, &mut rng),
            Action::Inact
        );
    }

    #[test]
    fn test_abr_strangers_average_below_threshold() {
        // All-stranger group averages exactly 50, which does not clear 55
        let beliefs = BeliefState::new();
        let view = view_with_peers(vec![1, 2]);
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(Desire::Abr.decide(&beliefs, &view, &mut rng), Action::Inact);
    }

    #[test]
    fn test_abr_cooperates_with_reputable_group() {
        let mut beliefs = BeliefState::new();
        beliefs.observe(1, Action::Coop);
        beliefs.observe(2, Action::Coop);
        let view = view_with_peers(vec![1, 2]);
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(Desire::Abr.decide(&beliefs, &view, &mut rng), Action::Coop);
    }

    #[test]
    fn test_abr_alone_stays_inactive() {
        let beliefs = BeliefState::new();
        let view = view_with_peers(vec![]);
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(Desire::Abr.decide(&beliefs, &view, &mut rng), Action::Inact);
    }

    #[test]
    fn test_resentful_remembers() {
        let mut beliefs = BeliefState::new();
        beliefs.mark_betrayer(2);
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(
            Desire::Resentful.decide(&beliefs, &view_with_peers(vec![1, 3]), &mut rng),
            Action::Coop
        );
        assert_eq!(
            Desire::Resentful.decide(&beliefs, &view_with_peers(vec![1, 2]), &mut rng),
            Action::Inact
        );
    }

    #[test]
    fn test_explote_prefers_best_history() {
        let mut beliefs = BeliefState::new();
        beliefs.record_outcome(Action::Coop, 5);
        beliefs.record_outcome(Action::Exploit, 40);
        beliefs.record_outcome(Action::Inact, 10);
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(
            Desire::Explote.decide(&beliefs, &view_with_peers(vec![1]), &mut rng),
            Action::Exploit
        );
    }

    #[test]
    fn test_explote_without_history_cooperates() {
        let beliefs = BeliefState::new();
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(
            Desire::Explote.decide(&beliefs, &view_with_peers(vec![1]), &mut rng),
            Action::Coop
        );
    }

    #[test]
    fn test_search_is_deterministic_for_a_seed() {
        let mut beliefs = BeliefState::new();
        beliefs.observe(1, Action::Coop);
        beliefs.observe(2, Action::Exploit);
        beliefs.balance = 500;
        let view = view_with_peers(vec![1, 2, 3]);

        let mut rng1 = SmallRng::seed_from_u64(99);
        let mut rng2 = SmallRng::seed_from_u64(99);
        let first = Desire::Search.decide(&beliefs, &view, &mut rng1);
        let second = Desire::Search.decide(&beliefs, &view, &mut rng2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_heuristic_brackets() {
        assert_eq!(heuristic_action(60.0), Action::Coop);
        assert_eq!(heuristic_action(50.0), Action::Inact);
        assert_eq!(heuristic_action(30.0), Action::Exploit);
    }
}
