//! Agents
//!
//! An agent is a stable id, an archetype, a weighted bundle of desire
//! modules, and a private belief state. Agents never touch shared state:
//! they return decisions and the simulator applies all effects.

pub mod belief;
pub mod desire;

pub use belief::BeliefState;
pub use desire::Desire;

use rand::Rng;
use sim_events::{Action, AgentId, Archetype, EventView};
use std::collections::BTreeMap;

use crate::environment::WorldView;

/// The desire-weight configuration of an archetype. Concrete archetypes
/// carry a single desire at weight 1; composites can mix several via
/// [`Agent::with_desires`].
pub fn archetype_desires(archetype: Archetype) -> Vec<(Desire, i64)> {
    let desire = match archetype {
        Archetype::Pusilanime => Desire::Pusilanime,
        Archetype::Thief => Desire::Thief,
        Archetype::Random => Desire::Random,
        Archetype::TipForTap => Desire::TipForTap,
        Archetype::TipForTapSecure => Desire::TipForTapSecure,
        Archetype::Abr => Desire::Abr,
        Archetype::Search => Desire::Search,
        Archetype::Resentful => Desire::Resentful,
        Archetype::Explote => Desire::Explote,
    };
    vec![(desire, 1)]
}

/// One member of the population.
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: AgentId,
    pub archetype: Archetype,
    desires: Vec<(Desire, i64)>,
    pub beliefs: BeliefState,
}

impl Agent {
    pub fn new(id: AgentId, archetype: Archetype) -> Self {
        Self::with_desires(id, archetype, archetype_desires(archetype))
    }

    /// Builds an agent with an explicit desire-weight table.
    pub fn with_desires(id: AgentId, archetype: Archetype, desires: Vec<(Desire, i64)>) -> Self {
        Self {
            id,
            archetype,
            desires,
            beliefs: BeliefState::new(),
        }
    }

    /// The agent's intention: each desire votes with its weight, and the
    /// first maximal action in declaration order wins.
    pub fn decide_action<R: Rng>(&self, view: &EventView, rng: &mut R) -> Action {
        let mut scores = [0i64; Action::COUNT];
        for (desire, weight) in &self.desires {
            scores[desire.decide(&self.beliefs, view, rng).index()] += weight;
        }

        let mut best = Action::Coop;
        let mut best_score = i64::MIN;
        for &action in Action::all() {
            if scores[action.index()] > best_score {
                best_score = scores[action.index()];
                best = action;
            }
        }
        best
    }

    /// The daily belief transition: absorbs the delivered (possibly noisy,
    /// possibly partial) view of the day's decisions, marks own-group
    /// exploiters as betrayers, and records the agent's own outcome.
    pub fn update_beliefs(
        &mut self,
        view: WorldView,
        observed: &BTreeMap<AgentId, Action>,
        group_peers: &[AgentId],
        own_outcome: Option<(Action, i64)>,
    ) {
        self.beliefs.day = view.day;
        self.beliefs.balance = view.balance;

        for (&peer, &action) in observed {
            if peer == self.id {
                continue;
            }
            self.beliefs.observe(peer, action);
        }

        for &peer in group_peers {
            if observed.get(&peer) == Some(&Action::Exploit) {
                self.beliefs.mark_betrayer(peer);
            }
        }

        if let Some((action, delta)) = own_outcome {
            self.beliefs.record_outcome(action, delta);
        }
    }
}
