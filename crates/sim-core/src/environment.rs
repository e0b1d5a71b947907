//! Environment
//!
//! The authoritative world state: population arrays, the alive set, the
//! resource ledger, trust and reputation, and the day counter. All
//! mutation goes through here; agents only ever receive read-only views.

use rand::Rng;
use sim_events::{AgentId, Archetype};
use std::collections::BTreeMap;
use tracing::debug;

use crate::agents::Agent;
use crate::trust::TrustStore;

/// Starting balance range for a founding agent.
pub const INITIAL_RESOURCES_MIN: i64 = 300;
pub const INITIAL_RESOURCES_MAX: i64 = 600;

/// The read-only slice of the environment an agent is shown.
#[derive(Debug, Clone, Copy)]
pub struct WorldView {
    pub day: u64,
    pub lost_per_day: i64,
    /// The viewing agent's own balance
    pub balance: i64,
}

/// Authoritative world state for one run.
#[derive(Debug)]
pub struct Environment {
    /// All agents ever created, index-addressed; ids are never reused
    pub agents: Vec<Agent>,
    /// Currently-alive agent ids, in id order
    pub agents_alive: Vec<AgentId>,
    /// Balance per agent id; an agent dies the moment its balance is <= 0
    pub public_resources: Vec<i64>,
    pub trust: TrustStore,
    pub day: u64,
    /// Upkeep deducted from every living agent each day
    pub lost_per_day: i64,
    /// Reproduction cycles completed so far
    pub generation: u64,
}

impl Environment {
    /// Builds the founding population with randomized starting balances.
    pub fn new<R: Rng>(agents: Vec<Agent>, lost_per_day: i64, rng: &mut R) -> Self {
        let count = agents.len();
        let public_resources = (0..count)
            .map(|_| rng.gen_range(INITIAL_RESOURCES_MIN..=INITIAL_RESOURCES_MAX))
            .collect();
        Self {
            agents,
            agents_alive: (0..count).collect(),
            public_resources,
            trust: TrustStore::new(count),
            day: 0,
            lost_per_day,
            generation: 0,
        }
    }

    pub fn next_day(&mut self) {
        self.day += 1;
    }

    pub fn is_alive(&self, id: AgentId) -> bool {
        self.agents_alive.contains(&id)
    }

    pub fn balance(&self, id: AgentId) -> i64 {
        self.public_resources[id]
    }

    /// What `id` gets to see of the world.
    pub fn view_for(&self, id: AgentId) -> WorldView {
        WorldView {
            day: self.day,
            lost_per_day: self.lost_per_day,
            balance: self.public_resources[id],
        }
    }

    /// Applies one settlement delta. Referencing a dead agent here is a
    /// programming error, not a recoverable condition.
    pub fn apply_delta(&mut self, id: AgentId, delta: i64) {
        assert!(self.is_alive(id), "settlement delta for dead agent {id}");
        self.public_resources[id] += delta;
    }

    /// Deducts the daily upkeep from every living agent.
    pub fn deduct_upkeep(&mut self) {
        for &id in &self.agents_alive {
            self.public_resources[id] -= self.lost_per_day;
        }
    }

    /// Recomputes the alive set, permanently removing agents whose balance
    /// has reached zero or below. Returns the newly dead.
    pub fn refresh_alive(&mut self) -> Vec<AgentId> {
        let (alive, dead): (Vec<AgentId>, Vec<AgentId>) = self
            .agents_alive
            .iter()
            .copied()
            .partition(|&id| self.public_resources[id] > 0);
        self.agents_alive = alive;
        if !dead.is_empty() {
            debug!(day = self.day, dead = ?dead, "agents died");
        }
        dead
    }

    /// Appends a newborn agent with a fresh id and the given starting
    /// balance; the trust matrix grows symmetrically with default trust.
    pub fn spawn(&mut self, archetype: Archetype, resources: i64) -> AgentId {
        let id = self.agents.len();
        self.agents.push(Agent::new(id, archetype));
        self.public_resources.push(resources);
        self.agents_alive.push(id);
        self.trust.grow(self.agents.len());
        id
    }

    /// Zeroes the lowest balances until the living population fits the
    /// cap. The zeroed agents die in the next `refresh_alive`. Returns the
    /// culled ids.
    pub fn cull_to_cap(&mut self, cap: usize) -> Vec<AgentId> {
        if self.agents_alive.len() <= cap {
            return Vec::new();
        }
        let excess = self.agents_alive.len() - cap;
        let mut by_balance: Vec<AgentId> = self.agents_alive.clone();
        by_balance.sort_by_key(|&id| (self.public_resources[id], id));

        let culled: Vec<AgentId> = by_balance.into_iter().take(excess).collect();
        for &id in &culled {
            self.public_resources[id] = 0;
        }
        culled
    }

    /// Mean balance among the living; zero for an extinct population.
    pub fn mean_resources(&self) -> f64 {
        if self.agents_alive.is_empty() {
            return 0.0;
        }
        let total: i64 = self.agents_alive.iter().map(|&id| self.public_resources[id]).sum();
        total as f64 / self.agents_alive.len() as f64
    }

    /// Living population count and mean balance per archetype.
    pub fn archetype_stats(&self) -> (BTreeMap<Archetype, usize>, BTreeMap<Archetype, f64>) {
        let mut counts: BTreeMap<Archetype, usize> = BTreeMap::new();
        let mut totals: BTreeMap<Archetype, i64> = BTreeMap::new();
        for &id in &self.agents_alive {
            let archetype = self.agents[id].archetype;
            *counts.entry(archetype).or_insert(0) += 1;
            *totals.entry(archetype).or_insert(0) += self.public_resources[id];
        }
        let averages = counts
            .iter()
            .map(|(&archetype, &count)| {
                (archetype, totals[&archetype] as f64 / count as f64)
            })
            .collect();
        (counts, averages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn small_env() -> Environment {
        let agents = vec![
            Agent::new(0, Archetype::Pusilanime),
            Agent::new(1, Archetype::Thief),
            Agent::new(2, Archetype::Random),
        ];
        let mut rng = SmallRng::seed_from_u64(1);
        Environment::new(agents, 100, &mut rng)
    }

    #[test]
    fn test_initial_balances_in_range() {
        let env = small_env();
        assert_eq!(env.agents_alive, vec![0, 1, 2]);
        for &id in &env.agents_alive {
            let balance = env.balance(id);
            assert!((INITIAL_RESOURCES_MIN..=INITIAL_RESOURCES_MAX).contains(&balance));
        }
    }

    #[test]
    fn test_death_is_permanent() {
        let mut env = small_env();
        env.public_resources[1] = -5;
        let dead = env.refresh_alive();
        assert_eq!(dead, vec![1]);
        assert_eq!(env.agents_alive, vec![0, 2]);
        // A later windfall does not resurrect
        env.public_resources[1] = 1000;
        assert!(env.refresh_alive().is_empty());
        assert!(!env.is_alive(1));
    }

    #[test]
    fn test_spawn_appends_fresh_id() {
        let mut env = small_env();
        let id = env.spawn(Archetype::Abr, 400);
        assert_eq!(id, 3);
        assert!(env.is_alive(3));
        assert_eq!(env.balance(3), 400);
        assert_eq!(env.trust.len(), 4);
        assert_eq!(env.trust.trust(0, 3), 50.0);
    }

    #[test]
    fn test_cull_zeroes_lowest_balances() {
        let mut env = small_env();
        env.public_resources = vec![500, 50, 300];
        let culled = env.cull_to_cap(2);
        assert_eq!(culled, vec![1]);
        assert_eq!(env.balance(1), 0);
        env.refresh_alive();
        assert_eq!(env.agents_alive, vec![0, 2]);
    }

    #[test]
    fn test_archetype_stats() {
        let mut env = small_env();
        env.public_resources = vec![100, 200, 300];
        let (counts, averages) = env.archetype_stats();
        assert_eq!(counts[&Archetype::Pusilanime], 1);
        assert_eq!(averages[&Archetype::Thief], 200.0);
        assert_eq!(env.mean_resources(), 200.0);
    }

    #[test]
    #[should_panic(expected = "dead agent")]
    fn test_delta_for_dead_agent_fails_fast() {
        let mut env = small_env();
        env.public_resources[2] = 0;
        env.refresh_alive();
        env.apply_delta(2, 10);
    }
}
