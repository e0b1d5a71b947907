//! Population Setup
//!
//! Builds the founding population from configuration: either an explicit
//! per-archetype composition, or uniform random archetype sampling.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use sim_events::Archetype;
use tracing::info;

use crate::agents::Agent;
use crate::config::SimConfig;

/// Builds the founders described by `config.population`.
///
/// Ids are assigned densely from zero in creation order. With an explicit
/// composition, archetypes are laid out in archetype order; founders are
/// shuffled into groups later, so the layout carries no bias.
pub fn build_population(config: &SimConfig, rng: &mut SmallRng) -> Vec<Agent> {
    let agents = if config.population.composition.is_empty() {
        sampled_population(config.population.size, rng)
    } else {
        composed_population(config)
    };
    info!(founders = agents.len(), "population built");
    agents
}

fn composed_population(config: &SimConfig) -> Vec<Agent> {
    let mut agents = Vec::with_capacity(config.founding_size());
    for (&archetype, &count) in &config.population.composition {
        for _ in 0..count {
            agents.push(Agent::new(agents.len(), archetype));
        }
    }
    agents
}

fn sampled_population(size: usize, rng: &mut SmallRng) -> Vec<Agent> {
    let archetypes = Archetype::all();
    (0..size)
        .map(|id| {
            let archetype = *archetypes
                .choose(rng)
                .expect("archetype list is non-empty");
            Agent::new(id, archetype)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_composition_produces_exact_head_counts() {
        let config = SimConfig::from_toml(
            r#"
            [population.composition]
            thief = 3
            pusilanime = 2
            "#,
        )
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let agents = build_population(&config, &mut rng);
        assert_eq!(agents.len(), 5);
        let thieves = agents
            .iter()
            .filter(|a| a.archetype == Archetype::Thief)
            .count();
        assert_eq!(thieves, 3);
        // Dense ids in creation order
        for (i, agent) in agents.iter().enumerate() {
            assert_eq!(agent.id, i);
        }
    }

    #[test]
    fn test_sampled_population_has_requested_size() {
        let config = SimConfig::from_toml("[population]\nsize = 40").unwrap();
        let mut rng = SmallRng::seed_from_u64(2);
        let agents = build_population(&config, &mut rng);
        assert_eq!(agents.len(), 40);
    }
}
