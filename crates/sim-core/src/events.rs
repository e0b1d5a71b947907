//! Event Generation
//!
//! Draws each day's event: its kind, the group partition, the shared pool,
//! and the exclusion of known low-reputation agents.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use sim_events::{AgentId, Event, EventType};

use crate::grouping::{trust_affinity_groups, uniform_groups};
use crate::rng::bernoulli;
use crate::trust::TrustStore;

/// Reputation at or below which thief control may exclude an agent.
pub const THIEF_REPUTATION_THRESHOLD: f64 = 30.0;

/// Produces the day's event from the current alive set and trust matrix.
pub trait EventGenerator {
    fn next_event(&self, rng: &mut SmallRng, alive: &[AgentId], trust: &TrustStore) -> Event;
}

/// The participants of a special event: a uniformly sized random subset of
/// the living.
fn special_subset(rng: &mut SmallRng, alive: &[AgentId]) -> Vec<AgentId> {
    let count = rng.gen_range(1..=alive.len());
    alive.choose_multiple(rng, count).copied().collect()
}

/// Coin-flip events over uniformly shuffled groups, with a wide pool range.
/// The plain generator used for unparameterized runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleEventGenerator;

impl EventGenerator for SimpleEventGenerator {
    fn next_event(&self, rng: &mut SmallRng, alive: &[AgentId], _trust: &TrustStore) -> Event {
        let event_type = if rng.gen_bool(0.5) {
            EventType::Coop
        } else {
            EventType::Special
        };
        let groups = match event_type {
            EventType::Coop => uniform_groups(rng, alive),
            EventType::Special => vec![special_subset(rng, alive)],
        };
        let resources = rng.gen_range(-100..=350) * alive.len() as i64;
        Event::new(event_type, groups, resources)
    }
}

/// Event generator driven by the configured event-mix probabilities, with
/// trust-affinity grouping and thief control.
#[derive(Debug, Clone, Copy)]
pub struct ProbabilisticEventGenerator {
    /// Chance a day is a cooperation event rather than a special one
    pub coop_event_probability: f64,
    /// Chance a cooperation event carries a positive pool
    pub good_coop_resource_probability: f64,
    /// Chance a special event carries a positive pool
    pub good_time_probability: f64,
    /// Chance a known low-reputation agent is tolerated anyway
    pub thief_toleration: f64,
}

impl ProbabilisticEventGenerator {
    /// Drops agents whose observed reputation has fallen to the thief
    /// threshold, unless the toleration draw lets them stay. Groups emptied
    /// by the filter disappear.
    fn thief_control(&self, rng: &mut SmallRng, groups: &mut Vec<Vec<AgentId>>, trust: &TrustStore) {
        for group in groups.iter_mut() {
            group.retain(|&agent| {
                !(trust.reputation_seen(agent)
                    && trust.reputation(agent) <= THIEF_REPUTATION_THRESHOLD)
                    || bernoulli(rng, self.thief_toleration)
            });
        }
        groups.retain(|group| !group.is_empty());
    }
}

impl EventGenerator for ProbabilisticEventGenerator {
    fn next_event(&self, rng: &mut SmallRng, alive: &[AgentId], trust: &TrustStore) -> Event {
        let population = alive.len() as i64;
        if bernoulli(rng, self.coop_event_probability) {
            let mut groups = trust_affinity_groups(rng, alive, trust);
            let resources = if bernoulli(rng, self.good_coop_resource_probability) {
                self.thief_control(rng, &mut groups, trust);
                rng.gen_range(100..=300) * population
            } else {
                rng.gen_range(-50..=0) * population
            };
            Event::new(EventType::Coop, groups, resources)
        } else {
            let mut groups = vec![special_subset(rng, alive)];
            self.thief_control(rng, &mut groups, trust);
            let resources = if bernoulli(rng, self.good_time_probability) {
                rng.gen_range(0..=50) * population
            } else {
                rng.gen_range(-10..=0) * population
            };
            Event::new(EventType::Special, groups, resources)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use sim_events::Action;
    use std::collections::BTreeSet;

    fn all_coop_generator() -> ProbabilisticEventGenerator {
        ProbabilisticEventGenerator {
            coop_event_probability: 1.0,
            good_coop_resource_probability: 1.0,
            good_time_probability: 1.0,
            thief_toleration: 1.0,
        }
    }

    #[test]
    fn test_coop_partition_covers_alive_set() {
        let alive: Vec<AgentId> = (0..25).collect();
        let trust = TrustStore::new(25);
        let generator = all_coop_generator();
        for seed in 0..10 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let event = generator.next_event(&mut rng, &alive, &trust);
            assert_eq!(event.event_type, EventType::Coop);
            let members: BTreeSet<AgentId> =
                event.groups.iter().flatten().copied().collect();
            assert_eq!(members, alive.iter().copied().collect());
            assert_eq!(event.participant_count(), alive.len());
        }
    }

    #[test]
    fn test_good_coop_pool_scales_with_population() {
        let alive: Vec<AgentId> = (0..10).collect();
        let trust = TrustStore::new(10);
        let mut rng = SmallRng::seed_from_u64(5);
        let event = all_coop_generator().next_event(&mut rng, &alive, &trust);
        assert!(event.resources >= 100 * 10);
        assert!(event.resources <= 300 * 10);
    }

    #[test]
    fn test_thief_control_excludes_known_thief() {
        let alive: Vec<AgentId> = (0..6).collect();
        let mut trust = TrustStore::new(6);
        // Two exploits observed: reputation 50 - 60 -> clamped 0
        trust.record_action(3, Action::Exploit);
        trust.record_action(3, Action::Exploit);

        let generator = ProbabilisticEventGenerator {
            thief_toleration: 0.0,
            ..all_coop_generator()
        };
        for seed in 0..10 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let event = generator.next_event(&mut rng, &alive, &trust);
            assert!(event.group_of(3).is_none(), "thief was not excluded");
        }
    }

    #[test]
    fn test_unseen_reputation_is_never_excluded() {
        let alive: Vec<AgentId> = (0..6).collect();
        let trust = TrustStore::new(6);
        let generator = ProbabilisticEventGenerator {
            thief_toleration: 0.0,
            ..all_coop_generator()
        };
        let mut rng = SmallRng::seed_from_u64(11);
        let event = generator.next_event(&mut rng, &alive, &trust);
        assert_eq!(event.participant_count(), alive.len());
    }

    #[test]
    fn test_special_event_takes_nonempty_subset() {
        let alive: Vec<AgentId> = (0..12).collect();
        let trust = TrustStore::new(12);
        let generator = ProbabilisticEventGenerator {
            coop_event_probability: 0.0,
            ..all_coop_generator()
        };
        let mut rng = SmallRng::seed_from_u64(2);
        let event = generator.next_event(&mut rng, &alive, &trust);
        assert_eq!(event.event_type, EventType::Special);
        assert_eq!(event.groups.len(), 1);
        assert!(!event.groups[0].is_empty());
        assert!(event.groups[0].len() <= alive.len());
    }
}
