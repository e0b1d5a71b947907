//! Group Formation
//!
//! Partitions the living population into interaction groups. Two variants:
//! uniformly random Poisson-sized runs, or trust-affinity growth around a
//! random seed. Both produce a partition: every alive agent lands in
//! exactly one non-empty group.

use rand::seq::SliceRandom;
use rand::Rng;
use sim_events::AgentId;
use std::cmp::Ordering;

use crate::rng::{bernoulli, poisson, GROUP_SIZE_LAMBDA};
use crate::trust::TrustStore;

/// Shuffles the alive set and carves it into Poisson(λ=5)-sized runs.
/// Zero draws are skipped so no empty group is ever emitted.
pub fn uniform_groups<R: Rng>(rng: &mut R, alive: &[AgentId]) -> Vec<Vec<AgentId>> {
    let mut pool: Vec<AgentId> = alive.to_vec();
    pool.shuffle(rng);

    let mut groups = Vec::new();
    let mut index = 0;
    while index < pool.len() {
        let run = poisson(rng, GROUP_SIZE_LAMBDA);
        if run == 0 {
            continue;
        }
        let end = (index + run).min(pool.len());
        groups.push(pool[index..end].to_vec());
        index = end;
    }
    groups
}

/// Grows groups around random seeds, admitting candidates in descending
/// order of the seed's trust. A candidate joins only if every current
/// member passes a Bernoulli trial at its own trust toward the candidate;
/// a Poisson(λ=5) budget bounds admissions per group.
///
/// A seed distrusted by everyone (or distrusting everyone) still forms a
/// group of one: no trial applies to an empty member set.
pub fn trust_affinity_groups<R: Rng>(
    rng: &mut R,
    alive: &[AgentId],
    trust: &TrustStore,
) -> Vec<Vec<AgentId>> {
    let mut pool: Vec<AgentId> = alive.to_vec();
    pool.shuffle(rng);

    let mut groups = Vec::new();
    while !pool.is_empty() {
        let seed = pool.remove(0);
        let mut group = vec![seed];
        let mut budget = poisson(rng, GROUP_SIZE_LAMBDA);

        let mut candidates = pool.clone();
        candidates.sort_by(|&a, &b| {
            trust
                .trust(seed, b)
                .partial_cmp(&trust.trust(seed, a))
                .unwrap_or(Ordering::Equal)
        });

        for candidate in candidates {
            if budget == 0 {
                break;
            }
            let admitted = group
                .iter()
                .all(|&member| bernoulli(rng, trust.trust_probability(member, candidate)));
            if admitted {
                group.push(candidate);
                pool.retain(|&id| id != candidate);
                budget -= 1;
            }
        }
        groups.push(group);
    }
    groups
}
