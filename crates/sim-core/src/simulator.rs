//! Simulator
//!
//! The strictly sequential day loop: event generation, decisions,
//! settlement, reputation and trust updates, upkeep, reproduction,
//! culling, death filtering, and belief delivery. Day N must settle
//! completely before day N+1 begins, because grouping reads the trust
//! matrix mutated the day before.

use rand::rngs::SmallRng;
use rand::Rng;
use serde::Serialize;
use sim_events::{Action, AgentId, ChronicleEntry, DaySummary, Event, EventType, EventView};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::config::{PerceptionConfig, ReproductionConfig, SimConfig, Visibility};
use crate::environment::Environment;
use crate::events::EventGenerator;
use crate::output::{Chronicle, OutputError, SummaryWriter};
use crate::payoff::{floor_div, settle};
use crate::rng::{bernoulli, weighted_index};

/// What a finished run hands back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub final_day: u64,
    pub survivors: usize,
    pub total_thefts: u64,
    pub generations: u64,
    /// Final global reputation per agent id, dead agents included
    pub final_reputation: Vec<f64>,
    pub summaries: Vec<DaySummary>,
}

/// Drives one simulation run to completion.
pub struct Simulator<G: EventGenerator> {
    pub env: Environment,
    generator: G,
    reproduction: ReproductionConfig,
    perception: PerceptionConfig,
    rng: SmallRng,
    chronicle: Chronicle,
    summary_writer: SummaryWriter,
    summaries: Vec<DaySummary>,
    total_thefts: u64,
}

impl<G: EventGenerator> Simulator<G> {
    pub fn new(
        env: Environment,
        generator: G,
        config: &SimConfig,
        rng: SmallRng,
        chronicle: Chronicle,
        summary_writer: SummaryWriter,
    ) -> Self {
        Self {
            env,
            generator,
            reproduction: config.reproduction.clone(),
            perception: config.perception.clone(),
            rng,
            chronicle,
            summary_writer,
            summaries: Vec::new(),
            total_thefts: 0,
        }
    }

    /// Runs for at most `days` days, stopping early on extinction.
    pub fn run(&mut self, days: u64) -> Result<RunReport, OutputError> {
        for _ in 0..days {
            if self.env.agents_alive.is_empty() {
                warn!(day = self.env.day, "population extinct, ending run early");
                break;
            }
            self.step_day()?;
        }

        let report = RunReport {
            final_day: self.env.day,
            survivors: self.env.agents_alive.len(),
            total_thefts: self.total_thefts,
            generations: self.env.generation,
            final_reputation: self.env.trust.reputations().to_vec(),
            summaries: self.summaries.clone(),
        };
        self.chronicle.log(&ChronicleEntry::RunEnd {
            day: report.final_day,
            survivors: report.survivors,
        })?;
        self.chronicle.flush()?;
        self.summary_writer.flush()?;
        info!(
            final_day = report.final_day,
            survivors = report.survivors,
            total_thefts = report.total_thefts,
            "run complete"
        );
        Ok(report)
    }

    /// One full day: event, decisions, settlement, upkeep, reproduction,
    /// culling, deaths, belief delivery. The order is load-bearing.
    fn step_day(&mut self) -> Result<(), OutputError> {
        self.env.next_day();
        let day = self.env.day;
        self.chronicle.log(&ChronicleEntry::DayHeader { day })?;

        let mut event =
            self.generator
                .next_event(&mut self.rng, &self.env.agents_alive, &self.env.trust);
        self.chronicle.log(&ChronicleEntry::EventHeader {
            event_type: event.event_type,
            groups: event.groups.clone(),
            resources: event.resources,
        })?;
        debug!(
            day,
            event_type = %event.event_type,
            groups = event.groups.len(),
            pool = event.resources,
            "event drawn"
        );

        let mut deltas: BTreeMap<AgentId, i64> = BTreeMap::new();
        match event.event_type {
            EventType::Coop => self.settle_coop(&mut event, &mut deltas)?,
            EventType::Special => self.settle_special(&event, &mut deltas),
        }

        self.env.deduct_upkeep();

        if day % self.reproduction.interval == 0 {
            self.reproduce()?;
        }

        let culled = self.env.cull_to_cap(self.reproduction.max_population);
        for &id in &culled {
            self.chronicle.log(&ChronicleEntry::Culled {
                agent: id,
                archetype: self.env.agents[id].archetype,
            })?;
        }

        let dead = self.env.refresh_alive();
        for &id in &dead {
            if !culled.contains(&id) {
                self.chronicle.log(&ChronicleEntry::Death {
                    agent: id,
                    archetype: self.env.agents[id].archetype,
                })?;
            }
        }

        self.deliver_beliefs(&event, &deltas);
        self.record_summary(day, &event)
    }

    /// Decisions, reputation, pairwise trust, and payoff settlement for a
    /// cooperation event.
    fn settle_coop(
        &mut self,
        event: &mut Event,
        deltas: &mut BTreeMap<AgentId, i64>,
    ) -> Result<(), OutputError> {
        let groups = event.groups.clone();

        for group in &groups {
            for &agent in group {
                let view = EventView {
                    event_type: EventType::Coop,
                    peers: group.iter().copied().filter(|&p| p != agent).collect(),
                    resources: event.resources,
                };
                let action = self.env.agents[agent].decide_action(&view, &mut self.rng);
                event.decisions.insert(agent, action);
                self.chronicle.log(&ChronicleEntry::Decision {
                    agent,
                    archetype: self.env.agents[agent].archetype,
                    action,
                })?;
            }
        }

        // Public reputation moves once per participant per event
        for (&agent, &action) in &event.decisions {
            self.env.trust.record_action(agent, action);
        }
        // Private pairwise trust moves within each group
        for group in &groups {
            self.env.trust.apply_group_reveal(group, &event.decisions);
        }

        let alive_count = self.env.agents_alive.len() as i64;
        for group in &groups {
            let actions: Vec<Action> = group.iter().map(|&a| event.decisions[&a]).collect();
            let pool = floor_div(event.resources * group.len() as i64, alive_count);
            let shares = settle(&actions, pool);
            for (&agent, share) in group.iter().zip(shares) {
                self.env.apply_delta(agent, share);
                deltas.insert(agent, share);
            }
        }
        Ok(())
    }

    /// Even split of the pool among the event's subset; no decisions and
    /// no reputation or trust effects.
    fn settle_special(&mut self, event: &Event, deltas: &mut BTreeMap<AgentId, i64>) {
        let Some(group) = event.groups.first().filter(|g| !g.is_empty()) else {
            return;
        };
        let share = floor_div(event.resources, group.len() as i64);
        for &agent in group {
            self.env.apply_delta(agent, share);
            deltas.insert(agent, share);
        }
    }

    /// Periodic reproduction: archetypes are sampled proportional to their
    /// current mean balance among the living, newborn balances jitter ±10%
    /// around that mean.
    fn reproduce(&mut self) -> Result<(), OutputError> {
        let (_, averages) = self.env.archetype_stats();
        if averages.is_empty() {
            return Ok(());
        }
        let archetypes: Vec<_> = averages.keys().copied().collect();
        let weights: Vec<f64> = archetypes.iter().map(|a| averages[a]).collect();

        self.env.generation += 1;
        for _ in 0..self.reproduction.density {
            let Some(index) = weighted_index(&mut self.rng, &weights) else {
                break;
            };
            let archetype = archetypes[index];
            let jitter = self.rng.gen_range(0.9..=1.1);
            let resources = ((averages[&archetype] * jitter) as i64).max(1);
            let id = self.env.spawn(archetype, resources);
            self.chronicle.log(&ChronicleEntry::Birth {
                agent: id,
                archetype,
                resources,
            })?;
        }
        debug!(generation = self.env.generation, "reproduction cycle");
        Ok(())
    }

    /// Every survivor absorbs a possibly noisy, possibly group-scoped view
    /// of the day's decisions, plus its own outcome.
    fn deliver_beliefs(&mut self, event: &Event, deltas: &BTreeMap<AgentId, i64>) {
        let survivors = self.env.agents_alive.clone();
        for agent in survivors {
            let observed = observed_decisions(&mut self.rng, &self.perception, agent, event);
            let group_peers: Vec<AgentId> = event
                .group_of(agent)
                .map(|group| group.iter().copied().filter(|&p| p != agent).collect())
                .unwrap_or_default();
            let own_outcome = event
                .decisions
                .get(&agent)
                .map(|&action| (action, deltas.get(&agent).copied().unwrap_or(0)));
            let view = self.env.view_for(agent);
            self.env.agents[agent].update_beliefs(view, &observed, &group_peers, own_outcome);
        }
    }

    fn record_summary(&mut self, day: u64, event: &Event) -> Result<(), OutputError> {
        self.total_thefts += event.theft_count() as u64;
        let (archetype_counts, archetype_avg_resources) = self.env.archetype_stats();
        let summary = DaySummary {
            day,
            avg_resources: self.env.mean_resources(),
            total_thefts: self.total_thefts,
            agents_alive: self.env.agents_alive.len(),
            archetype_counts,
            archetype_avg_resources,
        };
        debug!(
            day,
            alive = summary.agents_alive,
            avg_resources = summary.avg_resources,
            "day settled"
        );
        self.summary_writer.write(&summary)?;
        self.summaries.push(summary);
        Ok(())
    }
}

/// The decisions `agent` gets to see, scoped by visibility and corrupted
/// by observation noise.
fn observed_decisions(
    rng: &mut SmallRng,
    perception: &PerceptionConfig,
    agent: AgentId,
    event: &Event,
) -> BTreeMap<AgentId, Action> {
    let group = event.group_of(agent);
    event
        .decisions
        .iter()
        .filter(|(&peer, _)| match perception.visibility {
            Visibility::Global => true,
            Visibility::Group => group.is_some_and(|g| g.contains(&peer)),
        })
        .map(|(&peer, &action)| {
            let delivered = if bernoulli(rng, perception.noise) {
                Action::from_index(rng.gen_range(0..Action::COUNT))
            } else {
                action
            };
            (peer, delivered)
        })
        .collect()
}
