//! Configuration
//!
//! Run parameters loaded from a TOML file, with per-section serde defaults
//! and upfront validation. A bad configuration is rejected before the run
//! starts; nothing is checked lazily mid-run.

use serde::{Deserialize, Serialize};
use sim_events::Archetype;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("probability `{name}` must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },
    #[error("population is empty: set population.size or a composition")]
    EmptyPopulation,
    #[error("population composition weights sum to zero")]
    ZeroComposition,
    #[error("max_population {0} is below the minimum viable size of 2")]
    PopulationCapTooSmall(usize),
    #[error("run.days must be at least 1")]
    ZeroDays,
    #[error("reproduction.interval must be at least 1 day")]
    ZeroReproductionInterval,
}

/// How much of the day's decisions each agent gets to observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Every decision made that day
    Global,
    /// Only decisions within the observer's own group
    Group,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub population: PopulationConfig,
    pub economy: EconomyConfig,
    pub events: EventConfig,
    pub reproduction: ReproductionConfig,
    pub perception: PerceptionConfig,
    pub run: RunConfig,
}

/// Founding population.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Number of founders when sampling archetypes at random
    pub size: usize,
    /// Explicit per-archetype head counts; overrides `size` when non-empty
    pub composition: BTreeMap<Archetype, usize>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: 80,
            composition: BTreeMap::new(),
        }
    }
}

/// Daily economy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Upkeep deducted from every living agent each day
    pub lost_per_day: i64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self { lost_per_day: 100 }
    }
}

/// Event mix and thief toleration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    pub coop_event_probability: f64,
    pub good_coop_resource_probability: f64,
    pub good_time_probability: f64,
    /// Chance a known low-reputation agent is tolerated in an event
    pub thief_toleration: f64,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            coop_event_probability: 0.9,
            good_coop_resource_probability: 0.8,
            good_time_probability: 0.7,
            thief_toleration: 1.0,
        }
    }
}

/// Reproduction cycle and the population cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReproductionConfig {
    /// Days between reproduction cycles
    pub interval: u64,
    /// Agents spawned per cycle
    pub density: usize,
    /// Hard cap enforced by culling
    pub max_population: usize,
}

impl Default for ReproductionConfig {
    fn default() -> Self {
        Self {
            interval: 10,
            density: 10,
            max_population: 100,
        }
    }
}

/// Decision visibility and observation noise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    pub visibility: Visibility,
    /// Chance a delivered decision is corrupted to a random action
    pub noise: f64,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            visibility: Visibility::Group,
            noise: 0.1,
        }
    }
}

/// Run length and seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub days: u64,
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { days: 360, seed: 42 }
    }
}

impl SimConfig {
    /// Loads and validates a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parses and validates a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Number of founding agents this configuration produces.
    pub fn founding_size(&self) -> usize {
        if self.population.composition.is_empty() {
            self.population.size
        } else {
            self.population.composition.values().sum()
        }
    }

    /// Rejects degenerate configurations before a run starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let probabilities = [
            ("coop_event_probability", self.events.coop_event_probability),
            (
                "good_coop_resource_probability",
                self.events.good_coop_resource_probability,
            ),
            ("good_time_probability", self.events.good_time_probability),
            ("thief_toleration", self.events.thief_toleration),
            ("noise", self.perception.noise),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { name, value });
            }
        }

        if !self.population.composition.is_empty()
            && self.population.composition.values().sum::<usize>() == 0
        {
            return Err(ConfigError::ZeroComposition);
        }
        if self.founding_size() == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.reproduction.max_population < 2 {
            return Err(ConfigError::PopulationCapTooSmall(
                self.reproduction.max_population,
            ));
        }
        if self.run.days == 0 {
            return Err(ConfigError::ZeroDays);
        }
        if self.reproduction.interval == 0 {
            return Err(ConfigError::ZeroReproductionInterval);
        }
        Ok(())
    }
}
