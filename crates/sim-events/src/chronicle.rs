//! Chronicle Entries
//!
//! Lines of the plain-text transcript consumed by the external narrative
//! service. Each entry renders to exactly the text that is written out.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::action::{Action, EventType};
use crate::archetype::Archetype;
use crate::event::AgentId;

/// A single line of the day-by-day transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ChronicleEntry {
    /// Start of a new day
    DayHeader { day: u64 },
    /// The event drawn for the day
    EventHeader {
        event_type: EventType,
        groups: Vec<Vec<AgentId>>,
        resources: i64,
    },
    /// One participant's declared action
    Decision {
        agent: AgentId,
        archetype: Archetype,
        action: Action,
    },
    /// An agent ran out of resources
    Death { agent: AgentId, archetype: Archetype },
    /// A new agent joined the population
    Birth {
        agent: AgentId,
        archetype: Archetype,
        resources: i64,
    },
    /// An agent was zeroed out by overpopulation culling
    Culled { agent: AgentId, archetype: Archetype },
    /// End of the run
    RunEnd { day: u64, survivors: usize },
}

impl fmt::Display for ChronicleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChronicleEntry::DayHeader { day } => write!(f, "Day {day}"),
            ChronicleEntry::EventHeader {
                event_type,
                groups,
                resources,
            } => write!(
                f,
                "Event: {event_type}, groups: {groups:?}, resources: {resources}"
            ),
            ChronicleEntry::Decision {
                agent,
                archetype,
                action,
            } => write!(f, "  agent {agent} ({archetype}): {action}"),
            ChronicleEntry::Death { agent, archetype } => {
                write!(f, "Agent {agent} ({archetype}) has died")
            }
            ChronicleEntry::Birth {
                agent,
                archetype,
                resources,
            } => write!(
                f,
                "Agent {agent} ({archetype}) was born with {resources} resources"
            ),
            ChronicleEntry::Culled { agent, archetype } => {
                write!(f, "Agent {agent} ({archetype}) was culled by overpopulation")
            }
            ChronicleEntry::RunEnd { day, survivors } => {
                write!(f, "Run ended on day {day} with {survivors} survivors")
            }
        }
    }
}
