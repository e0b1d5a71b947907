//! Day Event Descriptor
//!
//! One day's interaction: the event kind, the partition of the living into
//! groups, the shared resource pool, and (for cooperation events) the
//! revealed decision of every participant.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::action::{Action, EventType};

/// Stable integer identity of an agent. Ids are dense indices into the
/// environment's arrays and are never reused, even after death.
pub type AgentId = usize;

/// One day's interaction descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Kind of event
    pub event_type: EventType,
    /// Partition of the participating agents into disjoint, non-empty
    /// groups. A special event conceptually has a single implicit group.
    pub groups: Vec<Vec<AgentId>>,
    /// Signed resource pool available to the whole event
    pub resources: i64,
    /// Revealed action per participant, filled in once decisions are made
    /// (cooperation events only).
    #[serde(default)]
    pub decisions: BTreeMap<AgentId, Action>,
}

impl Event {
    pub fn new(event_type: EventType, groups: Vec<Vec<AgentId>>, resources: i64) -> Self {
        Self {
            event_type,
            groups,
            resources,
            decisions: BTreeMap::new(),
        }
    }

    /// The group containing `agent`, if it participates at all.
    pub fn group_of(&self, agent: AgentId) -> Option<&[AgentId]> {
        self.groups
            .iter()
            .find(|group| group.contains(&agent))
            .map(Vec::as_slice)
    }

    /// What `agent` sees of this event: its peers (itself removed) and the
    /// pool. `None` if the agent is not a participant.
    pub fn view_for(&self, agent: AgentId) -> Option<EventView> {
        let group = self.group_of(agent)?;
        let peers = group.iter().copied().filter(|&id| id != agent).collect();
        Some(EventView {
            event_type: self.event_type,
            peers,
            resources: self.resources,
        })
    }

    /// Total number of participants across all groups.
    pub fn participant_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// Number of exploit decisions recorded for this event.
    pub fn theft_count(&self) -> usize {
        self.decisions
            .values()
            .filter(|&&action| action == Action::Exploit)
            .count()
    }
}

/// A single participant's view of an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventView {
    pub event_type: EventType,
    /// Fellow group members, the viewer excluded
    pub peers: Vec<AgentId>,
    pub resources: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> Event {
        Event::new(EventType::Coop, vec![vec![0, 2, 5], vec![1, 3]], 900)
    }

    #[test]
    fn test_view_removes_self() {
        let event = sample_event();
        let view = event.view_for(2).unwrap();
        assert_eq!(view.peers, vec![0, 5]);
        assert_eq!(view.resources, 900);
    }

    #[test]
    fn test_view_for_non_participant() {
        let event = sample_event();
        assert!(event.view_for(4).is_none());
    }

    #[test]
    fn test_theft_count() {
        let mut event = sample_event();
        event.decisions.insert(0, Action::Exploit);
        event.decisions.insert(2, Action::Coop);
        event.decisions.insert(5, Action::Exploit);
        assert_eq!(event.theft_count(), 2);
    }

    #[test]
    fn test_participant_count() {
        assert_eq!(sample_event().participant_count(), 5);
    }
}
