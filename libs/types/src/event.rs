//! Live stream event types
//!
//! A `FlipEvent` is broadcast to every connected stream session after a flip
//! is persisted. On the wire it is the two-element array `[group, outcome]`,
//! which keeps the incremental frames compact.

use crate::ids::GroupId;
use crate::outcome::Outcome;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// A single completed flip, as delivered to stream subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipEvent {
    pub group: GroupId,
    pub outcome: Outcome,
}

impl FlipEvent {
    pub fn new(group: impl Into<GroupId>, outcome: Outcome) -> Self {
        Self {
            group: group.into(),
            outcome,
        }
    }
}

impl Serialize for FlipEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.group, self.outcome).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FlipEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (group, outcome) = <(GroupId, Outcome)>::deserialize(deserializer)?;
        Ok(Self { group, outcome })
    }
}
