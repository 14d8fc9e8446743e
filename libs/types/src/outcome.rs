//! Flip outcome type
//!
//! The wire form is the bare JSON string `"head"` or `"tail"`, which is also
//! what the flip endpoint returns to callers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of a single coin flip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Head,
    Tail,
}

impl Outcome {
    /// Both outcomes, in a fixed order for iterating counter slots.
    pub const ALL: [Outcome; 2] = [Outcome::Head, Outcome::Tail];

    /// Stable string label, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Head => "head",
            Outcome::Tail => "tail",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
