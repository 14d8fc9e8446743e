//! Aggregated flip counts for a group
//!
//! A tally is the sum over a group's sharded counters; the shards themselves
//! never leave the counter store.

use crate::outcome::Outcome;
use serde::{Deserialize, Serialize};

/// Head/tail totals for one group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub heads: u64,
    pub tails: u64,
}

impl Tally {
    /// Total flips recorded in this tally.
    pub fn total(&self) -> u64 {
        self.heads + self.tails
    }

    /// Add one flip with the given outcome.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Head => self.heads += 1,
            Outcome::Tail => self.tails += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_record_and_total() {
        let mut tally = Tally::default();
        tally.record(Outcome::Head);
        tally.record(Outcome::Tail);
        tally.record(Outcome::Tail);

        assert_eq!(tally.heads, 1);
        assert_eq!(tally.tails, 2);
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn test_tally_wire_form() {
        let tally = Tally { heads: 4, tails: 9 };
        let json = serde_json::to_string(&tally).unwrap();
        assert_eq!(json, r#"{"heads":4,"tails":9}"#);
    }
}
