//! Flip engine
//!
//! Draws one buffered fraction per request, compares it against the group's
//! deterministic threshold, persists the outcome into a uniformly chosen
//! shard counter, and publishes the result to live stream subscribers.
//!
//! A group's threshold depends only on its id: the id is hashed to a unit
//! fraction (SHA-256, first 8 digest bytes as a big-endian u64, divided by
//! 2^64) and mapped into the configured band. Which buffered draw a request
//! consumes therefore never changes a group's bias.

use crate::broadcast::Broadcaster;
use crate::config::{Config, SHARD_COUNT};
use crate::provider::ProviderError;
use crate::store::{CounterStore, StoreError};
use crate::supply::RandomSupply;
use rand::Rng;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use types::prelude::{FlipEvent, GroupId, Outcome};

#[derive(Debug, Error)]
pub enum FlipError {
    #[error("randomness upstream unavailable: {0}")]
    Upstream(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Map an id to a unit fraction in [0,1), stable across processes.
fn hash_unit(id: &str) -> f64 {
    let digest = Sha256::digest(id.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix) as f64 / (u64::MAX as f64 + 1.0)
}

pub struct FlipEngine {
    supply: Arc<RandomSupply>,
    store: Arc<dyn CounterStore>,
    hub: Arc<Broadcaster>,
    threshold_low: f64,
    threshold_width: f64,
}

impl FlipEngine {
    pub fn new(
        supply: Arc<RandomSupply>,
        store: Arc<dyn CounterStore>,
        hub: Arc<Broadcaster>,
        config: &Config,
    ) -> Self {
        Self {
            supply,
            store,
            hub,
            threshold_low: config.threshold_low,
            threshold_width: config.threshold_width,
        }
    }

    /// The group's head/tail threshold. Pure in the group id.
    pub fn threshold(&self, group: &GroupId) -> f64 {
        self.threshold_low + self.threshold_width * hash_unit(group.as_str())
    }

    /// Flip a coin for `group`: one draw consumed, one shard counter
    /// incremented, one event published.
    pub async fn flip(&self, group: &GroupId) -> Result<Outcome, FlipError> {
        let threshold = self.threshold(group);
        let value = self.supply.draw().await?;

        // Strict comparison: a draw exactly on the threshold is a tail.
        let outcome = if value > threshold {
            Outcome::Head
        } else {
            Outcome::Tail
        };

        let shard = rand::rng().random_range(0..SHARD_COUNT);
        match self.store.increment(group, outcome, shard, 1).await {
            Ok(_) => {}
            Err(StoreError::NotFound { .. }) => {
                debug!(group = %group, "First flip for group, initializing shard counters");
                self.store.ensure_group(group).await?;
                self.store.increment(group, outcome, shard, 1).await?;
            }
            Err(e) => return Err(e.into()),
        }

        self.hub.publish(FlipEvent {
            group: group.clone(),
            outcome,
        });

        info!(group = %group, outcome = %outcome, draw = value, "Flip recorded");
        Ok(outcome)
    }
}
