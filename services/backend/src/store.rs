//! Counter store contract and in-process implementation
//!
//! Each group owns `SHARD_COUNT` sub-counters per outcome; a total is the
//! sum over its shards. The store reports `NotFound` when an increment
//! targets a group that has never been initialized — callers recover by
//! creating the group lazily. `ensure_group` is conditional-create: it only
//! fills in slots that are absent, so a redundant initialization racing with
//! a live increment never loses the increment.

use crate::config::SHARD_COUNT;
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use types::prelude::{GroupId, Outcome, Tally};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no counters for group {group}")]
    NotFound { group: String },

    #[error("counter store failure: {0}")]
    Backend(String),
}

impl StoreError {
    fn not_found(group: &GroupId) -> Self {
        Self::NotFound {
            group: group.to_string(),
        }
    }
}

/// Key-value counter store with atomic increment.
///
/// Mirrors the document-store collaborator the service is deployed against;
/// the in-process [`MemoryStore`] stands in for it here.
#[async_trait]
pub trait CounterStore: Send + Sync {
    async fn get(&self, group: &GroupId, outcome: Outcome, shard: u8) -> Result<u64, StoreError>;

    async fn set(
        &self,
        group: &GroupId,
        outcome: Outcome,
        shard: u8,
        value: u64,
    ) -> Result<(), StoreError>;

    /// Atomically add `delta`, returning the new count. Fails with
    /// `NotFound` if the (group, outcome, shard) path is absent.
    async fn increment(
        &self,
        group: &GroupId,
        outcome: Outcome,
        shard: u8,
        delta: u64,
    ) -> Result<u64, StoreError>;

    /// Create every shard slot of `group` that does not exist yet, zeroed.
    /// Slots that already exist keep their counts.
    async fn ensure_group(&self, group: &GroupId) -> Result<(), StoreError>;

    async fn list_groups(&self) -> Result<Vec<GroupId>, StoreError>;

    /// All (shard, count) pairs for one outcome. Empty for an unknown
    /// group, matching a document store streaming an absent collection.
    async fn stream_shards(
        &self,
        group: &GroupId,
        outcome: Outcome,
    ) -> Result<Vec<(u8, u64)>, StoreError>;
}

struct GroupShards {
    heads: [AtomicU64; SHARD_COUNT as usize],
    tails: [AtomicU64; SHARD_COUNT as usize],
}

impl Default for GroupShards {
    fn default() -> Self {
        Self {
            heads: std::array::from_fn(|_| AtomicU64::new(0)),
            tails: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }
}

impl GroupShards {
    fn slots(&self, outcome: Outcome) -> &[AtomicU64; SHARD_COUNT as usize] {
        match outcome {
            Outcome::Head => &self.heads,
            Outcome::Tail => &self.tails,
        }
    }
}

/// In-process counter store over a concurrent map.
#[derive(Default)]
pub struct MemoryStore {
    groups: DashMap<GroupId, GroupShards>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for MemoryStore {
    async fn get(&self, group: &GroupId, outcome: Outcome, shard: u8) -> Result<u64, StoreError> {
        let shards = self
            .groups
            .get(group)
            .ok_or_else(|| StoreError::not_found(group))?;
        let cell = shards
            .slots(outcome)
            .get(shard as usize)
            .ok_or_else(|| StoreError::not_found(group))?;
        Ok(cell.load(Ordering::SeqCst))
    }

    async fn set(
        &self,
        group: &GroupId,
        outcome: Outcome,
        shard: u8,
        value: u64,
    ) -> Result<(), StoreError> {
        let shards = self.groups.entry(group.clone()).or_default();
        let cell = shards
            .slots(outcome)
            .get(shard as usize)
            .ok_or_else(|| StoreError::not_found(group))?;
        cell.store(value, Ordering::SeqCst);
        Ok(())
    }

    async fn increment(
        &self,
        group: &GroupId,
        outcome: Outcome,
        shard: u8,
        delta: u64,
    ) -> Result<u64, StoreError> {
        let shards = self
            .groups
            .get(group)
            .ok_or_else(|| StoreError::not_found(group))?;
        let cell = shards
            .slots(outcome)
            .get(shard as usize)
            .ok_or_else(|| StoreError::not_found(group))?;
        Ok(cell.fetch_add(delta, Ordering::SeqCst) + delta)
    }

    async fn ensure_group(&self, group: &GroupId) -> Result<(), StoreError> {
        // entry().or_default() creates the whole shard block only if the
        // group is absent; an existing block is left untouched.
        self.groups.entry(group.clone()).or_default();
        Ok(())
    }

    async fn list_groups(&self) -> Result<Vec<GroupId>, StoreError> {
        Ok(self.groups.iter().map(|e| e.key().clone()).collect())
    }

    async fn stream_shards(
        &self,
        group: &GroupId,
        outcome: Outcome,
    ) -> Result<Vec<(u8, u64)>, StoreError> {
        let Some(shards) = self.groups.get(group) else {
            return Ok(Vec::new());
        };
        Ok(shards
            .slots(outcome)
            .iter()
            .enumerate()
            .map(|(shard, cell)| (shard as u8, cell.load(Ordering::SeqCst)))
            .collect())
    }
}

/// Sum a group's shard counters into head/tail totals.
pub async fn tally(store: &dyn CounterStore, group: &GroupId) -> Result<Tally, StoreError> {
    let mut tally = Tally::default();
    for (_, count) in store.stream_shards(group, Outcome::Head).await? {
        tally.heads += count;
    }
    for (_, count) in store.stream_shards(group, Outcome::Tail).await? {
        tally.tails += count;
    }
    Ok(tally)
}

/// Point-in-time tallies for every known group, in deterministic order.
pub async fn snapshot(store: &dyn CounterStore) -> Result<BTreeMap<GroupId, Tally>, StoreError> {
    let mut groups = BTreeMap::new();
    for group in store.list_groups().await? {
        let totals = tally(store, &group).await?;
        groups.insert(group, totals);
    }
    Ok(groups)
}
