//! End-to-end flip flow tests
//!
//! Exercises the wired service state (supply + engine + store + broadcaster)
//! without the HTTP layer:
//! - Concurrent flips against an empty buffer share a single upstream refill
//! - Stream sessions observe flips in publish order
//! - Sessions registered after a flip do not see it

use async_trait::async_trait;
use backend::config::Config;
use backend::provider::{ProviderError, RandomBatch, RandomProvider};
use backend::state::AppState;
use backend::store::{self, CounterStore, MemoryStore};
use futures::{FutureExt, StreamExt};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use types::prelude::{FlipEvent, GroupId};

struct ScriptedProvider {
    script: Mutex<VecDeque<Result<RandomBatch, ProviderError>>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    fn new(script: Vec<Result<RandomBatch, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl RandomProvider for ScriptedProvider {
    async fn fetch(&self, _count: usize, _dp: u8) -> Result<RandomBatch, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .await
            .pop_front()
            .expect("provider called more often than scripted")
    }
}

fn batch(values: &[f64]) -> Result<RandomBatch, ProviderError> {
    Ok(RandomBatch {
        values: values.to_vec(),
        advisory_delay: Duration::ZERO,
    })
}

fn make_state(provider: Arc<ScriptedProvider>, buffer_target: usize) -> AppState {
    let config = Config {
        buffer_target,
        ..Config::default()
    };
    let store: Arc<dyn CounterStore> = Arc::new(MemoryStore::new());
    AppState::new(&config, provider, store)
}

#[tokio::test]
async fn test_concurrent_flips_share_one_refill() {
    let values: Vec<f64> = (0..25).map(|i| (i as f64 + 0.5) / 25.0).collect();
    let provider = ScriptedProvider::new(vec![batch(&values)]);
    let state = make_state(provider.clone(), 25);

    let mut handles = Vec::new();
    for _ in 0..2 {
        let engine = Arc::clone(&state.engine);
        handles.push(tokio::spawn(async move {
            engine.flip(&GroupId::from("race")).await.unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

    let totals = store::tally(state.store.as_ref(), &GroupId::from("race"))
        .await
        .unwrap();
    assert_eq!(totals.total(), 2);
}

#[tokio::test]
async fn test_sessions_receive_flips_in_publish_order() {
    let provider = ScriptedProvider::new(vec![batch(&[0.1, 0.9, 0.5, 0.7])]);
    let state = make_state(provider, 4);
    let group = GroupId::from("red");

    let mut session = state.hub.subscribe();

    let mut outcomes = Vec::new();
    for _ in 0..4 {
        outcomes.push(state.engine.flip(&group).await.unwrap());
    }

    for outcome in outcomes {
        let event = session.next().await.unwrap();
        assert_eq!(event, FlipEvent::new("red", outcome));
    }
    assert!(session.next().now_or_never().is_none());
}

#[tokio::test]
async fn test_late_session_misses_earlier_flips() {
    let provider = ScriptedProvider::new(vec![batch(&[0.1, 0.9])]);
    let state = make_state(provider, 2);

    let first_outcome = state.engine.flip(&GroupId::from("early")).await.unwrap();

    let mut session = state.hub.subscribe();
    let second_outcome = state.engine.flip(&GroupId::from("late")).await.unwrap();

    // Only the flip published after registration is delivered.
    let event = session.next().await.unwrap();
    assert_eq!(event, FlipEvent::new("late", second_outcome));
    assert_ne!(event, FlipEvent::new("early", first_outcome));
    assert!(session.next().now_or_never().is_none());
}
