//! Pre-fetched randomness buffer
//!
//! Keeps a FIFO queue of provider-supplied fractions so that a flip never
//! pays a network round-trip when the buffer is warm. The queue, the
//! cooldown expiry, and the refill itself all live under one async mutex:
//! contended draws against an empty buffer suspend on the lock, so exactly
//! one of them performs the refill and the rest pop from the batch it
//! fetched.
//!
//! The cooldown expiry is only advanced on a successful refill; a failed
//! refill leaves the queue and the expiry untouched.

use crate::provider::{ProviderError, RandomProvider};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

struct SupplyState {
    queue: VecDeque<f64>,
    /// Refill requests must not be issued before this instant.
    not_before: Option<Instant>,
}

pub struct RandomSupply {
    provider: Arc<dyn RandomProvider>,
    target: usize,
    decimal_places: u8,
    state: Mutex<SupplyState>,
}

impl RandomSupply {
    pub fn new(provider: Arc<dyn RandomProvider>, target: usize, decimal_places: u8) -> Self {
        Self {
            provider,
            target,
            decimal_places,
            state: Mutex::new(SupplyState {
                queue: VecDeque::with_capacity(target),
                not_before: None,
            }),
        }
    }

    /// Pop the next buffered fraction, refilling the buffer first if it is
    /// empty. Values are returned in provider order.
    pub async fn draw(&self) -> Result<f64, ProviderError> {
        let mut state = self.state.lock().await;

        if state.queue.is_empty() {
            self.refill(&mut state).await?;
        }

        state
            .queue
            .pop_front()
            .ok_or_else(|| ProviderError::Malformed("provider returned no values".to_string()))
    }

    async fn refill(&self, state: &mut SupplyState) -> Result<(), ProviderError> {
        if let Some(not_before) = state.not_before {
            let now = Instant::now();
            if now < not_before {
                debug!(
                    wait_ms = (not_before - now).as_millis() as u64,
                    "Cooldown active, deferring refill"
                );
                tokio::time::sleep_until(not_before).await;
            }
        }

        let batch = self
            .provider
            .fetch(self.target, self.decimal_places)
            .await?;

        if batch.values.is_empty() {
            warn!("Provider returned an empty batch");
            return Err(ProviderError::Malformed("empty batch".to_string()));
        }
        if let Some(bad) = batch.values.iter().find(|v| !(0.0..1.0).contains(*v)) {
            warn!(value = *bad, "Provider returned a fraction outside [0,1)");
            return Err(ProviderError::Malformed(format!(
                "fraction out of range: {bad}"
            )));
        }

        state.not_before = Some(Instant::now() + batch.advisory_delay);
        info!(
            fetched = batch.values.len(),
            advisory_ms = batch.advisory_delay.as_millis() as u64,
            "Buffer refilled"
        );
        state.queue.extend(batch.values);
        Ok(())
    }
}
