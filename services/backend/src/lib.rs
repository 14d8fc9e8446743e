//! Coin-flip API service
//!
//! Serves randomized coin flips backed by a quota-limited randomness
//! provider, per-group tallies over sharded counters, and a live event
//! stream of flip outcomes.
//!
//! # Architecture
//!
//! ```text
//! POST /flip
//!     │
//! ┌───▼────────┐      ┌──────────────┐
//! │ FlipEngine │─────▶│ RandomSupply │──▶ batch refill (JSON-RPC,
//! └───┬────────┘      └──────────────┘    advisory cooldown)
//!     │
//!     ├─────────────▶ CounterStore  (sharded head/tail counters)
//!     │
//!     └─────────────▶ Broadcaster ──▶ stream sessions (SSE:
//!                                     sync snapshot, then incr)
//! ```

pub mod broadcast;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod models;
pub mod provider;
pub mod router;
pub mod state;
pub mod store;
pub mod supply;
