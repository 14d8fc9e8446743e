//! Service configuration
//!
//! The flip semantics are governed by fixed constants; only deployment
//! concerns (bind address, provider endpoint and credentials) are read from
//! the environment.

use std::net::SocketAddr;

/// Number of sub-counters per (group, outcome) pair.
pub const SHARD_COUNT: u8 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    /// Number of fractions requested per provider batch.
    pub buffer_target: usize,
    /// Decimal precision requested from the provider.
    pub decimal_places: u8,
    /// Lower bound of the per-group threshold band.
    pub threshold_low: f64,
    /// Width of the per-group threshold band.
    pub threshold_width: f64,
    /// Randomness provider endpoint (JSON-RPC).
    pub provider_url: String,
    /// Provider API key.
    pub provider_api_key: String,
    /// Listen address for the HTTP server.
    pub bind_addr: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            buffer_target: 25,
            decimal_places: 14,
            threshold_low: 0.35,
            threshold_width: 0.30,
            provider_url: "https://api.random.org/json-rpc/4/invoke".to_string(),
            provider_api_key: String::new(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

impl Config {
    /// Defaults with deployment settings taken from the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("RANDOM_PROVIDER_URL") {
            config.provider_url = url;
        }
        if let Ok(key) = std::env::var("RANDOM_PROVIDER_API_KEY") {
            config.provider_api_key = key;
        }
        if let Ok(addr) = std::env::var("BIND_ADDR") {
            match addr.parse() {
                Ok(parsed) => config.bind_addr = parsed,
                Err(e) => tracing::warn!(addr = %addr, error = %e, "Ignoring unparseable BIND_ADDR"),
            }
        }
        config
    }
}
