use crate::broadcast::Broadcaster;
use crate::config::Config;
use crate::engine::FlipEngine;
use crate::provider::RandomProvider;
use crate::store::CounterStore;
use crate::supply::RandomSupply;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<FlipEngine>,
    pub store: Arc<dyn CounterStore>,
    pub hub: Arc<Broadcaster>,
}

impl AppState {
    pub fn new(
        config: &Config,
        provider: Arc<dyn RandomProvider>,
        store: Arc<dyn CounterStore>,
    ) -> Self {
        let supply = Arc::new(RandomSupply::new(
            provider,
            config.buffer_target,
            config.decimal_places,
        ));
        let hub = Arc::new(Broadcaster::new());
        let engine = Arc::new(FlipEngine::new(
            supply,
            Arc::clone(&store),
            Arc::clone(&hub),
            config,
        ));
        Self { engine, store, hub }
    }
}
