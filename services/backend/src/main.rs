use backend::config::Config;
use backend::provider::{HttpRandomProvider, RandomProvider};
use backend::router::create_router;
use backend::state::AppState;
use backend::store::{CounterStore, MemoryStore};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("Starting coin-flip API service");

    let config = Config::from_env();
    let provider: Arc<dyn RandomProvider> = Arc::new(HttpRandomProvider::new(
        config.provider_url.clone(),
        config.provider_api_key.clone(),
    )?);
    let store: Arc<dyn CounterStore> = Arc::new(MemoryStore::new());

    let state = AppState::new(&config, provider, store);
    let app = create_router(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
