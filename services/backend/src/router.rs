use crate::handlers::{self, flip, groups, stream, tally};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::welcome))
        .route("/flip", post(flip::flip))
        .route("/count", get(tally::count))
        .route("/groups", get(groups::groups))
        .route("/stream", get(stream::stream))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
