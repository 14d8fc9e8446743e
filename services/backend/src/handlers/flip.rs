use crate::error::AppError;
use crate::models::GroupQuery;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use types::prelude::Outcome;

/// `POST /flip?id={group}` — flip a coin for the group.
///
/// Consumes one buffered draw, increments one shard counter, and publishes
/// the outcome to live stream sessions.
pub async fn flip(
    State(state): State<AppState>,
    Query(query): Query<GroupQuery>,
) -> Result<Json<Outcome>, AppError> {
    let outcome = state.engine.flip(&query.id).await?;
    Ok(Json(outcome))
}
