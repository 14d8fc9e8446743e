use crate::error::AppError;
use crate::models::GroupQuery;
use crate::state::AppState;
use crate::store;
use axum::{
    extract::{Query, State},
    Json,
};
use types::prelude::Tally;

/// `GET /count?id={group}` — the group's summed head/tail totals.
///
/// A group that has never flipped reads as all zeros.
pub async fn count(
    State(state): State<AppState>,
    Query(query): Query<GroupQuery>,
) -> Result<Json<Tally>, AppError> {
    let totals = store::tally(state.store.as_ref(), &query.id).await?;
    Ok(Json(totals))
}
