use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use types::prelude::GroupId;

/// `GET /groups` — every group id known to the counter store.
pub async fn groups(State(state): State<AppState>) -> Result<Json<Vec<GroupId>>, AppError> {
    let groups = state.store.list_groups().await?;
    Ok(Json(groups))
}
