use crate::error::AppError;
use crate::state::AppState;
use crate::store;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{future, stream, Stream, StreamExt};
use tracing::info;

/// `GET /stream` — live flip feed.
///
/// The session registers with the broadcaster before the snapshot is
/// computed, so flips landing mid-snapshot wait in the session queue
/// instead of being lost. The first frame is a `sync` event carrying every
/// known group's totals; each later frame is an `incr` event carrying one
/// `[group, outcome]` pair. Dropping the connection drops the session,
/// which deregisters it.
pub async fn stream(
    State(state): State<AppState>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, AppError> {
    let session = state.hub.subscribe();
    let snapshot = store::snapshot(state.store.as_ref()).await?;
    info!(
        token = %session.token(),
        groups = snapshot.len(),
        "Stream session syncing"
    );

    let sync = Event::default().event("sync").json_data(&snapshot);
    let incrs = session.map(|event| Event::default().event("incr").json_data(&event));

    let frames = stream::once(future::ready(sync)).chain(incrs);
    Ok(Sse::new(frames).keep_alive(KeepAlive::default()))
}
