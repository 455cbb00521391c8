use axum::{extract::State, Json};
use metrics::counter;
use service_core::error::AppError;

use crate::models::Story;
use crate::startup::AppState;

pub const FETCH_STORIES_FAILED: &str = "Failed to fetch stories";

/// `GET /api/stories`: the whole collection, unpaginated.
#[tracing::instrument(skip(state))]
pub async fn list_stories(State(state): State<AppState>) -> Result<Json<Vec<Story>>, AppError> {
    let store = state.gate.store()?;

    let stories = store
        .list_stories()
        .await
        .map_err(|e| AppError::database(FETCH_STORIES_FAILED, e))?;

    counter!("stories_served_total").increment(stories.len() as u64);
    tracing::info!(count = stories.len(), "Served stories");

    Ok(Json(stories))
}
