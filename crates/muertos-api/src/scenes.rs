//! Handlers for `/scenes` endpoints.

use axum::{Json, extract::State, response::IntoResponse};
use muertos_core::{
  narrative::StoryScene,
  record::Versioned,
  store::{RecordStore, VoteStore},
};

use crate::{AppState, error::ApiError, saved_response};

/// `GET /scenes`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Versioned<StoryScene>>>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let scenes = state
    .store
    .list::<StoryScene>()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(scenes))
}

/// `POST /scenes` — create-or-update through the versioned save.
pub async fn save<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<StoryScene>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let saved = state
    .store
    .save(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(saved_response(saved))
}
