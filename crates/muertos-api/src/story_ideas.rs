//! Handlers for `/story-ideas` endpoints.

use axum::{
  Json,
  extract::{Path, State},
  response::IntoResponse,
};
use muertos_core::{
  narrative::StoryIdea,
  record::{RecordId, Versioned},
  store::{RecordStore, VoteStore},
};

use crate::{AppState, error::ApiError, parse_token_id, saved_response};

/// `GET /story-ideas`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Versioned<StoryIdea>>>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let ideas = state
    .store
    .list::<StoryIdea>()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(ideas))
}

/// `GET /story-ideas/:tokenId`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(token_id): Path<String>,
) -> Result<Json<Versioned<StoryIdea>>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let token_id = parse_token_id(&token_id)?;
  let idea = state
    .store
    .find::<StoryIdea>(RecordId::Token(token_id))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("story idea for token {token_id} not found"))
    })?;
  Ok(Json(idea))
}

/// `POST /story-ideas` — create-or-update through the versioned save.
pub async fn save<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<StoryIdea>,
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
