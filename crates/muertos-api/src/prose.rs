//! Handlers for `/prose` endpoints.

use axum::{
  Json,
  extract::{Path, State},
  response::IntoResponse,
};
use muertos_core::{
  narrative::Prose,
  record::{RecordId, Versioned},
  store::{RecordStore, VoteStore},
};

use crate::{AppState, error::ApiError, parse_token_id, saved_response};

/// `GET /prose`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Versioned<Prose>>>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let prose = state
    .store
    .list::<Prose>()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(prose))
}

/// `GET /prose/:tokenId`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(token_id): Path<String>,
) -> Result<Json<Versioned<Prose>>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let token_id = parse_token_id(&token_id)?;
  let prose = state
    .store
    .find::<Prose>(RecordId::Token(token_id))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("prose for token {token_id} not found"))
    })?;
  Ok(Json(prose))
}

/// `POST /prose` — create-or-update through the versioned save.
pub async fn save<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<Prose>,
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
