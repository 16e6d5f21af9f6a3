//! Handlers for `/characters` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/characters` | All current character sheets |
//! | `GET`  | `/characters/:tokenId` | 404 if not found |
//! | `POST` | `/characters` | Create-or-update through the versioned save |

use axum::{
  Json,
  extract::{Path, State},
  response::IntoResponse,
};
use muertos_core::{
  character::Character,
  record::{RecordId, Versioned},
  store::{RecordStore, VoteStore},
};

use crate::{AppState, error::ApiError, parse_token_id, saved_response};

/// `GET /characters`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Versioned<Character>>>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let characters = state
    .store
    .list::<Character>()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(characters))
}

/// `GET /characters/:tokenId`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(token_id): Path<String>,
) -> Result<Json<Versioned<Character>>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let token_id = parse_token_id(&token_id)?;
  let character = state
    .store
    .find::<Character>(RecordId::Token(token_id))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("character {token_id} not found")))?;
  Ok(Json(character))
}

/// `POST /characters` — body is the character sheet payload.
pub async fn save<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<Character>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  if body.name.is_empty() {
    return Err(ApiError::BadRequest("character name is required".into()));
  }

  let saved = state
    .store
    .save(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(saved_response(saved))
}
