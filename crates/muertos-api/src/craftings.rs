//! Handlers for `/craftings` endpoints — storybuilding passes.
//!
//! Clients reserve an id via `next-id` before minting, then post the pass.
//! Once the holder accepts a generated story it lands in `ai_text`.

use axum::{
  Json,
  extract::{Path, State},
  response::IntoResponse,
};
use muertos_core::{
  record::{RecordId, Versioned},
  store::{RecordStore, VoteStore},
  world::Crafting,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError, parse_token_id, saved_response};

/// `GET /craftings`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Versioned<Crafting>>>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let craftings = state
    .store
    .list::<Crafting>()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(craftings))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextId {
  pub next_id: i64,
}

/// `GET /craftings/next-id`
pub async fn next_id<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<NextId>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let next_id = state
    .store
    .next_serial::<Crafting>()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(NextId { next_id }))
}

/// `GET /craftings/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Versioned<Crafting>>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let id = parse_token_id(&id)?;
  let crafting = state
    .store
    .find::<Crafting>(RecordId::Token(id))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("crafting {id} not found")))?;
  Ok(Json(crafting))
}

/// `POST /craftings` — create-or-update a pass under its reserved id.
pub async fn save<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<Crafting>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  if body.id < 1 {
    return Err(ApiError::BadRequest("crafting id must be positive".into()));
  }
  if body.name.is_empty() {
    return Err(ApiError::BadRequest("crafting name is required".into()));
  }

  let saved = state
    .store
    .save(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(saved_response(saved))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiTextBody {
  pub ai_text: String,
}

/// `POST /craftings/:id/ai-text` — attach the accepted story text.
pub async fn set_ai_text<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  Json(body): Json<AiTextBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let id = parse_token_id(&id)?;
  let current = state
    .store
    .find::<Crafting>(RecordId::Token(id))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("crafting {id} not found")))?;

  let mut crafting = current.record;
  crafting.ai_text = Some(body.ai_text);

  let saved = state
    .store
    .save(crafting)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(saved_response(saved))
}
