//! Handlers for `/prompts` endpoints — named prompt templates.

use axum::{
  Json,
  extract::{Path, State},
};
use muertos_core::{
  record::{RecordId, Versioned},
  store::{RecordStore, VoteStore},
  world::RootPrompt,
};

use crate::{AppState, error::ApiError};

/// `GET /prompts/:name` — get, creating a placeholder template on first
/// sight of the name so editors always have a row to fill in.
pub async fn get_or_create<S>(
  State(state): State<AppState<S>>,
  Path(name): Path<String>,
) -> Result<Json<Versioned<RootPrompt>>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  if name.is_empty() {
    return Err(ApiError::BadRequest("invalid prompt name".into()));
  }

  if let Some(existing) = state
    .store
    .find::<RootPrompt>(RecordId::Name(name.clone()))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
  {
    return Ok(Json(existing));
  }

  let id = state
    .store
    .next_serial::<RootPrompt>()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let saved = state
    .store
    .save(RootPrompt {
      id,
      name,
      prompt_text: "Default prompt text".into(),
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(saved.record))
}
