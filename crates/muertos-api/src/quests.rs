//! Handlers for `/quests` endpoints. Quests are seeded data; the API only
//! reads them.

use axum::{
  Json,
  extract::{Path, State},
};
use muertos_core::{
  record::{RecordId, Versioned},
  store::{RecordStore, VoteStore},
  world::Quest,
};

use crate::{AppState, error::ApiError};

/// `GET /quests`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Versioned<Quest>>>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let quests = state
    .store
    .list::<Quest>()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(quests))
}

/// `GET /quests/:name`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(name): Path<String>,
) -> Result<Json<Versioned<Quest>>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let quest = state
    .store
    .find::<Quest>(RecordId::Name(name.clone()))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("quest {name:?} not found")))?;
  Ok(Json(quest))
}
