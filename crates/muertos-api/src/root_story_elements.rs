//! Handlers for `/root-story-elements` endpoints.
//!
//! Root elements are materialised lazily: the first lookup of an unknown
//! name creates an empty entry with the next serial id, so the curation UI
//! always has a row to edit.

use axum::{
  Json,
  extract::{Path, State},
  response::IntoResponse,
};
use muertos_core::{
  element::RootStoryElement,
  entity::merge_attributes,
  record::{RecordId, Versioned},
  store::{RecordStore, VoteStore},
};

use crate::{AppState, error::ApiError, saved_response};

/// `GET /root-story-elements`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Versioned<RootStoryElement>>>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let elements = state
    .store
    .list::<RootStoryElement>()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(elements))
}

/// `GET /root-story-elements/:name` — get, creating an empty entry on first
/// sight of the name.
pub async fn get_or_create<S>(
  State(state): State<AppState<S>>,
  Path(name): Path<String>,
) -> Result<Json<Versioned<RootStoryElement>>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  if name.is_empty() {
    return Err(ApiError::BadRequest("invalid root element name".into()));
  }

  if let Some(existing) = state
    .store
    .find::<RootStoryElement>(RecordId::Name(name.clone()))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
  {
    return Ok(Json(existing));
  }

  let id = state
    .store
    .next_serial::<RootStoryElement>()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let saved = state
    .store
    .save(RootStoryElement {
      id,
      name,
      description: String::new(),
      image: String::new(),
      aspect: None,
      attributes: Vec::new(),
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(saved.record))
}

/// `POST /root-story-elements` — create-or-update by name; attributes are
/// merged by trait type rather than replaced.
pub async fn save<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RootStoryElement>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  if body.name.is_empty() {
    return Err(ApiError::BadRequest("root element name is required".into()));
  }

  let existing = state
    .store
    .find::<RootStoryElement>(RecordId::Name(body.name.clone()))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let element = match existing {
    Some(current) => RootStoryElement {
      attributes: merge_attributes(&current.record.attributes, &body.attributes),
      description: body.description,
      image: body.image,
      aspect: body.aspect,
      ..current.record
    },
    None => {
      let id = state
        .store
        .next_serial::<RootStoryElement>()
        .await
        .map_err(|e| ApiError::Store(Box::new(e)))?;
      RootStoryElement { id, ..body }
    }
  };

  let saved = state
    .store
    .save(element)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(saved_response(saved))
}
