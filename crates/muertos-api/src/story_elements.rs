//! Handlers for `/story-elements` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/story-elements` | Optional `?isRoot=true`, `?address=`, `?aspect=` |
//! | `POST` | `/story-elements` | Create-or-update by name |
//! | `GET`  | `/story-elements/:id` | Lookup by serial id |
//! | `GET`  | `/story-elements/name/:name` | Lookup by name |
//! | `POST` | `/story-elements/name/:name/registration` | Partial canonization patch |
//! | `GET`  | `/story-elements/children/:name` | Elements whose Parents attribute mentions the name |
//! | `GET`  | `/story-elements/catalog/:aspect` | Count per muerto aspect |
//! | `GET`  | `/story-elements/craftings/:name` | Craftings listing the element |
//! | `GET`  | `/story-elements/associations/:trait` | Elements mapped to a token trait |

use axum::{
  Json,
  extract::{Path, Query, State},
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use muertos_core::{
  element::{ChildData, StoryElement, StoryElementMapping},
  entity::{Attribute, trait_value},
  record::{RecordId, Versioned},
  store::{RecordStore, VoteStore},
  world::Crafting,
};
use serde::Deserialize;

use crate::{AppState, error::ApiError, parse_token_id, saved_response};

/// Muerto aspects the catalog endpoint reports on.
const CATALOG_ASPECTS: [&str; 4] =
  ["Muerto Body", "Muerto Mask", "Muerto Headwear", "Muerto Expression"];

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub is_root: Option<bool>,
  pub address: Option<String>,
  pub aspect:  Option<String>,
}

/// `GET /story-elements[?isRoot=true][&address=...][&aspect=...]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Versioned<StoryElement>>>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let mut elements = state
    .store
    .list::<StoryElement>()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  if params.is_root == Some(true) {
    elements.retain(|e| e.record.is_root);
  }
  if let Some(address) = &params.address {
    elements.retain(|e| &e.record.address == address);
  }
  if let Some(aspect) = &params.aspect {
    elements.retain(|e| {
      trait_value(&e.record.attributes, "Aspect") == Some(aspect.as_str())
    });
  }

  Ok(Json(elements))
}

// ─── Save ─────────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /story-elements`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewElementBody {
  pub name:        String,
  pub description: String,
  pub image:       String,
  #[serde(default)]
  pub aspect:      Option<String>,
  #[serde(default)]
  pub text:        Option<String>,
  #[serde(default)]
  pub parents:     Option<String>,
  pub state:       String,
  pub address:     String,
}

/// `POST /story-elements` — create-or-update an element by name.
pub async fn save<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewElementBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  if body.name.is_empty()
    || body.description.is_empty()
    || body.image.is_empty()
    || body.state.is_empty()
    || body.address.is_empty()
  {
    return Err(ApiError::BadRequest("missing required fields".into()));
  }

  let attributes = vec![
    Attribute::new("Aspect", body.aspect.clone().unwrap_or_default()),
    Attribute::new("Text", body.text.clone().unwrap_or_default()),
    Attribute::new("Parents", body.parents.clone().unwrap_or_default()),
  ];

  let existing = state
    .store
    .find::<StoryElement>(RecordId::Name(body.name.clone()))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let element = match existing {
    Some(current) => StoryElement {
      description: body.description,
      image: body.image,
      aspect: body.aspect,
      attributes,
      state: body.state,
      address: body.address,
      ..current.record
    },
    None => {
      let id = state
        .store
        .next_serial::<StoryElement>()
        .await
        .map_err(|e| ApiError::Store(Box::new(e)))?;
      StoryElement {
        id,
        name: body.name,
        description: body.description,
        image: body.image,
        wbp_image: None,
        aspect: body.aspect,
        is_root: false,
        attributes,
        state: body.state,
        address: body.address,
        is_submitted: false,
        ip_id: None,
        license_terms_id: None,
        license_token_id: None,
        is_registered: None,
        derivative_registration: None,
        children_data: None,
        date_canonized: None,
      }
    }
  };

  let saved = state
    .store
    .save(element)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(saved_response(saved))
}

// ─── Lookups ──────────────────────────────────────────────────────────────────

/// `GET /story-elements/:id`
pub async fn get_by_id<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Versioned<StoryElement>>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let id = parse_token_id(&id)?;

  let element = state
    .store
    .list::<StoryElement>()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .into_iter()
    .find(|e| e.record.id == id)
    .ok_or_else(|| ApiError::NotFound(format!("story element {id} not found")))?;
  Ok(Json(element))
}

/// `GET /story-elements/name/:name`
pub async fn get_by_name<S>(
  State(state): State<AppState<S>>,
  Path(name): Path<String>,
) -> Result<Json<Versioned<StoryElement>>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let element = state
    .store
    .find::<StoryElement>(RecordId::Name(name.clone()))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("story element {name:?} not found"))
    })?;
  Ok(Json(element))
}

// ─── Registration patch ──────────────────────────────────────────────────────

/// Partial update applied after canonization. Fields left out keep their
/// current values; the patch still advances the element's version.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPatch {
  #[serde(default)]
  pub ip_id:                   Option<String>,
  #[serde(default)]
  pub state:                   Option<String>,
  #[serde(default)]
  pub is_registered:           Option<bool>,
  #[serde(default)]
  pub license_terms_id:        Option<String>,
  #[serde(default)]
  pub license_token_id:        Option<String>,
  #[serde(default)]
  pub derivative_registration: Option<String>,
  #[serde(default)]
  pub children_data:           Option<Vec<ChildData>>,
  #[serde(default)]
  pub date_canonized:          Option<DateTime<Utc>>,
}

/// `POST /story-elements/name/:name/registration`
pub async fn update_registration<S>(
  State(state): State<AppState<S>>,
  Path(name): Path<String>,
  Json(patch): Json<RegistrationPatch>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let current = state
    .store
    .find::<StoryElement>(RecordId::Name(name.clone()))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("story element {name:?} not found"))
    })?;

  let mut element = current.record;
  if let Some(ip_id) = patch.ip_id {
    element.ip_id = Some(ip_id);
  }
  if let Some(state_field) = patch.state {
    element.state = state_field;
  }
  if let Some(is_registered) = patch.is_registered {
    element.is_registered = Some(is_registered);
  }
  if let Some(license_terms_id) = patch.license_terms_id {
    element.license_terms_id = Some(license_terms_id);
  }
  if let Some(license_token_id) = patch.license_token_id {
    element.license_token_id = Some(license_token_id);
  }
  if let Some(derivative) = patch.derivative_registration {
    element.derivative_registration = Some(derivative);
  }
  if let Some(children) = patch.children_data {
    element.children_data = Some(children);
  }
  if let Some(date) = patch.date_canonized {
    element.date_canonized = Some(date);
  }

  let saved = state
    .store
    .save(element)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(saved_response(saved))
}

// ─── Derived reads ────────────────────────────────────────────────────────────

/// `GET /story-elements/children/:name` — elements whose Parents attribute
/// mentions `name` (case-insensitive substring, as authored lists are
/// free-form comma text).
pub async fn children<S>(
  State(state): State<AppState<S>>,
  Path(name): Path<String>,
) -> Result<Json<Vec<Versioned<StoryElement>>>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let needle = name.to_lowercase();
  let mut elements = state
    .store
    .list::<StoryElement>()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  elements.retain(|e| {
    trait_value(&e.record.attributes, "Parents")
      .is_some_and(|parents| parents.to_lowercase().contains(&needle))
  });
  Ok(Json(elements))
}

#[derive(Debug, serde::Serialize)]
pub struct CatalogCount {
  pub count: usize,
}

/// `GET /story-elements/catalog/:aspect`
pub async fn catalog_count<S>(
  State(state): State<AppState<S>>,
  Path(aspect): Path<String>,
) -> Result<Json<CatalogCount>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  if !CATALOG_ASPECTS.contains(&aspect.as_str()) {
    return Err(ApiError::BadRequest(format!("invalid aspect {aspect:?}")));
  }

  let count = state
    .store
    .list::<StoryElement>()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .iter()
    .filter(|e| {
      trait_value(&e.record.attributes, "Aspect") == Some(aspect.as_str())
    })
    .count();
  Ok(Json(CatalogCount { count }))
}

/// `GET /story-elements/craftings/:name` — craftings whose `Story Elements`
/// attribute lists the element name (exact entry in the comma-separated
/// list).
pub async fn craftings_for<S>(
  State(state): State<AppState<S>>,
  Path(name): Path<String>,
) -> Result<Json<Vec<Versioned<Crafting>>>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let mut craftings = state
    .store
    .list::<Crafting>()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  craftings.retain(|c| {
    trait_value(&c.record.attributes, "Story Elements").is_some_and(|list| {
      list.split(',').any(|entry| entry.trim() == name)
    })
  });
  Ok(Json(craftings))
}

/// `GET /story-elements/associations/:trait` — elements mapped to a token
/// trait value.
pub async fn associations<S>(
  State(state): State<AppState<S>>,
  Path(trait_name): Path<String>,
) -> Result<Json<Vec<Versioned<StoryElement>>>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let element_ids: Vec<i64> = state
    .store
    .list::<StoryElementMapping>()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .into_iter()
    .filter(|m| m.record.trait_name == trait_name)
    .map(|m| m.record.story_element_id)
    .collect();

  let mut elements = state
    .store
    .list::<StoryElement>()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  elements.retain(|e| element_ids.contains(&e.record.id));
  Ok(Json(elements))
}
