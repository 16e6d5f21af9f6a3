//! Handlers for `/character-names` endpoints — the claimed-name registry.
//!
//! A given-name/surname pair may belong to at most one token. Re-claiming
//! the same pair for the same token is a no-op; claiming a pair another
//! token holds is a 409.

use axum::{
  Json,
  extract::{Query, State},
  response::IntoResponse,
};
use muertos_core::{
  character::CharacterName,
  record::{RecordId, Versioned},
  store::{RecordStore, VoteStore},
};
use serde::Deserialize;

use crate::{AppState, error::ApiError, parse_token_id, saved_response};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupParams {
  pub token_id: Option<String>,
}

/// `GET /character-names?tokenId=<id>`
pub async fn get_for_token<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<LookupParams>,
) -> Result<Json<Versioned<CharacterName>>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let raw = params
    .token_id
    .ok_or_else(|| ApiError::BadRequest("tokenId is required".into()))?;
  let token_id = parse_token_id(&raw)?;

  let name = state
    .store
    .find::<CharacterName>(RecordId::Token(token_id))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("no character name for token {token_id}"))
    })?;
  Ok(Json(name))
}

/// `POST /character-names` — claim a name pair for a token.
pub async fn claim<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<CharacterName>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  if body.given_name.is_empty() || body.surname.is_empty() {
    return Err(ApiError::BadRequest(
      "givenName and surname are required".into(),
    ));
  }

  // The pair must not already belong to a different token.
  let claimed = state
    .store
    .list::<CharacterName>()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .into_iter()
    .find(|existing| {
      existing.record.given_name == body.given_name
        && existing.record.surname == body.surname
    });

  if let Some(existing) = claimed {
    if existing.record.token_id != body.token_id {
      return Err(ApiError::Conflict("given name not available".into()));
    }
  }

  let saved = state
    .store
    .save(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(saved_response(saved))
}
