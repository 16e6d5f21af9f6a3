//! Token-metadata gateway — read-only fetch of the static per-token JSON
//! documents from the content-addressed storage gateway.

use axum::{
  Json,
  extract::{Path, State},
};
use muertos_core::store::{RecordStore, VoteStore};
use reqwest::StatusCode;

use crate::{AppState, error::ApiError, parse_token_id};

/// Fetches `{gateway}/{cid}/{tokenId}.json`. The gateway serves immutable
/// documents, so there is nothing to invalidate and nothing is cached here.
#[derive(Clone)]
pub struct TokenMetadataClient {
  client:  reqwest::Client,
  gateway: String,
  cid:     String,
}

impl TokenMetadataClient {
  pub fn new(gateway: impl Into<String>, cid: impl Into<String>) -> Self {
    Self {
      client:  reqwest::Client::new(),
      gateway: gateway.into(),
      cid:     cid.into(),
    }
  }

  /// Fetch the metadata document for one token.
  pub async fn fetch(&self, token_id: i64) -> Result<serde_json::Value, ApiError> {
    let url = format!(
      "{}/{}/{token_id}.json",
      self.gateway.trim_end_matches('/'),
      self.cid
    );

    let response = self
      .client
      .get(&url)
      .send()
      .await
      .map_err(|e| ApiError::Upstream(e.to_string()))?;

    if response.status() == StatusCode::NOT_FOUND {
      return Err(ApiError::NotFound(format!(
        "no metadata for token {token_id}"
      )));
    }
    if !response.status().is_success() {
      return Err(ApiError::Upstream(format!(
        "metadata gateway returned {}",
        response.status()
      )));
    }

    response
      .json()
      .await
      .map_err(|e| ApiError::Upstream(e.to_string()))
  }
}

/// `GET /tokens/:tokenId/metadata`
pub async fn fetch<S>(
  State(state): State<AppState<S>>,
  Path(token_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let token_id = parse_token_id(&token_id)?;
  let document = state.metadata.fetch(token_id).await?;
  Ok(Json(document))
}
