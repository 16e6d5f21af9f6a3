//! Handler for `/completions` — the thin proxy onto the configured AI
//! provider.
//!
//! The handler renders the caller's template, optionally prepends a stored
//! knowledge prompt, and forwards one prompt string. Provider choice is a
//! deployment concern; nothing here branches on it.

use std::collections::BTreeMap;

use axum::{Json, extract::State};
use muertos_ai::template;
use muertos_core::{
  record::RecordId,
  store::{RecordStore, VoteStore},
  world::RootPrompt,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionBody {
  /// Template text with `[Bracketed Placeholder]` markers.
  pub template:         String,
  #[serde(default)]
  pub values:           BTreeMap<String, String>,
  /// Name of a stored root prompt to prepend (e.g. `KnowledgeBase`).
  #[serde(default)]
  pub knowledge_prompt: Option<String>,
  #[serde(default)]
  pub max_tokens:       Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CompletionResponse {
  pub text: String,
}

/// `POST /completions`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<CompletionBody>,
) -> Result<Json<CompletionResponse>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  if body.template.is_empty() {
    return Err(ApiError::BadRequest("template is required".into()));
  }

  let mut prompt = template::render(&body.template, &body.values);

  if let Some(name) = body.knowledge_prompt {
    let knowledge = state
      .store
      .find::<RootPrompt>(RecordId::Name(name.clone()))
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?
      .ok_or_else(|| {
        ApiError::NotFound(format!("knowledge prompt {name:?} not found"))
      })?;
    prompt = format!("{}{}", knowledge.record.prompt_text, prompt);
  }

  let text = state
    .completions
    .complete(&prompt, body.max_tokens)
    .await
    .map_err(|e| ApiError::Upstream(e.to_string()))?;

  Ok(Json(CompletionResponse { text }))
}
