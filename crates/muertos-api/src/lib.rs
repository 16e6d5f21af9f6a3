//! JSON REST API for the Muertos backend.
//!
//! Exposes an axum [`Router`] backed by any store implementing
//! [`RecordStore`] + [`VoteStore`]. Transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", muertos_api::api_router(state))
//! ```

pub mod error;

pub mod authors;
pub mod character_names;
pub mod characters;
pub mod completions;
pub mod craftings;
pub mod metadata;
pub mod prompts;
pub mod prose;
pub mod quests;
pub mod root_story_elements;
pub mod scenes;
pub mod story_elements;
pub mod story_ideas;
pub mod talents;
pub mod votes;

use std::sync::Arc;

use axum::{
  Json, Router,
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::{get, post},
};
use muertos_ai::Completions;
use muertos_core::{
  entity::Entity,
  record::{SaveOutcome, Saved},
  store::{RecordStore, VoteStore},
};

pub use error::ApiError;
pub use metadata::TokenMetadataClient;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub store:       Arc<S>,
  pub completions: Arc<Completions>,
  pub metadata:    Arc<TokenMetadataClient>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  Router::new()
    // Characters
    .route(
      "/characters",
      get(characters::list::<S>).post(characters::save::<S>),
    )
    .route("/characters/{token_id}", get(characters::get_one::<S>))
    .route(
      "/character-names",
      get(character_names::get_for_token::<S>)
        .post(character_names::claim::<S>),
    )
    // Story elements
    .route(
      "/story-elements",
      get(story_elements::list::<S>).post(story_elements::save::<S>),
    )
    .route("/story-elements/{id}", get(story_elements::get_by_id::<S>))
    .route(
      "/story-elements/name/{name}",
      get(story_elements::get_by_name::<S>),
    )
    .route(
      "/story-elements/name/{name}/registration",
      post(story_elements::update_registration::<S>),
    )
    .route(
      "/story-elements/children/{name}",
      get(story_elements::children::<S>),
    )
    .route(
      "/story-elements/catalog/{aspect}",
      get(story_elements::catalog_count::<S>),
    )
    .route(
      "/story-elements/craftings/{name}",
      get(story_elements::craftings_for::<S>),
    )
    .route(
      "/story-elements/associations/{trait}",
      get(story_elements::associations::<S>),
    )
    .route("/story-elements/votes", post(votes::cast_element_vote::<S>))
    .route(
      "/story-elements/votes/check",
      post(votes::check_element_vote::<S>),
    )
    // Root story elements
    .route(
      "/root-story-elements",
      get(root_story_elements::list::<S>).post(root_story_elements::save::<S>),
    )
    .route(
      "/root-story-elements/{name}",
      get(root_story_elements::get_or_create::<S>),
    )
    // Ideas, scenes, prose
    .route(
      "/story-ideas",
      get(story_ideas::list::<S>).post(story_ideas::save::<S>),
    )
    .route("/story-ideas/{token_id}", get(story_ideas::get_one::<S>))
    .route("/story-ideas/votes", post(votes::cast_idea_vote::<S>))
    .route("/story-ideas/votes/check", post(votes::check_idea_vote::<S>))
    .route("/scenes", get(scenes::list::<S>).post(scenes::save::<S>))
    .route("/prose", get(prose::list::<S>).post(prose::save::<S>))
    .route("/prose/{token_id}", get(prose::get_one::<S>))
    // Quests and craftings
    .route("/quests", get(quests::list::<S>))
    .route("/quests/{name}", get(quests::get_one::<S>))
    .route(
      "/craftings",
      get(craftings::list::<S>).post(craftings::save::<S>),
    )
    .route("/craftings/next-id", get(craftings::next_id::<S>))
    .route("/craftings/{id}", get(craftings::get_one::<S>))
    .route("/craftings/{id}/ai-text", post(craftings::set_ai_text::<S>))
    // People, prompts, talents
    .route("/authors/{wallet}", get(authors::get_or_create::<S>))
    .route("/prompts/{name}", get(prompts::get_or_create::<S>))
    .route("/talents/{token_id}", get(talents::for_token::<S>))
    // External collaborators
    .route("/completions", post(completions::create::<S>))
    .route("/tokens/{token_id}/metadata", get(metadata::fetch::<S>))
    .with_state(state)
}

// ─── Handler helpers ──────────────────────────────────────────────────────────

/// Parse a path/query token id, rejecting non-numeric input before any
/// storage access.
pub(crate) fn parse_token_id(raw: &str) -> Result<i64, ApiError> {
  raw
    .trim()
    .parse()
    .map_err(|_| ApiError::BadRequest(format!("invalid token id: {raw:?}")))
}

/// 201 for a fresh identity, 200 for a superseding write; body is the
/// stored record.
pub(crate) fn saved_response<E: Entity>(saved: Saved<E>) -> Response {
  let status = match saved.outcome {
    SaveOutcome::Created => StatusCode::CREATED,
    SaveOutcome::Updated => StatusCode::OK,
  };
  (status, Json(saved)).into_response()
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use muertos_ai::anthropic::AnthropicClient;
  use muertos_core::{
    element::StoryElementMapping,
    entity::Attribute,
    talent::{Talent, TalentCategory, TokenMetadata, TraitCategory},
    world::Quest,
  };
  use muertos_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState {
      store:       Arc::new(store),
      completions: Arc::new(Completions::Anthropic(AnthropicClient::new(
        "test-key",
      ))),
      metadata:    Arc::new(TokenMetadataClient::new(
        "http://localhost:9",
        "bafytestcid",
      )),
    }
  }

  async fn request(
    state: AppState<SqliteStore>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let req = builder.body(body).unwrap();
    api_router(state).oneshot(req).await.unwrap()
  }

  async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn character_body(token_id: i64, description: &str) -> Value {
    json!({
      "tokenId": token_id,
      "name": format!("Los Muertos #{token_id}"),
      "givenName": "Tali",
      "description": description,
      "image": "ipfs://image",
      "wallet": "0xabc",
      "attributes": [{"trait_type": "Mask", "value": "Calavera"}]
    })
  }

  // ── Characters ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn character_create_then_get() {
    let state = make_state().await;

    let created = request(
      state.clone(),
      "POST",
      "/characters",
      Some(character_body(42, "a quiet mask-maker")),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let fetched = request(state, "GET", "/characters/42", None).await;
    assert_eq!(fetched.status(), StatusCode::OK);
    let body = body_json(fetched).await;
    assert_eq!(body["tokenId"], 42);
    assert_eq!(body["version"], 1);
    assert_eq!(body["description"], "a quiet mask-maker");
  }

  #[tokio::test]
  async fn character_update_returns_200_and_bumps_version() {
    let state = make_state().await;

    request(
      state.clone(),
      "POST",
      "/characters",
      Some(character_body(7, "draft")),
    )
    .await;
    let updated = request(
      state,
      "POST",
      "/characters",
      Some(character_body(7, "revised")),
    )
    .await;

    assert_eq!(updated.status(), StatusCode::OK);
    let body = body_json(updated).await;
    assert_eq!(body["version"], 2);
    assert_eq!(body["outcome"], "updated");
  }

  #[tokio::test]
  async fn missing_character_is_404_with_error_body() {
    let state = make_state().await;
    let response = request(state, "GET", "/characters/999", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("not found"));
  }

  #[tokio::test]
  async fn non_numeric_token_id_is_400() {
    let state = make_state().await;
    let response = request(state, "GET", "/characters/forty-two", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  }

  // ── Story elements ──────────────────────────────────────────────────────────

  fn element_body(name: &str, aspect: &str) -> Value {
    json!({
      "name": name,
      "description": "a lore unit",
      "image": "ipfs://element",
      "aspect": aspect,
      "text": "the authored text",
      "parents": "The Bell Tower",
      "state": "Draft",
      "address": "0xabc"
    })
  }

  #[tokio::test]
  async fn story_element_missing_fields_is_400() {
    let state = make_state().await;
    let response = request(
      state,
      "POST",
      "/story-elements",
      Some(json!({"name": "Nameless", "description": "", "image": "",
                  "state": "", "address": ""})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn story_element_gets_serial_id_and_aspect_filter_applies() {
    let state = make_state().await;

    request(
      state.clone(),
      "POST",
      "/story-elements",
      Some(element_body("The Silver Bell", "Magical Item")),
    )
    .await;
    request(
      state.clone(),
      "POST",
      "/story-elements",
      Some(element_body("The Collector", "Character - Mortal Antagonist")),
    )
    .await;

    let filtered = request(
      state,
      "GET",
      "/story-elements?aspect=Magical%20Item",
      None,
    )
    .await;
    let body = body_json(filtered).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "The Silver Bell");
    assert_eq!(list[0]["id"], 1);
  }

  #[tokio::test]
  async fn story_element_lookup_by_name_and_by_id() {
    let state = make_state().await;

    request(
      state.clone(),
      "POST",
      "/story-elements",
      Some(element_body("The Silver Bell", "Magical Item")),
    )
    .await;

    let by_name = request(
      state.clone(),
      "GET",
      "/story-elements/name/The%20Silver%20Bell",
      None,
    )
    .await;
    assert_eq!(by_name.status(), StatusCode::OK);

    let by_id = request(state.clone(), "GET", "/story-elements/1", None).await;
    assert_eq!(by_id.status(), StatusCode::OK);

    let missing =
      request(state, "GET", "/story-elements/name/Unknown", None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn registration_patch_preserves_unset_fields() {
    let state = make_state().await;

    request(
      state.clone(),
      "POST",
      "/story-elements",
      Some(element_body("The Silver Bell", "Magical Item")),
    )
    .await;

    let patched = request(
      state.clone(),
      "POST",
      "/story-elements/name/The%20Silver%20Bell/registration",
      Some(json!({"ipId": "0x1234", "isRegistered": true})),
    )
    .await;
    assert_eq!(patched.status(), StatusCode::OK);

    let body = body_json(
      request(
        state,
        "GET",
        "/story-elements/name/The%20Silver%20Bell",
        None,
      )
      .await,
    )
    .await;
    assert_eq!(body["ipId"], "0x1234");
    assert_eq!(body["isRegistered"], true);
    // Untouched content survives the patch; the version advanced.
    assert_eq!(body["description"], "a lore unit");
    assert_eq!(body["version"], 2);
  }

  #[tokio::test]
  async fn catalog_rejects_unknown_aspect() {
    let state = make_state().await;
    let response =
      request(state, "GET", "/story-elements/catalog/Unknown", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  }

  // ── Votes ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn idea_votes_tally_by_choice() {
    let state = make_state().await;

    for (voter, vote) in
      [("0xA", "Yes"), ("0xB", "Yes"), ("0xB", "No")]
    {
      let response = request(
        state.clone(),
        "POST",
        "/story-ideas/votes",
        Some(json!({"voterAddress": voter, "tokenId": "42", "vote": vote})),
      )
      .await;
      assert_eq!(response.status(), StatusCode::OK);
    }

    let checked = request(
      state,
      "POST",
      "/story-ideas/votes/check",
      Some(json!({"voterAddress": "0xB", "tokenId": 42})),
    )
    .await;
    let body = body_json(checked).await;
    assert_eq!(body["yesVotes"], 2);
    assert_eq!(body["noVotes"], 1);
    assert_eq!(body["userVote"], "No");
  }

  #[tokio::test]
  async fn idea_vote_requires_fields() {
    let state = make_state().await;
    let response = request(
      state,
      "POST",
      "/story-ideas/votes",
      Some(json!({"voterAddress": "", "tokenId": 1, "vote": "Yes"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn element_votes_count_likes() {
    let state = make_state().await;

    request(
      state.clone(),
      "POST",
      "/story-elements/votes",
      Some(json!({"voterAddress": "0xA",
                  "storyElementName": "The Silver Bell", "vote": "Yes"})),
    )
    .await;
    let second = request(
      state.clone(),
      "POST",
      "/story-elements/votes",
      Some(json!({"voterAddress": "0xB",
                  "storyElementName": "The Silver Bell", "vote": "Yes"})),
    )
    .await;
    assert_eq!(body_json(second).await["likes"], 2);

    let checked = request(
      state,
      "POST",
      "/story-elements/votes/check",
      Some(json!({"voterAddress": "0xA",
                  "storyElementName": "The Silver Bell"})),
    )
    .await;
    let body = body_json(checked).await;
    assert_eq!(body["likes"], 2);
    assert_eq!(body["userVote"], "Yes");
  }

  // ── Character names ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn claimed_name_pair_conflicts_for_other_tokens() {
    let state = make_state().await;

    let first = request(
      state.clone(),
      "POST",
      "/character-names",
      Some(json!({"tokenId": 1, "givenName": "Tali", "surname": "Vega"})),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    // Same pair, same token: allowed (idempotent re-claim).
    let reclaim = request(
      state.clone(),
      "POST",
      "/character-names",
      Some(json!({"tokenId": 1, "givenName": "Tali", "surname": "Vega"})),
    )
    .await;
    assert_eq!(reclaim.status(), StatusCode::OK);

    // Same pair, different token: conflict.
    let stolen = request(
      state,
      "POST",
      "/character-names",
      Some(json!({"tokenId": 2, "givenName": "Tali", "surname": "Vega"})),
    )
    .await;
    assert_eq!(stolen.status(), StatusCode::CONFLICT);
  }

  // ── Craftings ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn crafting_next_id_advances_after_save() {
    let state = make_state().await;

    let first = body_json(
      request(state.clone(), "GET", "/craftings/next-id", None).await,
    )
    .await;
    assert_eq!(first["nextId"], 1);

    request(
      state.clone(),
      "POST",
      "/craftings",
      Some(json!({"id": 1, "name": "Pass of the Bell",
                  "attributes": [{"trait_type": "Story Elements",
                                  "value": "The Silver Bell, The Collector"}]})),
    )
    .await;

    let second = body_json(
      request(state.clone(), "GET", "/craftings/next-id", None).await,
    )
    .await;
    assert_eq!(second["nextId"], 2);

    // The element-membership filter finds the pass.
    let for_element = body_json(
      request(
        state,
        "GET",
        "/story-elements/craftings/The%20Silver%20Bell",
        None,
      )
      .await,
    )
    .await;
    assert_eq!(for_element.as_array().unwrap().len(), 1);
  }

  // ── Get-or-create resources ─────────────────────────────────────────────────

  #[tokio::test]
  async fn author_is_materialised_on_first_lookup() {
    let state = make_state().await;

    let first = body_json(
      request(state.clone(), "GET", "/authors/0xabcdef012345", None).await,
    )
    .await;
    assert_eq!(first["role"], "Unknown");
    assert_eq!(first["id"], 1);
    assert!(first["name"].as_str().unwrap().ends_with("(0xabcd...)"));

    // Second lookup reuses the stored row rather than minting a new id.
    let second = body_json(
      request(state, "GET", "/authors/0xabcdef012345", None).await,
    )
    .await;
    assert_eq!(second["id"], 1);
  }

  #[tokio::test]
  async fn prompt_is_materialised_with_default_text() {
    let state = make_state().await;
    let body = body_json(
      request(state, "GET", "/prompts/KnowledgeBase", None).await,
    )
    .await;
    assert_eq!(body["promptText"], "Default prompt text");
    assert_eq!(body["version"], 1);
  }

  #[tokio::test]
  async fn missing_quest_is_404() {
    let state = make_state().await;
    let response = request(state, "GET", "/quests/Unwritten", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn seeded_quest_is_readable() {
    let state = make_state().await;
    state
      .store
      .save(Quest {
        name:        "The Tolling".into(),
        description: "Find who silenced the bell.".into(),
        image:       "ipfs://quest".into(),
        attributes:  vec![],
      })
      .await
      .unwrap();

    let body = body_json(
      request(state, "GET", "/quests/The%20Tolling", None).await,
    )
    .await;
    assert_eq!(body["name"], "The Tolling");
  }

  // ── Talents ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn talents_compose_from_token_traits() {
    let state = make_state().await;

    // Seed the mirrored metadata and the talent catalog.
    state
      .store
      .save(TokenMetadata {
        name:       "Los Muertos #42".into(),
        image:      String::new(),
        attributes: vec![
          Attribute::new("Mask", "Calavera"),
          Attribute::new("Body", "Bones"),
        ],
      })
      .await
      .unwrap();
    state
      .store
      .save(TraitCategory { trait_name: "Calavera".into(), category_id: 3 })
      .await
      .unwrap();
    state
      .store
      .save(TalentCategory {
        id:            3,
        name:          "Trickster".into(),
        description:   String::new(),
        category_type: "mask".into(),
      })
      .await
      .unwrap();
    state
      .store
      .save(Talent {
        id:            1,
        name:          "Sleight of Bone".into(),
        potency:       2,
        description:   String::new(),
        category_id:   3,
        category_type: "mask".into(),
        category_name: None,
      })
      .await
      .unwrap();
    // A talent from an unrelated category stays off the sheet.
    state
      .store
      .save(Talent {
        id:            2,
        name:          "Iron Ribs".into(),
        potency:       1,
        description:   String::new(),
        category_id:   9,
        category_type: "body".into(),
        category_name: None,
      })
      .await
      .unwrap();

    let body =
      body_json(request(state, "GET", "/talents/42", None).await).await;
    let talents = body.as_array().unwrap();
    assert_eq!(talents.len(), 1);
    assert_eq!(talents[0]["name"], "Sleight of Bone");
    assert_eq!(talents[0]["categoryName"], "Trickster");
  }

  #[tokio::test]
  async fn talents_for_unknown_muerto_is_404() {
    let state = make_state().await;
    let response = request(state, "GET", "/talents/404", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
  }

  // ── Associations ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn associations_resolve_mapped_elements() {
    let state = make_state().await;

    request(
      state.clone(),
      "POST",
      "/story-elements",
      Some(element_body("The Silver Bell", "Magical Item")),
    )
    .await;
    state
      .store
      .save(StoryElementMapping {
        trait_name:       "Calavera".into(),
        story_element_id: 1,
      })
      .await
      .unwrap();

    let body = body_json(
      request(
        state,
        "GET",
        "/story-elements/associations/Calavera",
        None,
      )
      .await,
    )
    .await;
    let elements = body.as_array().unwrap();
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0]["name"], "The Silver Bell");
  }

  // ── Completions ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn completion_requires_template() {
    let state = make_state().await;
    let response = request(
      state,
      "POST",
      "/completions",
      Some(json!({"template": ""})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn completion_with_unknown_knowledge_prompt_is_404() {
    let state = make_state().await;
    let response = request(
      state,
      "POST",
      "/completions",
      Some(json!({"template": "Tell a tale of [Magical Item].",
                  "values": {"Magical Item": "the silver bell"},
                  "knowledgePrompt": "Missing"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
  }
}
