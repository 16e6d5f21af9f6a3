//! Handlers for the two ballot boxes.
//!
//! Story-idea votes are Yes/No per token; story-element votes are likes per
//! element name. Both insert unconditionally and answer with tallies
//! recomputed from the ballot rows.

use axum::{Json, extract::State};
use muertos_core::{
  store::{RecordStore, VoteStore},
  vote::{NewVote, Poll},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

/// A token id that may arrive as a JSON number or a string, as wallet UIs
/// send both.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TokenIdField {
  Number(i64),
  Text(String),
}

impl TokenIdField {
  fn parse(self) -> Result<i64, ApiError> {
    match self {
      TokenIdField::Number(n) => Ok(n),
      TokenIdField::Text(s) => s
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid tokenId: {s:?}"))),
    }
  }
}

// ─── Story-idea votes ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaVoteBody {
  pub voter_address: String,
  pub token_id:      TokenIdField,
  pub vote:          String,
  #[serde(default)]
  pub comment:       Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaVoteStatus {
  pub yes_votes: u64,
  pub no_votes:  u64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub user_vote: Option<String>,
}

/// `POST /story-ideas/votes`
pub async fn cast_idea_vote<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<IdeaVoteBody>,
) -> Result<Json<IdeaVoteStatus>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  if body.voter_address.is_empty() || body.vote.is_empty() {
    return Err(ApiError::BadRequest("missing required fields".into()));
  }
  let token_id = body.token_id.parse()?;

  state
    .store
    .cast(NewVote {
      poll:    Poll::StoryIdeas,
      subject: token_id.to_string(),
      voter:   body.voter_address,
      choice:  body.vote,
      comment: body.comment,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let tally = state
    .store
    .tally(Poll::StoryIdeas, token_id.to_string())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(IdeaVoteStatus {
    yes_votes: tally.count_for("Yes"),
    no_votes:  tally.count_for("No"),
    user_vote: None,
  }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaVoteCheckBody {
  #[serde(default)]
  pub voter_address: Option<String>,
  pub token_id:      TokenIdField,
}

/// `POST /story-ideas/votes/check`
pub async fn check_idea_vote<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<IdeaVoteCheckBody>,
) -> Result<Json<IdeaVoteStatus>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  let token_id = body.token_id.parse()?;
  let subject = token_id.to_string();

  let user_vote = match body.voter_address {
    Some(voter) if !voter.is_empty() => state
      .store
      .voter_ballot(Poll::StoryIdeas, subject.clone(), voter)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?
      .map(|ballot| ballot.choice),
    _ => None,
  };

  let tally = state
    .store
    .tally(Poll::StoryIdeas, subject)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(IdeaVoteStatus {
    yes_votes: tally.count_for("Yes"),
    no_votes:  tally.count_for("No"),
    user_vote,
  }))
}

// ─── Story-element votes ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementVoteBody {
  pub voter_address:      String,
  pub story_element_name: String,
  pub vote:               String,
  #[serde(default)]
  pub comment:            Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementVoteStatus {
  pub likes:     u64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub user_vote: Option<String>,
}

/// `POST /story-elements/votes`
pub async fn cast_element_vote<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<ElementVoteBody>,
) -> Result<Json<ElementVoteStatus>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  if body.voter_address.is_empty()
    || body.story_element_name.is_empty()
    || body.vote.is_empty()
  {
    return Err(ApiError::BadRequest("missing required fields".into()));
  }

  let subject = body.story_element_name;
  state
    .store
    .cast(NewVote {
      poll:    Poll::StoryElements,
      subject: subject.clone(),
      voter:   body.voter_address,
      choice:  body.vote,
      comment: body.comment,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let tally = state
    .store
    .tally(Poll::StoryElements, subject)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(ElementVoteStatus {
    likes:     tally.count_for("Yes"),
    user_vote: None,
  }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementVoteCheckBody {
  #[serde(default)]
  pub voter_address:      Option<String>,
  pub story_element_name: String,
}

/// `POST /story-elements/votes/check`
pub async fn check_element_vote<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<ElementVoteCheckBody>,
) -> Result<Json<ElementVoteStatus>, ApiError>
where
  S: RecordStore + VoteStore + Clone + 'static,
{
  if body.story_element_name.is_empty() {
    return Err(ApiError::BadRequest("missing required fields".into()));
  }
  let subject = body.story_element_name;

  let user_vote = match body.voter_address {
    Some(voter) if !voter.is_empty() => state
      .store
      .voter_ballot(Poll::StoryElements, subject.clone(), voter)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?
      .map(|ballot| ballot.choice),
    _ => None,
  };

  let tally = state
    .store
    .tally(Poll::StoryElements, subject)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(ElementVoteStatus {
    likes: tally.count_for("Yes"),
    user_vote,
  }))
}
