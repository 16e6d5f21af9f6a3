//! Narrative payloads — story ideas, scenes, and long-form prose.

use serde::{Deserialize, Serialize};

use crate::{entity::Entity, record::RecordId};

/// A muerto's story pitch, keyed by token id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryIdea {
  pub token_id: i64,
  pub text:     String,
  #[serde(default)]
  pub image:    String,
  #[serde(default = "draft_state")]
  pub state:    String,
  #[serde(default)]
  pub is_prose: bool,
}

impl Entity for StoryIdea {
  const COLLECTION: &'static str = "story_ideas";

  fn identity(&self) -> RecordId { RecordId::Token(self.token_id) }
}

/// A drafted scene for a muerto's story, keyed by token id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryScene {
  pub token_id: i64,
  pub text:     String,
  #[serde(default)]
  pub image:    String,
  #[serde(default = "draft_state")]
  pub state:    String,
}

impl Entity for StoryScene {
  const COLLECTION: &'static str = "story_scenes";

  fn identity(&self) -> RecordId { RecordId::Token(self.token_id) }
}

/// One chapter of assembled prose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
  pub title: String,
  pub prose: String,
}

/// The assembled long-form story for a muerto, keyed by token id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prose {
  pub token_id: i64,
  #[serde(default)]
  pub chapters: Vec<Chapter>,
  #[serde(default)]
  pub image:    String,
  #[serde(default = "draft_state")]
  pub state:    String,
}

impl Entity for Prose {
  const COLLECTION: &'static str = "prose";

  fn identity(&self) -> RecordId { RecordId::Token(self.token_id) }
}

fn draft_state() -> String { "Draft".to_string() }
