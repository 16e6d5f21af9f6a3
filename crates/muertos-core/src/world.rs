//! World payloads — quests, crafting passes, authors, and root prompts.

use serde::{Deserialize, Serialize};

use crate::{
  entity::{Attribute, Entity},
  record::RecordId,
};

/// A seeded quest definition, keyed by name. Read-only from the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
  pub name:        String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub image:       String,
  #[serde(default)]
  pub attributes:  Vec<Attribute>,
}

impl Entity for Quest {
  const COLLECTION: &'static str = "quests";

  fn identity(&self) -> RecordId { RecordId::Name(self.name.clone()) }
}

/// A storybuilding pass, keyed by serial id. The `Story Elements` attribute
/// lists the element names the pass was crafted from; `ai_text` holds the
/// generated story once the holder accepts one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crafting {
  pub id:          i64,
  pub name:        String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub image:       String,
  #[serde(default)]
  pub attributes:  Vec<Attribute>,
  #[serde(default)]
  pub ai_text:     Option<String>,
}

impl Entity for Crafting {
  const COLLECTION: &'static str = "craftings";

  fn identity(&self) -> RecordId { RecordId::Token(self.id) }
}

/// A community author, keyed by wallet address. Materialised with the
/// `Unknown` role on first sight of a wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
  #[serde(default)]
  pub id:      i64,
  pub name:    String,
  pub role:    String,
  pub address: String,
}

impl Entity for Author {
  const COLLECTION: &'static str = "authors";

  fn identity(&self) -> RecordId { RecordId::Name(self.address.clone()) }
}

/// A named prompt template, keyed by name. Placeholders use the
/// `[Bracketed Name]` form consumed by the template renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootPrompt {
  #[serde(default)]
  pub id:          i64,
  pub name:        String,
  pub prompt_text: String,
}

impl Entity for RootPrompt {
  const COLLECTION: &'static str = "root_prompts";

  fn identity(&self) -> RecordId { RecordId::Name(self.name.clone()) }
}
