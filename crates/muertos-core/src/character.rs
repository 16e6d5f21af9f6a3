//! Character payloads — the per-muerto story sheet and the claimed name
//! registry.

use serde::{Deserialize, Serialize};

use crate::{
  entity::{Attribute, Entity},
  record::RecordId,
};

/// A muerto's character sheet, keyed by token id. The attribute array uses
/// the token-metadata trait/value format so selected story elements can be
/// referenced by id from the `StoryElements` trait.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
  pub token_id:    i64,
  pub name:        String,
  #[serde(default)]
  pub given_name:  String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub image:       String,
  #[serde(default)]
  pub wallet:      String,
  #[serde(default)]
  pub attributes:  Vec<Attribute>,
}

impl Entity for Character {
  const COLLECTION: &'static str = "characters";

  fn identity(&self) -> RecordId { RecordId::Token(self.token_id) }
}

/// A claimed given-name/surname pair. The pair is unique across tokens;
/// the handler enforces the claim check before saving.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterName {
  pub token_id:   i64,
  pub given_name: String,
  pub surname:    String,
}

impl Entity for CharacterName {
  const COLLECTION: &'static str = "character_names";

  fn identity(&self) -> RecordId { RecordId::Token(self.token_id) }
}
