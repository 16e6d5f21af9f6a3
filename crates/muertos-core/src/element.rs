//! Story element payloads.
//!
//! Story elements are the community-authored lore units (creatures, items,
//! clues, societies, muerto traits). Root story elements are the curated
//! seed entries they descend from; mappings tie token traits to elements.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  entity::{Attribute, Entity},
  record::RecordId,
};

/// Per-child bookkeeping on a parent element, written when a derivative is
/// linked to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildData {
  pub child_name: String,
  #[serde(default)]
  pub ip_id:      Option<String>,
}

/// A community-authored story element, keyed by name. `id` is a serial
/// assigned by the store on creation. The Aspect/Text/Parents attributes
/// carry the authored content; the registration block is filled in by the
/// canonization flow after the element is accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryElement {
  #[serde(default)]
  pub id:          i64,
  pub name:        String,
  pub description: String,
  pub image:       String,
  #[serde(default)]
  pub wbp_image:   Option<String>,
  #[serde(default)]
  pub aspect:      Option<String>,
  #[serde(default)]
  pub is_root:     bool,
  #[serde(default)]
  pub attributes:  Vec<Attribute>,
  pub state:       String,
  pub address:     String,
  #[serde(default)]
  pub is_submitted: bool,

  // Registration block — absent until canonization.
  #[serde(default)]
  pub ip_id:                    Option<String>,
  #[serde(default)]
  pub license_terms_id:         Option<String>,
  #[serde(default)]
  pub license_token_id:         Option<String>,
  #[serde(default)]
  pub is_registered:            Option<bool>,
  #[serde(default)]
  pub derivative_registration:  Option<String>,
  #[serde(default)]
  pub children_data:            Option<Vec<ChildData>>,
  #[serde(default)]
  pub date_canonized:           Option<DateTime<Utc>>,
}

impl Entity for StoryElement {
  const COLLECTION: &'static str = "story_elements";

  fn identity(&self) -> RecordId { RecordId::Name(self.name.clone()) }
}

/// A curated seed element, keyed by name. Materialised lazily with empty
/// content on first lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootStoryElement {
  #[serde(default)]
  pub id:          i64,
  pub name:        String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub image:       String,
  #[serde(default)]
  pub aspect:      Option<String>,
  #[serde(default)]
  pub attributes:  Vec<Attribute>,
}

impl Entity for RootStoryElement {
  const COLLECTION: &'static str = "root_story_elements";

  fn identity(&self) -> RecordId { RecordId::Name(self.name.clone()) }
}

/// Links a token trait value to the story element that represents it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryElementMapping {
  #[serde(rename = "trait")]
  pub trait_name:       String,
  pub story_element_id: i64,
}

impl Entity for StoryElementMapping {
  const COLLECTION: &'static str = "story_element_mappings";

  fn identity(&self) -> RecordId { RecordId::Name(self.trait_name.clone()) }
}
