//! Talent payloads — token metadata mirror, trait/category mapping, and the
//! talent catalog.
//!
//! A muerto's talents are derived, not stored: token traits (Mask, Body,
//! Headwear, Expression) map to talent categories, and each category owns a
//! set of talents. The composition happens at read time in the API layer.

use serde::{Deserialize, Serialize};

use crate::{
  entity::{Attribute, Entity},
  record::RecordId,
};

/// The trait types that contribute talents, in presentation order.
pub const TALENT_TRAITS: [&str; 4] = ["Mask", "Body", "Headwear", "Expression"];

/// A mirrored token-metadata document, keyed by the token's display name
/// (e.g. `Los Muertos #42`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
  pub name:       String,
  #[serde(default)]
  pub image:      String,
  #[serde(default)]
  pub attributes: Vec<Attribute>,
}

impl TokenMetadata {
  /// Display name for a token id, matching the minted metadata.
  pub fn display_name(token_id: i64) -> String {
    format!("Los Muertos #{token_id}")
  }
}

impl Entity for TokenMetadata {
  const COLLECTION: &'static str = "nft_metadata";

  fn identity(&self) -> RecordId { RecordId::Name(self.name.clone()) }
}

/// Maps one trait value (e.g. a specific mask) to its talent category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitCategory {
  #[serde(rename = "trait")]
  pub trait_name:  String,
  pub category_id: i64,
}

impl Entity for TraitCategory {
  const COLLECTION: &'static str = "trait_categories";

  fn identity(&self) -> RecordId { RecordId::Name(self.trait_name.clone()) }
}

/// A talent category. Category ids are scoped per trait type, so the
/// storage identity combines both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalentCategory {
  pub id:            i64,
  pub name:          String,
  #[serde(default)]
  pub description:   String,
  pub category_type: String,
}

impl Entity for TalentCategory {
  const COLLECTION: &'static str = "talent_categories";

  fn identity(&self) -> RecordId {
    RecordId::Name(format!("{}-{}", self.category_type, self.id))
  }
}

/// One talent in the catalog. `category_name` is annotated at read time
/// from the owning category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Talent {
  pub id:            i64,
  pub name:          String,
  pub potency:       i64,
  #[serde(default)]
  pub description:   String,
  pub category_id:   i64,
  pub category_type: String,
  #[serde(default)]
  pub category_name: Option<String>,
}

impl Entity for Talent {
  const COLLECTION: &'static str = "talents";

  fn identity(&self) -> RecordId {
    RecordId::Name(format!("{}-{}", self.category_type, self.id))
  }
}
