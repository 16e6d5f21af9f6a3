//! The `Entity` trait and the shared trait/value attribute type.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::record::RecordId;

// ─── Entity ──────────────────────────────────────────────────────────────────

/// A payload type persisted through the versioned repository.
///
/// `COLLECTION` names the logical collection; it doubles as the history
/// collection discriminator. `identity` extracts the natural key from the
/// payload, so a caller can never file a record under a foreign identity.
pub trait Entity:
  Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
  /// Collection name in the store, e.g. `"characters"`.
  const COLLECTION: &'static str;

  /// The natural key of this payload.
  fn identity(&self) -> RecordId;
}

// ─── Attributes ──────────────────────────────────────────────────────────────

/// One trait/value pair from an NFT-style attribute array.
///
/// The `trait_type` wire name is fixed by the token metadata format and is
/// kept verbatim everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
  pub trait_type: String,
  pub value:      String,
}

impl Attribute {
  pub fn new(trait_type: impl Into<String>, value: impl Into<String>) -> Self {
    Self { trait_type: trait_type.into(), value: value.into() }
  }
}

/// Look up the value of the first attribute with the given trait type.
pub fn trait_value<'a>(
  attributes: &'a [Attribute],
  trait_type: &str,
) -> Option<&'a str> {
  attributes
    .iter()
    .find(|a| a.trait_type == trait_type)
    .map(|a| a.value.as_str())
}

/// Merge `incoming` into `existing` by trait type: matching traits are
/// replaced in place, unknown traits are appended. Order of untouched
/// attributes is preserved.
pub fn merge_attributes(
  existing: &[Attribute],
  incoming: &[Attribute],
) -> Vec<Attribute> {
  let mut merged = existing.to_vec();
  for attr in incoming {
    match merged.iter_mut().find(|a| a.trait_type == attr.trait_type) {
      Some(slot) => slot.value = attr.value.clone(),
      None => merged.push(attr.clone()),
    }
  }
  merged
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn trait_value_finds_first_match() {
    let attrs = vec![
      Attribute::new("Aspect", "Magical Item"),
      Attribute::new("Text", "a silver bell"),
    ];
    assert_eq!(trait_value(&attrs, "Aspect"), Some("Magical Item"));
    assert_eq!(trait_value(&attrs, "Parents"), None);
  }

  #[test]
  fn merge_replaces_matching_and_appends_new() {
    let existing = vec![
      Attribute::new("Aspect", "Magical Item"),
      Attribute::new("Text", "old text"),
    ];
    let incoming = vec![
      Attribute::new("Text", "new text"),
      Attribute::new("Parents", "The Bell Tower"),
    ];

    let merged = merge_attributes(&existing, &incoming);
    assert_eq!(merged.len(), 3);
    assert_eq!(trait_value(&merged, "Aspect"), Some("Magical Item"));
    assert_eq!(trait_value(&merged, "Text"), Some("new text"));
    assert_eq!(trait_value(&merged, "Parents"), Some("The Bell Tower"));
  }
}
