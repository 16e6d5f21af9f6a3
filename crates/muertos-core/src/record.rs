//! The versioned-record envelope.
//!
//! Every mutable collection stores exactly one current row per identity,
//! wrapped in [`Versioned`]. Superseded rows live in a parallel history
//! collection, one snapshot per previous version, never rewritten.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Identity ────────────────────────────────────────────────────────────────

/// The natural key that ties a current row to its history snapshots.
///
/// Two identity families exist in the data: numeric token ids (characters,
/// story ideas, prose, craftings) and names (story elements, authors,
/// prompts). The key is stable across every version of the same entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
  Token(i64),
  Name(String),
}

impl RecordId {
  /// The plain-text form stored in the `identity` column.
  pub fn as_key(&self) -> String {
    match self {
      RecordId::Token(t) => t.to_string(),
      RecordId::Name(n) => n.clone(),
    }
  }
}

impl fmt::Display for RecordId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RecordId::Token(t) => write!(f, "{t}"),
      RecordId::Name(n) => write!(f, "{n}"),
    }
  }
}

impl From<i64> for RecordId {
  fn from(t: i64) -> Self { RecordId::Token(t) }
}

impl From<String> for RecordId {
  fn from(n: String) -> Self { RecordId::Name(n) }
}

impl From<&str> for RecordId {
  fn from(n: &str) -> Self { RecordId::Name(n.to_string()) }
}

// ─── Envelope ────────────────────────────────────────────────────────────────

/// A payload together with its version metadata.
///
/// `version` starts at 1 and increments by exactly 1 on every successful
/// update. `created` is set once, on first insertion, and carried forward
/// verbatim on every later write; `updated` is refreshed on every write.
/// Both timestamps are store-assigned, never accepted from callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Versioned<E> {
  #[serde(flatten)]
  pub record:  E,
  pub version: u32,
  pub created: DateTime<Utc>,
  pub updated: DateTime<Utc>,
}

// ─── Save receipt ────────────────────────────────────────────────────────────

/// Whether a save inserted a fresh identity or superseded an existing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveOutcome {
  Created,
  Updated,
}

/// Returned by [`crate::store::RecordStore::save`]: the row as persisted,
/// plus which branch of the versioning operation ran.
#[derive(Debug, Clone, Serialize)]
pub struct Saved<E> {
  pub outcome: SaveOutcome,
  #[serde(flatten)]
  pub record:  Versioned<E>,
}
