//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Payloads are stored as
//! compact JSON. Vote ids are stored as hyphenated lowercase UUIDs.

use chrono::{DateTime, Utc};
use muertos_core::{
  entity::Entity,
  record::Versioned,
  vote::{Poll, Vote},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `records` or `record_history` row.
pub struct RawRecord {
  pub version:    u32,
  pub payload:    String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawRecord {
  pub fn into_versioned<E: Entity>(self) -> Result<Versioned<E>> {
    Ok(Versioned {
      record:  serde_json::from_str(&self.payload)?,
      version: self.version,
      created: decode_dt(&self.created_at)?,
      updated: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `votes` row.
pub struct RawVote {
  pub vote_id: String,
  pub poll:    String,
  pub subject: String,
  pub voter:   String,
  pub choice:  String,
  pub comment: Option<String>,
  pub cast_at: String,
}

impl RawVote {
  pub fn into_vote(self) -> Result<Vote> {
    Ok(Vote {
      vote_id: Uuid::parse_str(&self.vote_id)?,
      poll:    Poll::parse(&self.poll).map_err(Error::Core)?,
      subject: self.subject,
      voter:   self.voter,
      choice:  self.choice,
      comment: self.comment,
      cast_at: decode_dt(&self.cast_at)?,
    })
  }
}
