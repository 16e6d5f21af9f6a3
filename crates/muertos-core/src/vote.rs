//! Vote types — immutable ballot rows and recomputed tallies.
//!
//! A vote is never updated or deleted. Aggregates are not cached anywhere;
//! they are recomputed from the ballot rows on every cast and every check.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Poll ────────────────────────────────────────────────────────────────────

/// The two ballot boxes in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Poll {
  /// Yes/No votes on a muerto's story idea, keyed by token id.
  StoryIdeas,
  /// Like votes on a story element, keyed by element name.
  StoryElements,
}

impl Poll {
  /// The discriminant string stored in the `poll` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Poll::StoryIdeas => "story-ideas",
      Poll::StoryElements => "story-elements",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "story-ideas" => Ok(Poll::StoryIdeas),
      "story-elements" => Ok(Poll::StoryElements),
      other => Err(Error::UnknownPoll(other.to_string())),
    }
  }
}

// ─── Ballots ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::VoteStore::cast`].
/// `cast_at` is always set by the store; it is not accepted from callers.
#[derive(Debug, Clone)]
pub struct NewVote {
  pub poll:    Poll,
  /// Identity of the thing voted on (token id or element name as text).
  pub subject: String,
  /// Wallet address of the voter.
  pub voter:   String,
  pub choice:  String,
  pub comment: Option<String>,
}

/// A persisted ballot. Once written, no field is ever updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
  pub vote_id: Uuid,
  pub poll:    Poll,
  pub subject: String,
  pub voter:   String,
  pub choice:  String,
  pub comment: Option<String>,
  pub cast_at: DateTime<Utc>,
}

// ─── Tally ───────────────────────────────────────────────────────────────────

/// Aggregate counts for one subject, grouped by choice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tally {
  pub counts: Vec<ChoiceCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceCount {
  pub choice: String,
  pub votes:  u64,
}

impl Tally {
  /// Votes recorded for one choice; 0 when the choice never appeared.
  pub fn count_for(&self, choice: &str) -> u64 {
    self
      .counts
      .iter()
      .find(|c| c.choice == choice)
      .map(|c| c.votes)
      .unwrap_or(0)
  }

  /// Total ballots across all choices.
  pub fn total(&self) -> u64 { self.counts.iter().map(|c| c.votes).sum() }
}
