//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`] and
//! [`VoteStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use muertos_core::{
  entity::Entity,
  record::{RecordId, Saved, SaveOutcome, Versioned},
  store::{RecordStore, VoteStore},
  vote::{ChoiceCount, NewVote, Poll, Tally, Vote},
};

use crate::{
  Error, Result,
  encode::{RawRecord, RawVote, decode_dt, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Muertos world store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  async fn save<E: Entity>(&self, input: E) -> Result<Saved<E>> {
    let collection = E::COLLECTION;
    let identity = input.identity().as_key();
    let payload = serde_json::to_string(&input)?;
    let now_str = encode_dt(Utc::now());

    // The whole read-archive-overwrite sequence runs in one transaction:
    // concurrent saves for the same identity serialise instead of both
    // observing the same current version.
    let (outcome, version, created_at, updated_at) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let existing: Option<(u32, String)> = tx
          .query_row(
            "SELECT version, created_at FROM records
             WHERE collection = ?1 AND identity = ?2",
            rusqlite::params![collection, identity],
            |row| Ok((row.get(0)?, row.get(1)?)),
          )
          .optional()?;

        let result = match existing {
          None => {
            tx.execute(
              "INSERT INTO records
                 (collection, identity, version, payload, created_at, updated_at)
               VALUES (?1, ?2, 1, ?3, ?4, ?4)",
              rusqlite::params![collection, identity, payload, now_str],
            )?;
            (SaveOutcome::Created, 1, now_str.clone(), now_str.clone())
          }
          Some((current_version, created_at)) => {
            // Next version: maximum across the current row and all history
            // snapshots, plus one. Falls back to 2 when no history exists,
            // since the current row is implicitly version 1.
            let history_max: Option<u32> = tx.query_row(
              "SELECT MAX(version) FROM record_history
               WHERE collection = ?1 AND identity = ?2",
              rusqlite::params![collection, identity],
              |row| row.get(0),
            )?;
            let next = current_version.max(history_max.unwrap_or(1)) + 1;

            // Archive the pre-update row verbatim.
            tx.execute(
              "INSERT INTO record_history
                 (collection, identity, version, payload, created_at, updated_at)
               SELECT collection, identity, version, payload, created_at, updated_at
               FROM records WHERE collection = ?1 AND identity = ?2",
              rusqlite::params![collection, identity],
            )?;

            // Overwrite with the new payload; `created_at` is untouched.
            tx.execute(
              "UPDATE records SET version = ?3, payload = ?4, updated_at = ?5
               WHERE collection = ?1 AND identity = ?2",
              rusqlite::params![collection, identity, next, payload, now_str],
            )?;
            (SaveOutcome::Updated, next, created_at, now_str.clone())
          }
        };

        tx.commit()?;
        Ok(result)
      })
      .await?;

    Ok(Saved {
      outcome,
      record: Versioned {
        record: input,
        version,
        created: decode_dt(&created_at)?,
        updated: decode_dt(&updated_at)?,
      },
    })
  }

  async fn find<E: Entity>(&self, id: RecordId) -> Result<Option<Versioned<E>>> {
    let collection = E::COLLECTION;
    let identity = id.as_key();

    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT version, payload, created_at, updated_at FROM records
               WHERE collection = ?1 AND identity = ?2",
              rusqlite::params![collection, identity],
              |row| {
                Ok(RawRecord {
                  version:    row.get(0)?,
                  payload:    row.get(1)?,
                  created_at: row.get(2)?,
                  updated_at: row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRecord::into_versioned).transpose()
  }

  async fn list<E: Entity>(&self) -> Result<Vec<Versioned<E>>> {
    let collection = E::COLLECTION;

    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT version, payload, created_at, updated_at FROM records
           WHERE collection = ?1 ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![collection], |row| {
            Ok(RawRecord {
              version:    row.get(0)?,
              payload:    row.get(1)?,
              created_at: row.get(2)?,
              updated_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_versioned).collect()
  }

  async fn history<E: Entity>(&self, id: RecordId) -> Result<Vec<Versioned<E>>> {
    let collection = E::COLLECTION;
    let identity = id.as_key();

    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT version, payload, created_at, updated_at FROM record_history
           WHERE collection = ?1 AND identity = ?2 ORDER BY version",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![collection, identity], |row| {
            Ok(RawRecord {
              version:    row.get(0)?,
              payload:    row.get(1)?,
              created_at: row.get(2)?,
              updated_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_versioned).collect()
  }

  async fn next_serial<E: Entity>(&self) -> Result<i64> {
    let collection = E::COLLECTION;

    let next: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COALESCE(MAX(json_extract(payload, '$.id')), 0) + 1
           FROM records WHERE collection = ?1",
          rusqlite::params![collection],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(next)
  }
}

// ─── VoteStore impl ──────────────────────────────────────────────────────────

impl VoteStore for SqliteStore {
  type Error = Error;

  async fn cast(&self, ballot: NewVote) -> Result<Vote> {
    let vote = Vote {
      vote_id: Uuid::new_v4(),
      poll:    ballot.poll,
      subject: ballot.subject,
      voter:   ballot.voter,
      choice:  ballot.choice,
      comment: ballot.comment,
      cast_at: Utc::now(),
    };

    let id_str = vote.vote_id.hyphenated().to_string();
    let poll_str = vote.poll.as_str();
    let subject = vote.subject.clone();
    let voter = vote.voter.clone();
    let choice = vote.choice.clone();
    let comment = vote.comment.clone();
    let at_str = encode_dt(vote.cast_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO votes
             (vote_id, poll, subject, voter, choice, comment, cast_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str, poll_str, subject, voter, choice, comment, at_str
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(vote)
  }

  async fn tally(&self, poll: Poll, subject: String) -> Result<Tally> {
    let poll_str = poll.as_str();

    let counts: Vec<ChoiceCount> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT choice, COUNT(*) FROM votes
           WHERE poll = ?1 AND subject = ?2
           GROUP BY choice ORDER BY choice",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![poll_str, subject], |row| {
            Ok(ChoiceCount { choice: row.get(0)?, votes: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(Tally { counts })
  }

  async fn voter_ballot(
    &self,
    poll: Poll,
    subject: String,
    voter: String,
  ) -> Result<Option<Vote>> {
    let poll_str = poll.as_str();

    let raw: Option<RawVote> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT vote_id, poll, subject, voter, choice, comment, cast_at
               FROM votes
               WHERE poll = ?1 AND subject = ?2 AND voter = ?3
               ORDER BY cast_at DESC, rowid DESC LIMIT 1",
              rusqlite::params![poll_str, subject, voter],
              |row| {
                Ok(RawVote {
                  vote_id: row.get(0)?,
                  poll:    row.get(1)?,
                  subject: row.get(2)?,
                  voter:   row.get(3)?,
                  choice:  row.get(4)?,
                  comment: row.get(5)?,
                  cast_at: row.get(6)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawVote::into_vote).transpose()
  }
}
