//! The `RecordStore` and `VoteStore` traits.
//!
//! The traits are implemented by storage backends (e.g.
//! `muertos-store-sqlite`). The HTTP layer depends on these abstractions,
//! not on any concrete backend.

use std::future::Future;

use crate::{
  entity::Entity,
  record::{RecordId, Saved, Versioned},
  vote::{NewVote, Poll, Tally, Vote},
};

// ─── Versioned records ───────────────────────────────────────────────────────

/// Abstraction over the versioned document store.
///
/// `save` is the single write path for every mutable collection: it either
/// inserts a fresh identity at version 1 or archives the current row into
/// the history collection and overwrites it with the next version. The
/// archive-and-overwrite sequence is atomic; two concurrent saves for the
/// same identity serialise rather than racing.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist `input` under its own identity, maintaining the version and
  /// history invariants. Returns the stored row and whether it was created
  /// or updated.
  fn save<E: Entity>(
    &self,
    input: E,
  ) -> impl Future<Output = Result<Saved<E>, Self::Error>> + Send;

  /// Retrieve the current row for an identity. Returns `None` if absent.
  fn find<E: Entity>(
    &self,
    id: RecordId,
  ) -> impl Future<Output = Result<Option<Versioned<E>>, Self::Error>> + Send;

  /// List every current row in the collection. No pagination; collections
  /// are scanned whole, matching the access pattern of the application.
  fn list<E: Entity>(
    &self,
  ) -> impl Future<Output = Result<Vec<Versioned<E>>, Self::Error>> + Send;

  /// All superseded versions of an identity, oldest first.
  ///
  /// Nothing in the request path reads history back; this exists for audit
  /// and for the invariant tests.
  fn history<E: Entity>(
    &self,
    id: RecordId,
  ) -> impl Future<Output = Result<Vec<Versioned<E>>, Self::Error>> + Send;

  /// The next free serial id for collections that carry a numeric `id`
  /// field in their payload: max observed id + 1, or 1 when empty.
  fn next_serial<E: Entity>(
    &self,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send;
}

// ─── Votes ───────────────────────────────────────────────────────────────────

/// Abstraction over the ballot box.
///
/// Casting is unconditional: no uniqueness is enforced per voter, so the
/// same wallet may vote repeatedly and each ballot counts. Tallies are
/// recomputed from the rows on every call.
pub trait VoteStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Record a ballot and return it as persisted. `cast_at` is set by the
  /// store.
  fn cast(
    &self,
    ballot: NewVote,
  ) -> impl Future<Output = Result<Vote, Self::Error>> + Send;

  /// Counts grouped by choice for one subject.
  fn tally(
    &self,
    poll: Poll,
    subject: String,
  ) -> impl Future<Output = Result<Tally, Self::Error>> + Send;

  /// The most recent ballot a voter cast for a subject, if any.
  fn voter_ballot(
    &self,
    poll: Poll,
    subject: String,
    voter: String,
  ) -> impl Future<Output = Result<Option<Vote>, Self::Error>> + Send;
}
