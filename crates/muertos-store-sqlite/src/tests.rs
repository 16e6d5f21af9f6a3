//! Integration tests for `SqliteStore` against an in-memory database.

use muertos_core::{
  character::Character,
  element::StoryElement,
  entity::Attribute,
  record::{RecordId, SaveOutcome},
  store::{RecordStore, VoteStore},
  vote::{NewVote, Poll},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn character(token_id: i64, description: &str) -> Character {
  Character {
    token_id,
    name: format!("Los Muertos #{token_id}"),
    given_name: "Tali".into(),
    description: description.into(),
    image: "ipfs://image".into(),
    wallet: "0xabc".into(),
    attributes: vec![Attribute::new("Mask", "Calavera")],
  }
}

fn element(id: i64, name: &str) -> StoryElement {
  StoryElement {
    id,
    name: name.into(),
    description: "a lore unit".into(),
    image: "ipfs://element".into(),
    wbp_image: None,
    aspect: Some("Magical Item".into()),
    is_root: false,
    attributes: vec![Attribute::new("Aspect", "Magical Item")],
    state: "Draft".into(),
    address: "0xabc".into(),
    is_submitted: false,
    ip_id: None,
    license_terms_id: None,
    license_token_id: None,
    is_registered: None,
    derivative_registration: None,
    children_data: None,
    date_canonized: None,
  }
}

fn idea_ballot(voter: &str, token_id: i64, choice: &str) -> NewVote {
  NewVote {
    poll:    Poll::StoryIdeas,
    subject: token_id.to_string(),
    voter:   voter.into(),
    choice:  choice.into(),
    comment: None,
  }
}

// ─── Save-with-history ───────────────────────────────────────────────────────

#[tokio::test]
async fn first_save_creates_version_one() {
  let s = store().await;

  let saved = s.save(character(42, "draft")).await.unwrap();
  assert_eq!(saved.outcome, SaveOutcome::Created);
  assert_eq!(saved.record.version, 1);
  assert_eq!(saved.record.created, saved.record.updated);

  let history: Vec<_> = s
    .history::<Character>(RecordId::Token(42))
    .await
    .unwrap();
  assert!(history.is_empty());
}

#[tokio::test]
async fn update_bumps_version_and_archives_previous() {
  let s = store().await;

  let first = s.save(character(42, "draft")).await.unwrap();
  let second = s.save(character(42, "revised")).await.unwrap();

  assert_eq!(second.outcome, SaveOutcome::Updated);
  assert_eq!(second.record.version, 2);
  // `created` carries forward; `updated` never moves backwards.
  assert_eq!(second.record.created, first.record.created);
  assert!(second.record.updated >= first.record.updated);

  // Exactly one snapshot, equal to the record as it stood before the update.
  let history = s
    .history::<Character>(RecordId::Token(42))
    .await
    .unwrap();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0].version, 1);
  assert_eq!(history[0].record.description, "draft");
  assert_eq!(history[0].created, first.record.created);
  assert_eq!(history[0].updated, first.record.updated);

  // The record store reflects the new payload.
  let current = s
    .find::<Character>(RecordId::Token(42))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(current.version, 2);
  assert_eq!(current.record.description, "revised");
}

#[tokio::test]
async fn versions_are_contiguous_with_no_gaps() {
  let s = store().await;

  for n in 1..=5 {
    s.save(character(7, &format!("rev {n}"))).await.unwrap();
  }

  let current = s
    .find::<Character>(RecordId::Token(7))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(current.version, 5);

  let versions: Vec<u32> = s
    .history::<Character>(RecordId::Token(7))
    .await
    .unwrap()
    .iter()
    .map(|v| v.version)
    .collect();
  assert_eq!(versions, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn created_is_immutable_across_updates() {
  let s = store().await;

  let first = s.save(character(9, "one")).await.unwrap();
  s.save(character(9, "two")).await.unwrap();
  s.save(character(9, "three")).await.unwrap();

  let current = s
    .find::<Character>(RecordId::Token(9))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(current.created, first.record.created);

  for snapshot in s.history::<Character>(RecordId::Token(9)).await.unwrap() {
    assert_eq!(snapshot.created, first.record.created);
  }
}

#[tokio::test]
async fn identities_do_not_interfere() {
  let s = store().await;

  s.save(character(1, "first")).await.unwrap();
  s.save(character(2, "second")).await.unwrap();
  s.save(character(1, "first revised")).await.unwrap();

  let one = s.find::<Character>(RecordId::Token(1)).await.unwrap().unwrap();
  let two = s.find::<Character>(RecordId::Token(2)).await.unwrap().unwrap();
  assert_eq!(one.version, 2);
  assert_eq!(two.version, 1);

  let history = s.history::<Character>(RecordId::Token(2)).await.unwrap();
  assert!(history.is_empty());
}

#[tokio::test]
async fn find_missing_returns_none() {
  let s = store().await;
  let result = s.find::<Character>(RecordId::Token(999)).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn repeated_finds_return_identical_rows() {
  let s = store().await;
  s.save(character(3, "stable")).await.unwrap();

  let a = s.find::<Character>(RecordId::Token(3)).await.unwrap().unwrap();
  let b = s.find::<Character>(RecordId::Token(3)).await.unwrap().unwrap();

  assert_eq!(a.version, b.version);
  assert_eq!(a.created, b.created);
  assert_eq!(a.updated, b.updated);
  assert_eq!(
    serde_json::to_value(&a.record).unwrap(),
    serde_json::to_value(&b.record).unwrap()
  );
}

#[tokio::test]
async fn list_returns_only_current_rows() {
  let s = store().await;

  s.save(element(1, "The Bell Tower")).await.unwrap();
  s.save(element(2, "The Silver Bell")).await.unwrap();
  s.save(element(1, "The Bell Tower")).await.unwrap();

  let all = s.list::<StoryElement>().await.unwrap();
  assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn collections_are_isolated() {
  let s = store().await;

  s.save(character(5, "a character")).await.unwrap();
  s.save(element(5, "An Element")).await.unwrap();

  assert_eq!(s.list::<Character>().await.unwrap().len(), 1);
  assert_eq!(s.list::<StoryElement>().await.unwrap().len(), 1);
}

// ─── Serial ids ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn next_serial_starts_at_one() {
  let s = store().await;
  assert_eq!(s.next_serial::<StoryElement>().await.unwrap(), 1);
}

#[tokio::test]
async fn next_serial_is_max_id_plus_one() {
  let s = store().await;

  s.save(element(1, "First")).await.unwrap();
  s.save(element(7, "Out Of Order")).await.unwrap();

  assert_eq!(s.next_serial::<StoryElement>().await.unwrap(), 8);
}

// ─── Votes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn tally_groups_ballots_by_choice() {
  let s = store().await;

  s.cast(idea_ballot("0xA", 42, "Yes")).await.unwrap();
  s.cast(idea_ballot("0xB", 42, "Yes")).await.unwrap();
  s.cast(idea_ballot("0xB", 42, "No")).await.unwrap();

  let tally = s.tally(Poll::StoryIdeas, "42".into()).await.unwrap();
  assert_eq!(tally.count_for("Yes"), 2);
  assert_eq!(tally.count_for("No"), 1);
  assert_eq!(tally.total(), 3);
}

#[tokio::test]
async fn tally_is_scoped_to_subject_and_poll() {
  let s = store().await;

  s.cast(idea_ballot("0xA", 1, "Yes")).await.unwrap();
  s.cast(idea_ballot("0xA", 2, "Yes")).await.unwrap();
  s.cast(NewVote {
      poll:    Poll::StoryElements,
      subject: "1".into(),
      voter:   "0xA".into(),
      choice:  "Yes".into(),
      comment: None,
    })
    .await
    .unwrap();

  let tally = s.tally(Poll::StoryIdeas, "1".into()).await.unwrap();
  assert_eq!(tally.total(), 1);
}

#[tokio::test]
async fn duplicate_ballots_all_count() {
  // No per-voter uniqueness is enforced; every ballot lands.
  let s = store().await;

  s.cast(idea_ballot("0xA", 8, "Yes")).await.unwrap();
  s.cast(idea_ballot("0xA", 8, "Yes")).await.unwrap();

  let tally = s.tally(Poll::StoryIdeas, "8".into()).await.unwrap();
  assert_eq!(tally.count_for("Yes"), 2);
}

#[tokio::test]
async fn voter_ballot_returns_latest_choice() {
  let s = store().await;

  s.cast(idea_ballot("0xA", 4, "No")).await.unwrap();
  s.cast(idea_ballot("0xA", 4, "Yes")).await.unwrap();

  let ballot = s
    .voter_ballot(Poll::StoryIdeas, "4".into(), "0xA".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(ballot.choice, "Yes");

  let none = s
    .voter_ballot(Poll::StoryIdeas, "4".into(), "0xC".into())
    .await
    .unwrap();
  assert!(none.is_none());
}

#[tokio::test]
async fn ballot_comment_roundtrips() {
  let s = store().await;

  let mut ballot = idea_ballot("0xA", 6, "Yes");
  ballot.comment = Some("love the bell tower arc".into());
  s.cast(ballot).await.unwrap();

  let stored = s
    .voter_ballot(Poll::StoryIdeas, "6".into(), "0xA".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(stored.comment.as_deref(), Some("love the bell tower arc"));
}
