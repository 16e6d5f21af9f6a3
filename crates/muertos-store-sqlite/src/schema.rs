//! SQL schema for the Muertos SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Current rows: exactly one per (collection, identity), always holding the
-- highest version of that identity.
CREATE TABLE IF NOT EXISTS records (
    collection  TEXT NOT NULL,   -- e.g. 'characters', 'story_elements'
    identity    TEXT NOT NULL,   -- natural key: token id or name as text
    version     INTEGER NOT NULL,
    payload     TEXT NOT NULL,   -- JSON payload (entity fields only)
    created_at  TEXT NOT NULL,   -- ISO 8601 UTC; set once, carried forward
    updated_at  TEXT NOT NULL,   -- ISO 8601 UTC; refreshed on every write
    PRIMARY KEY (collection, identity)
);

-- Superseded rows. Strictly append-only: no UPDATE or DELETE is ever
-- issued against this table. The primary key forbids duplicate versions.
CREATE TABLE IF NOT EXISTS record_history (
    collection  TEXT NOT NULL,
    identity    TEXT NOT NULL,
    version     INTEGER NOT NULL,
    payload     TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    PRIMARY KEY (collection, identity, version)
);

-- Ballots are append-only; no uniqueness per voter.
CREATE TABLE IF NOT EXISTS votes (
    vote_id  TEXT PRIMARY KEY,
    poll     TEXT NOT NULL,      -- 'story-ideas' | 'story-elements'
    subject  TEXT NOT NULL,      -- token id or element name as text
    voter    TEXT NOT NULL,      -- wallet address
    choice   TEXT NOT NULL,
    comment  TEXT,
    cast_at  TEXT NOT NULL       -- ISO 8601 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS history_identity_idx
    ON record_history(collection, identity);
CREATE INDEX IF NOT EXISTS votes_subject_idx ON votes(poll, subject);
CREATE INDEX IF NOT EXISTS votes_voter_idx   ON votes(poll, subject, voter);

PRAGMA user_version = 1;
";
