//! SQL schema for the Kakeibo SQLite store.
//!
//! The schema version lives in `PRAGMA user_version`. Upgrades only ever
//! create what is missing.

/// The schema version this build reads and writes.
pub const SCHEMA_VERSION: i64 = 1;

/// Connection settings applied on every open, outside any transaction.
pub const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
";

/// Version 1 DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA_V1: &str = "
CREATE TABLE IF NOT EXISTS expenses (
    id          TEXT PRIMARY KEY NOT NULL,
    date        TEXT NOT NULL,             -- YYYY-MM-DD
    amount_jpy  INTEGER NOT NULL,
    category    TEXT NOT NULL,
    tags        TEXT NOT NULL DEFAULT '',  -- ';'-joined labels
    memo        TEXT NOT NULL DEFAULT '',
    updated_at  TEXT NOT NULL              -- RFC 3339 UTC
);

-- Non-unique. Entries sharing a date are ordered by id.
CREATE INDEX IF NOT EXISTS expenses_date_idx ON expenses(date, id);
";
