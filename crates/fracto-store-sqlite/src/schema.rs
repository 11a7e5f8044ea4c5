//! SQL schema for the fracto SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per (user, category, value). Edits are delete + insert, never UPDATE
-- of `value`; the upsert below only refreshes metadata and confirmation.
CREATE TABLE IF NOT EXISTS user_profile_items (
    id            TEXT PRIMARY KEY,
    user_id       TEXT NOT NULL,
    item_type     TEXT NOT NULL,   -- 'location' | 'role_preference' | 'company' | 'skill'
    value         TEXT NOT NULL,
    metadata_json TEXT NOT NULL DEFAULT '{}',
    confirmed     INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL,   -- RFC 3339 UTC, fixed width
    updated_at    TEXT NOT NULL,
    UNIQUE (user_id, item_type, value)
);

CREATE INDEX IF NOT EXISTS items_user_idx ON user_profile_items(user_id, created_at);

-- Job board listings. Only active fractional rows are ever searched.
CREATE TABLE IF NOT EXISTS jobs (
    id              TEXT PRIMARY KEY,
    slug            TEXT NOT NULL UNIQUE,
    title           TEXT NOT NULL,
    company_name    TEXT,
    location        TEXT,
    is_remote       INTEGER NOT NULL DEFAULT 0,
    workplace_type  TEXT,            -- 'Remote' | 'Hybrid' | 'On-site'
    compensation    TEXT,
    role_category   TEXT,
    skills_json     TEXT NOT NULL DEFAULT '[]',
    posted_date     TEXT,            -- YYYY-MM-DD
    hours_per_week  TEXT,
    is_active       INTEGER NOT NULL DEFAULT 1,
    is_fractional   INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS jobs_search_idx ON jobs(role_category, posted_date);

PRAGMA user_version = 2;
";
