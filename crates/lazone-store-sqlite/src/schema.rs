//! SQL schema for the LaZone SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per record. The key is split into its type tag and text so that
-- S \"5\" and N \"5\" stay distinct, and so scans have a stable total order.
CREATE TABLE IF NOT EXISTS items (
    key_type    TEXT NOT NULL,   -- 'S' | 'N'
    key_value   TEXT NOT NULL,
    item_json   TEXT NOT NULL,   -- serde-encoded attribute map
    updated_at  TEXT NOT NULL,   -- RFC 3339 UTC; set on every upsert
    PRIMARY KEY (key_type, key_value)
);

PRAGMA user_version = 1;
";
