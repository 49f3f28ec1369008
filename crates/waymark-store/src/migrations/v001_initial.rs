//! v001 -- Initial schema creation.
//!
//! Creates the four record collections (`maps`, `users`, `map_wikis`,
//! `dungeon_projects`) plus the `app_state` table for scoped singleton
//! values. Collection tables are deliberately uniform: one key column,
//! one bincode-encoded value blob.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Maps
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS maps (
    key   TEXT PRIMARY KEY NOT NULL,   -- map id (UUID v4)
    value BLOB NOT NULL                -- bincode MapRecord
);

-- ----------------------------------------------------------------
-- Users
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    key   TEXT PRIMARY KEY NOT NULL,   -- user id (UUID v4)
    value BLOB NOT NULL                -- bincode User
);

-- ----------------------------------------------------------------
-- Map wikis (keyed by the owning map id)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS map_wikis (
    key   TEXT PRIMARY KEY NOT NULL,   -- owning map id
    value BLOB NOT NULL                -- bincode MapWiki
);

-- ----------------------------------------------------------------
-- Dungeon sketch projects
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS dungeon_projects (
    key   TEXT PRIMARY KEY NOT NULL,   -- project id (UUID v4)
    value BLOB NOT NULL                -- bincode DungeonProject
);

-- ----------------------------------------------------------------
-- Scoped singleton values (session key, settings JSON)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS app_state (
    key   TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);
"#;

/// Apply the v001 schema.
pub fn up(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(UP_SQL)
}
