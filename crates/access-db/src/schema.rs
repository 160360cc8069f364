//! Table definitions, one database file per store.

pub const CREDENTIALS: &str = r#"
CREATE TABLE IF NOT EXISTS credentials (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    discord_id TEXT NOT NULL UNIQUE,
    steam64_id TEXT,
    dirty INTEGER NOT NULL DEFAULT 1
);
"#;

pub const ACCESS: &str = r#"
CREATE TABLE IF NOT EXISTS access (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL DEFAULT 0,
    access BLOB NOT NULL
);
"#;

pub const PERMA_LIMIT: &str = r#"
CREATE TABLE IF NOT EXISTS perma_limit (
    id INTEGER PRIMARY KEY,
    char_slot INTEGER NOT NULL DEFAULT 0,
    lore_char_slot INTEGER NOT NULL DEFAULT 0,
    weight_bytes INTEGER NOT NULL DEFAULT 0
);
"#;

pub const TIMED_LIMIT: &str = r#"
CREATE TABLE IF NOT EXISTS timed_limit (
    uid INTEGER PRIMARY KEY AUTOINCREMENT,
    id INTEGER NOT NULL,
    char_slot INTEGER NOT NULL DEFAULT 0,
    weight_bytes INTEGER NOT NULL DEFAULT 0,
    expired INTEGER NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('active', 'expired', 'disabled'))
);

CREATE INDEX IF NOT EXISTS idx_timed_limit_id ON timed_limit (id);
CREATE INDEX IF NOT EXISTS idx_timed_limit_expired ON timed_limit (expired);
"#;

pub const DB_CHAR: &str = r#"
CREATE TABLE IF NOT EXISTS db_char (
    uid INTEGER PRIMARY KEY AUTOINCREMENT,
    id INTEGER NOT NULL,
    name TEXT NOT NULL,
    discord_url TEXT,
    char_type TEXT NOT NULL,
    content_ids BLOB NOT NULL,
    game_db_id INTEGER
);

CREATE INDEX IF NOT EXISTS idx_db_char_id ON db_char (id);
"#;
