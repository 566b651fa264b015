//! DDL for the task database.
//!
//! The `tasks` table layout is kept compatible with databases written by
//! earlier GoalPulse releases, so columns stay loosely typed TEXT.

use rusqlite::Connection;

pub(crate) const SCHEMA_SQL: &str = r#"
-- WAL lets the CLI read while the UI holds the database open.
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS tasks (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    title        TEXT NOT NULL,
    description  TEXT,
    due_date     TEXT,                      -- YYYY-MM-DD or NULL
    priority     INTEGER DEFAULT 0,         -- 0..=3
    status       TEXT DEFAULT 'pending',    -- pending | completed
    created_at   TEXT,                      -- YYYY-MM-DD HH:MM:SS
    completed_at TEXT                       -- set iff status = 'completed'
);

CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status);
"#;

/// Apply the schema. Idempotent.
pub(crate) fn apply_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
