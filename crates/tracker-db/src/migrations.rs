use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

const SCHEMA_VERSION: i64 = 1;

/// Bring the schema up to date. Safe to call on every open.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (users, exercises)");
        // exercises.user_id is not a foreign key; the exercise handler checks it.
        conn.execute_batch(
            "
            CREATE TABLE users (
                id          TEXT PRIMARY KEY,
                username    TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE exercises (
                id          TEXT PRIMARY KEY,
                user_id     TEXT NOT NULL,
                description TEXT NOT NULL,
                duration    INTEGER NOT NULL CHECK (duration > 0),
                date        TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_exercises_user_date
                ON exercises(user_id, date);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete (schema v{})", SCHEMA_VERSION);
    Ok(())
}
