#![forbid(unsafe_code)]

use super::StoreError;
use rusqlite::{Connection, params};

const SCHEMA_VERSION: &str = "v1";

// `commit` is an SQL keyword and must stay quoted everywhere.
const SQL: &str = r#"
        CREATE TABLE IF NOT EXISTS meta (
          key TEXT PRIMARY KEY,
          value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS logs (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          "commit" TEXT NOT NULL,
          player TEXT NOT NULL,
          message TEXT NOT NULL,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_logs_commit_player_id ON logs("commit", player, id);
        CREATE INDEX IF NOT EXISTS idx_logs_created_id ON logs(created_at_ms, id);
"#;

pub(super) fn install(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(SQL)?;
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO meta(key, value) VALUES (?1, ?2)",
        params!["schema_version", SCHEMA_VERSION],
    )?;
    if inserted > 0 {
        tracing::info!(schema_version = SCHEMA_VERSION, "created logs table");
    } else {
        tracing::debug!("started with existing logs table");
    }
    Ok(())
}
