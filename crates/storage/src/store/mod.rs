#![forbid(unsafe_code)]

mod error;
mod schema;

pub use error::StoreError;

use lt_core::ids::{CommitName, PlayerName};
use lt_core::model::{CommitSummary, LogEntry, PlayerSummary};
use lt_core::time::now_ms;
use rusqlite::{Connection, ToSql, params};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Maximum number of messages returned by one read.
pub const PAGE_SIZE: usize = 500;
/// Rows per multi-row INSERT in [`LogStore::append_batch`]; keeps every
/// statement well under SQLite's bound-parameter limit.
pub const BATCH_CHUNK_ROWS: usize = 50;

const IN_MEMORY: &str = ":memory:";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    InMemory,
}

impl StoreLocation {
    pub fn parse(raw: &str) -> Self {
        if raw.trim() == IN_MEMORY {
            Self::InMemory
        } else {
            Self::File(PathBuf::from(raw))
        }
    }
}

impl std::fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::InMemory => f.write_str(IN_MEMORY),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Neither a commit nor a player was given; nothing was touched.
    NothingSpecified,
    Deleted(usize),
}

/// Append-only store of log lines grouped by (commit, player).
///
/// Messages of one group are always read back in insertion order (row id),
/// which is what makes the positional `after` offset of the tail protocol
/// sound.
#[derive(Debug)]
pub struct LogStore {
    conn: Connection,
    location: StoreLocation,
}

impl LogStore {
    pub fn open(location: StoreLocation) -> Result<Self, StoreError> {
        let conn = match &location {
            StoreLocation::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                Connection::open(path)?
            }
            StoreLocation::InMemory => Connection::open_in_memory()?,
        };
        conn.busy_timeout(Duration::from_secs(5))?;
        schema::install(&conn)?;
        tracing::info!(location = %location, "log store opened");

        Ok(Self { conn, location })
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    pub fn close(self) -> Result<(), StoreError> {
        let location = self.location;
        self.conn.close().map_err(|(_, err)| StoreError::Sql(err))?;
        tracing::info!(location = %location, "log store closed");
        Ok(())
    }

    pub fn append(
        &mut self,
        commit: &CommitName,
        player: &PlayerName,
        message: &str,
    ) -> Result<(), StoreError> {
        let now_ms = now_ms();
        self.conn.execute(
            r#"
            INSERT INTO logs("commit", player, message, created_at_ms, updated_at_ms)
            VALUES (?1, ?2, ?3, ?4, ?4)
            "#,
            params![commit.as_str(), player.as_str(), message, now_ms],
        )?;
        Ok(())
    }

    /// Inserts all entries in one transaction, `BATCH_CHUNK_ROWS` rows per
    /// statement. Either every entry lands or none does.
    pub fn append_batch(&mut self, entries: &[LogEntry]) -> Result<usize, StoreError> {
        if entries.is_empty() {
            return Ok(0);
        }

        let tx = self.conn.transaction()?;
        for chunk in entries.chunks(BATCH_CHUNK_ROWS) {
            insert_chunk_tx(&tx, chunk)?;
        }
        tx.commit()?;
        Ok(entries.len())
    }

    /// Up to [`PAGE_SIZE`] messages starting at position `after`.
    pub fn read_messages(
        &self,
        commit: &CommitName,
        player: &PlayerName,
        after: usize,
    ) -> Result<Vec<String>, StoreError> {
        let offset = to_sqlite_i64(after)?;
        let limit = to_sqlite_i64(PAGE_SIZE)?;

        let mut stmt = self.conn.prepare(
            r#"
            SELECT message
            FROM logs
            WHERE "commit" = ?1 AND player = ?2
            ORDER BY id ASC
            LIMIT ?3 OFFSET ?4
            "#,
        )?;
        let rows = stmt.query_map(
            params![commit.as_str(), player.as_str(), limit, offset],
            |row| row.get::<_, String>(0),
        )?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Every row in insertion order. Unbounded; only the debug dump uses it.
    pub fn all_entries(&self) -> Result<Vec<LogEntry>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT "commit", player, message, created_at_ms
            FROM logs
            ORDER BY id ASC
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(LogEntry {
                commit: row.get(0)?,
                player: row.get(1)?,
                message: row.get(2)?,
                created_at_ms: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn count_messages(
        &self,
        commit: &CommitName,
        player: &PlayerName,
    ) -> Result<usize, StoreError> {
        let count: i64 = self.conn.query_row(
            r#"SELECT COUNT(*) FROM logs WHERE "commit" = ?1 AND player = ?2"#,
            params![commit.as_str(), player.as_str()],
            |row| row.get(0),
        )?;
        usize::try_from(count).map_err(|_| StoreError::InvalidInput("negative row count"))
    }

    /// Distinct commits, newest first. A commit's position is decided by its
    /// oldest row, so every row is scanned in ascending time order before
    /// deduplication.
    pub fn list_commits(&self) -> Result<Vec<CommitSummary>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT "commit", created_at_ms
            FROM logs
            ORDER BY created_at_ms ASC, id ASC
            "#,
        )?;
        let mut rows = stmt.query([])?;
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let commit: String = row.get(0)?;
            if seen.contains(&commit) {
                continue;
            }
            seen.insert(commit.clone());
            out.push(CommitSummary {
                commit,
                first_seen_ms: row.get(1)?,
            });
        }
        out.reverse();
        Ok(out)
    }

    /// Distinct players of `commit`, most recently active first.
    pub fn list_players(&self, commit: &CommitName) -> Result<Vec<PlayerSummary>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT player, created_at_ms
            FROM logs
            WHERE "commit" = ?1
            ORDER BY created_at_ms DESC, id DESC
            "#,
        )?;
        let mut rows = stmt.query(params![commit.as_str()])?;
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let player: String = row.get(0)?;
            if seen.contains(&player) {
                continue;
            }
            seen.insert(player.clone());
            out.push(PlayerSummary {
                player,
                last_seen_ms: row.get(1)?,
            });
        }
        Ok(out)
    }

    pub fn delete(
        &mut self,
        commit: Option<&CommitName>,
        player: Option<&PlayerName>,
    ) -> Result<DeleteOutcome, StoreError> {
        let deleted = match (commit, player) {
            (None, None) => return Ok(DeleteOutcome::NothingSpecified),
            (Some(commit), Some(player)) => self.conn.execute(
                r#"DELETE FROM logs WHERE "commit" = ?1 AND player = ?2"#,
                params![commit.as_str(), player.as_str()],
            )?,
            (Some(commit), None) => self.conn.execute(
                r#"DELETE FROM logs WHERE "commit" = ?1"#,
                params![commit.as_str()],
            )?,
            (None, Some(player)) => self.conn.execute(
                "DELETE FROM logs WHERE player = ?1",
                params![player.as_str()],
            )?,
        };
        Ok(DeleteOutcome::Deleted(deleted))
    }
}

fn insert_chunk_tx(tx: &rusqlite::Transaction<'_>, chunk: &[LogEntry]) -> Result<(), StoreError> {
    let placeholders = vec!["(?, ?, ?, ?, ?)"; chunk.len()].join(", ");
    let sql = format!(
        r#"INSERT INTO logs("commit", player, message, created_at_ms, updated_at_ms) VALUES {placeholders}"#
    );
    let mut values: Vec<&dyn ToSql> = Vec::with_capacity(chunk.len() * 5);
    for entry in chunk {
        values.push(&entry.commit);
        values.push(&entry.player);
        values.push(&entry.message);
        values.push(&entry.created_at_ms);
        values.push(&entry.created_at_ms);
    }
    tx.execute(&sql, values.as_slice())?;
    Ok(())
}

fn to_sqlite_i64(value: usize) -> Result<i64, StoreError> {
    i64::try_from(value).map_err(|_| StoreError::InvalidInput("numeric overflow"))
}
