#![forbid(unsafe_code)]

//! Bulk load of a JSON dump shaped `{commit: {player: [message, ...]}}`.

use anyhow::Context;
use lt_core::ids::{CommitName, PlayerName};
use lt_core::model::LogEntry;
use lt_core::sanitize::make_safe;
use lt_core::time::now_ms;
use lt_storage::{LogStore, StoreLocation};
use std::collections::BTreeMap;
use std::path::Path;

pub type LogDump = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// Flattens a dump into entries stamped `created_at_ms`. Messages keep the
/// order they have in the file and go through the same sanitizer as live
/// ingestion, since pages render stored text as-is.
pub fn dump_entries(dump: LogDump, created_at_ms: i64) -> anyhow::Result<Vec<LogEntry>> {
    let mut entries = Vec::new();
    for (commit, players) in dump {
        CommitName::try_new(commit.as_str()).with_context(|| format!("commit {commit:?}"))?;
        for (player, messages) in players {
            PlayerName::try_new(player.as_str())
                .with_context(|| format!("player {player:?} on commit {commit:?}"))?;
            entries.extend(messages.into_iter().map(|message| LogEntry {
                commit: commit.clone(),
                player: player.clone(),
                message: make_safe(&message),
                created_at_ms,
            }));
        }
    }
    Ok(entries)
}

pub fn read_dump(path: &Path) -> anyhow::Result<LogDump> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))
}

/// Imports `path` into an already open store in one transaction.
pub fn import_into(store: &mut LogStore, path: &Path) -> anyhow::Result<usize> {
    let dump = read_dump(path)?;
    let commits = dump.len();
    let entries = dump_entries(dump, now_ms())?;
    let inserted = store.append_batch(&entries)?;
    tracing::info!(
        file = %path.display(),
        commits,
        rows = inserted,
        "imported log dump"
    );
    Ok(inserted)
}

pub fn run_import(location: StoreLocation, path: &Path) -> anyhow::Result<usize> {
    let mut store = LogStore::open(location)?;
    let inserted = import_into(&mut store, path)?;
    store.close()?;
    Ok(inserted)
}
