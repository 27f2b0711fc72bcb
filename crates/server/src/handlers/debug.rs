#![forbid(unsafe_code)]

//! GET-only shortcuts for poking at a running server from a browser tab.
//! Mounted only with `--debug-routes`.

use super::LogPath;
use super::ingest::append_sanitized;
use crate::app::AppState;
use crate::demo;
use crate::error::ApiError;
use axum::Json;
use axum::extract::{Path, State};
use lt_core::model::LogEntry;
use lt_core::time::now_ms;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct MessagePath {
    commit: String,
    player: String,
    msg: String,
}

pub(crate) async fn fill(
    State(state): State<AppState>,
    Path(path): Path<LogPath>,
) -> Result<String, ApiError> {
    let (commit, player) = path.parse_or_bad_input()?;
    let now = now_ms();
    let entries: Vec<LogEntry> = (0..demo::FILL_LINES)
        .map(|_| LogEntry {
            commit: commit.to_string(),
            player: player.to_string(),
            message: demo::demo_line(now),
            created_at_ms: now,
        })
        .collect();

    state
        .with_store("fill logs", move |store| store.append_batch(&entries))
        .await?;
    Ok(format!("Filled {player} with some logs"))
}

pub(crate) async fn ingest_from_path(
    State(state): State<AppState>,
    Path(path): Path<MessagePath>,
) -> Result<&'static str, ApiError> {
    let MessagePath {
        commit,
        player,
        msg,
    } = path;
    let (commit, player) = LogPath { commit, player }.parse_or_bad_input()?;
    append_sanitized(&state, commit, player, &msg).await?;
    Ok("OK")
}

/// `GET /debug`: every stored row as JSON, oldest first.
pub(crate) async fn dump(State(state): State<AppState>) -> Result<Json<Vec<LogEntry>>, ApiError> {
    let entries = state
        .with_store("dump logs", |store| store.all_entries())
        .await?;
    Ok(Json(entries))
}
