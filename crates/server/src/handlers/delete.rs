#![forbid(unsafe_code)]

use super::{CommitPath, LogPath};
use crate::app::AppState;
use crate::error::ApiError;
use axum::extract::{Path, State};
use lt_core::ids::{CommitName, PlayerName};
use lt_storage::DeleteOutcome;

const NOTHING_SPECIFIED: &str = "Must specify a commit or player for logs to delete";

/// `DELETE /logs` names no scope, so it always answers 400.
pub(crate) async fn delete_unscoped(State(state): State<AppState>) -> Result<String, ApiError> {
    run_delete(&state, None, None).await
}

pub(crate) async fn delete_commit(
    State(state): State<AppState>,
    Path(path): Path<CommitPath>,
) -> Result<String, ApiError> {
    let commit = path.parse()?;
    run_delete(&state, Some(commit), None).await
}

pub(crate) async fn delete_player(
    State(state): State<AppState>,
    Path(path): Path<LogPath>,
) -> Result<String, ApiError> {
    let (commit, player) = path.parse()?;
    run_delete(&state, Some(commit), Some(player)).await
}

async fn run_delete(
    state: &AppState,
    commit: Option<CommitName>,
    player: Option<PlayerName>,
) -> Result<String, ApiError> {
    let message = match (&commit, &player) {
        (Some(c), Some(p)) => format!("Deleted all logs for the player {p} on commit {c}"),
        (Some(c), None) => format!("Deleted all logs for commit {c}"),
        (None, Some(p)) => format!("Deleted all logs for the player {p}"),
        (None, None) => String::new(),
    };

    let outcome = state
        .with_store("delete logs", move |store| {
            store.delete(commit.as_ref(), player.as_ref())
        })
        .await?;

    match outcome {
        DeleteOutcome::NothingSpecified => {
            Err(ApiError::BadRequest(NOTHING_SPECIFIED.to_string()))
        }
        DeleteOutcome::Deleted(rows) => {
            tracing::info!(rows, "deleted logs");
            Ok(message)
        }
    }
}
