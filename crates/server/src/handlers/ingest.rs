#![forbid(unsafe_code)]

use super::LogPath;
use crate::app::AppState;
use crate::error::ApiError;
use axum::extract::{Path, State};
use lt_core::ids::{CommitName, PlayerName};
use lt_core::sanitize::make_safe;

pub(crate) async fn ingest(
    State(state): State<AppState>,
    Path(path): Path<LogPath>,
    body: String,
) -> Result<&'static str, ApiError> {
    let (commit, player) = path.parse()?;
    append_sanitized(&state, commit, player, &body).await?;
    Ok("OK")
}

/// Trims and sanitizes `raw` before it reaches the store; stored text is
/// served to browsers as-is.
pub(crate) async fn append_sanitized(
    state: &AppState,
    commit: CommitName,
    player: PlayerName,
    raw: &str,
) -> Result<(), ApiError> {
    let message = make_safe(raw.trim());
    state
        .with_store("append log", move |store| {
            store.append(&commit, &player, &message)
        })
        .await?;
    tracing::debug!("log line appended");
    Ok(())
}
