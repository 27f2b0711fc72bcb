#![forbid(unsafe_code)]

use super::LogPath;
use crate::app::AppState;
use crate::error::ApiError;
use crate::pages;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::Html;
use lt_core::fragment::TailResponse;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct TailQuery {
    #[serde(default)]
    after: usize,
}

pub(crate) async fn log_page(
    State(state): State<AppState>,
    Path(path): Path<LogPath>,
) -> Result<Html<String>, ApiError> {
    let (commit, player) = path.parse()?;
    let (c, p) = (commit.clone(), player.clone());
    let (messages, total) = state
        .with_store("read logs", move |store| {
            let messages = store.read_messages(&c, &p, 0)?;
            let total = store.count_messages(&c, &p)?;
            Ok((messages, total))
        })
        .await?;
    Ok(Html(pages::log_page(&commit, &player, &messages, total)))
}

/// One poll of the browser tail loop. Positional and stateless: the client
/// sends how many lines it already shows.
pub(crate) async fn new_logs(
    State(state): State<AppState>,
    Path(path): Path<LogPath>,
    Query(query): Query<TailQuery>,
) -> Result<Json<TailResponse>, ApiError> {
    let (commit, player) = path.parse()?;
    let after = query.after;
    let messages = state
        .with_store("read new logs", move |store| {
            store.read_messages(&commit, &player, after)
        })
        .await?;
    Ok(Json(TailResponse::from_messages(&messages)))
}
