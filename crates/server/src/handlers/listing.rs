#![forbid(unsafe_code)]

use super::CommitPath;
use crate::app::AppState;
use crate::error::ApiError;
use crate::pages;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use lt_core::listing::{CommitListing, PlayerListing};

pub(crate) async fn list_commits(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let commits = state
        .with_store("list commits", |store| store.list_commits())
        .await?;
    Ok(Html(pages::commits_page(&CommitListing::from_summaries(
        commits,
    ))))
}

pub(crate) async fn list_players(
    State(state): State<AppState>,
    Path(path): Path<CommitPath>,
) -> Result<Response, ApiError> {
    let commit = path.parse()?;
    let lookup = commit.clone();
    let players = state
        .with_store("list players", move |store| store.list_players(&lookup))
        .await?;

    let response = match PlayerListing::from_summaries(players) {
        PlayerListing::Redirect(player) => {
            Redirect::to(&pages::player_path(commit.as_str(), &player)).into_response()
        }
        listing => Html(pages::players_page(&commit, &listing)).into_response(),
    };
    Ok(response)
}
