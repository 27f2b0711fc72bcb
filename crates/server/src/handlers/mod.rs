#![forbid(unsafe_code)]

pub(crate) mod debug;
pub(crate) mod delete;
pub(crate) mod ingest;
pub(crate) mod listing;
pub(crate) mod tail;

use crate::error::ApiError;
use lt_core::ids::{CommitName, PlayerName};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct CommitPath {
    commit: String,
}

impl CommitPath {
    pub(crate) fn parse(self) -> Result<CommitName, ApiError> {
        CommitName::try_new(self.commit).map_err(|err| ApiError::invalid_name("commit", err))
    }
}

/// `/logs/{commit}/{player}` and everything below it.
#[derive(Debug, Deserialize)]
pub(crate) struct LogPath {
    commit: String,
    player: String,
}

impl LogPath {
    pub(crate) fn parse(self) -> Result<(CommitName, PlayerName), ApiError> {
        let commit =
            CommitName::try_new(self.commit).map_err(|err| ApiError::invalid_name("commit", err))?;
        let player =
            PlayerName::try_new(self.player).map_err(|err| ApiError::invalid_name("player", err))?;
        Ok((commit, player))
    }

    /// Debug routes answer any bad name with the same terse message.
    pub(crate) fn parse_or_bad_input(self) -> Result<(CommitName, PlayerName), ApiError> {
        let message = format!("Bad input: {}/{}", self.commit, self.player);
        self.parse().map_err(|_| ApiError::BadRequest(message))
    }
}
