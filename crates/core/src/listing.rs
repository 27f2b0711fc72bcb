#![forbid(unsafe_code)]

use crate::model::{CommitSummary, PlayerSummary};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitListing {
    /// Nothing has been logged yet; shown as a friendly message instead of an empty page.
    NoLogs,
    Commits(Vec<CommitSummary>),
}

impl CommitListing {
    pub fn from_summaries(commits: Vec<CommitSummary>) -> Self {
        if commits.is_empty() {
            Self::NoLogs
        } else {
            Self::Commits(commits)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerListing {
    NoPlayers,
    /// A single player: a list with one link is pointless, go straight to its logs.
    Redirect(String),
    Players(Vec<PlayerSummary>),
}

impl PlayerListing {
    pub fn from_summaries(mut players: Vec<PlayerSummary>) -> Self {
        match players.len() {
            0 => Self::NoPlayers,
            1 => Self::Redirect(players.remove(0).player),
            _ => Self::Players(players),
        }
    }
}
