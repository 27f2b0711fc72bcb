#![forbid(unsafe_code)]

pub mod fragment;
pub mod listing;
pub mod sanitize;
pub mod time;

pub mod ids {
    const MAX_NAME_BYTES: usize = 256;

    /// Commit a group of logs was produced on (usually a VCS revision).
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct CommitName(String);

    /// Log-producing client within a commit.
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct PlayerName(String);

    impl CommitName {
        pub fn try_new(value: impl Into<String>) -> Result<Self, NameError> {
            let value = value.into();
            validate_name(&value)?;
            Ok(Self(value))
        }

        pub fn as_str(&self) -> &str {
            &self.0
        }
    }

    impl PlayerName {
        pub fn try_new(value: impl Into<String>) -> Result<Self, NameError> {
            let value = value.into();
            validate_name(&value)?;
            Ok(Self(value))
        }

        pub fn as_str(&self) -> &str {
            &self.0
        }
    }

    impl std::fmt::Display for CommitName {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl std::fmt::Display for PlayerName {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum NameError {
        Empty,
        TooLong,
        ContainsControl,
    }

    impl NameError {
        pub fn message(&self) -> &'static str {
            match self {
                Self::Empty => "name must not be empty",
                Self::TooLong => "name must be at most 256 bytes",
                Self::ContainsControl => "name contains control characters",
            }
        }
    }

    impl std::fmt::Display for NameError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.message())
        }
    }

    impl std::error::Error for NameError {}

    fn validate_name(value: &str) -> Result<(), NameError> {
        if value.trim().is_empty() {
            return Err(NameError::Empty);
        }
        if value.len() > MAX_NAME_BYTES {
            return Err(NameError::TooLong);
        }
        if value.chars().any(|c| c.is_control()) {
            return Err(NameError::ContainsControl);
        }
        Ok(())
    }
}

pub mod model {
    use serde::Serialize;

    /// One stored log line. Rows are never updated after insert.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize)]
    pub struct LogEntry {
        pub commit: String,
        pub player: String,
        pub message: String,
        pub created_at_ms: i64,
    }

    /// A distinct commit and the timestamp of its oldest log line.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct CommitSummary {
        pub commit: String,
        pub first_seen_ms: i64,
    }

    /// A distinct player within a commit and the timestamp of its newest log line.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct PlayerSummary {
        pub player: String,
        pub last_seen_ms: i64,
    }
}
