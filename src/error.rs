//! Error types for autobase

use std::time::Duration;
use thiserror::Error;

/// Errors that abort processing of a pull request (or of a whole pass).
///
/// Expected conditions such as "no action label" are not errors; they are
/// reported as [`crate::update::Outcome::Skipped`].
#[derive(Debug, Error)]
pub enum Error {
    /// GitHub API call failed
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// A git subprocess failed
    #[error("git error: {0}")]
    Git(String),

    /// Configuration could not be loaded or is invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// No usable token was found
    #[error("authentication error: {0}")]
    Auth(String),

    /// More than one action label is present on a pull request
    #[error("PR #{pr_number} has conflicting action labels: {}", labels.join(", "))]
    AmbiguousAction {
        /// Pull request number
        pr_number: u64,
        /// The action labels found on the PR
        labels: Vec<String>,
    },

    /// The head branch shares no history with the base branch within the deadline
    #[error("no merge base with '{base}' found within {}s", timeout.as_secs())]
    MergeBaseTimeout {
        /// Base branch searched for
        base: String,
        /// Deadline that was exceeded
        timeout: Duration,
    },

    /// Broken internal precondition
    #[error("internal error: {0}")]
    Internal(String),

    /// Filesystem error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<octocrab::Error> for Error {
    fn from(e: octocrab::Error) -> Self {
        Self::GitHubApi(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::GitHubApi(e.to_string())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
