//! Core types for autobase

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One side of a pull request (head or base)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRef {
    /// Full name of the repository the branch lives in (`owner/name`)
    pub repo_full_name: String,
    /// Branch name without `refs/heads/`
    pub ref_name: String,
    /// Commit the branch pointed at when the snapshot was taken
    pub sha: String,
}

/// PR state as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrState {
    /// PR is open
    Open,
    /// PR was closed (merged or not)
    Closed,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Snapshot of a pull request, fetched once per pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Open or closed
    pub state: PrState,
    /// Whether the PR has been merged
    pub merged: bool,
    /// Branch carrying the changes
    pub head: BranchRef,
    /// Branch the PR targets
    pub base: BranchRef,
    /// Label names, in platform order
    pub labels: Vec<String>,
    /// Web URL for the PR
    pub html_url: String,
}

impl PullRequest {
    /// Whether the PR comes from a different repository than it targets
    pub fn is_from_fork(&self) -> bool {
        self.head.repo_full_name != self.base.repo_full_name
    }

    /// Whether the PR carries the given label
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l == name)
    }
}

/// GitHub's classification of a PR branch relative to its base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeableState {
    /// Head is out of date with base
    Behind,
    /// Mergeable, but blocked by branch protection
    Blocked,
    /// Mergeable and passing
    Clean,
    /// Merge conflicts
    Dirty,
    /// PR is a draft
    Draft,
    /// Mergeable with passing commit status and pre-receive hooks
    HasHooks,
    /// Mergeable with non-passing commit status
    Unstable,
    /// Not computed yet (or a value this crate does not know)
    #[serde(other)]
    Unknown,
}

impl MergeableState {
    /// Parse GitHub's `mergeable_state` string; unrecognised values map to `Unknown`
    pub fn parse(s: &str) -> Self {
        match s {
            "behind" => Self::Behind,
            "blocked" => Self::Blocked,
            "clean" => Self::Clean,
            "dirty" => Self::Dirty,
            "draft" => Self::Draft,
            "has_hooks" => Self::HasHooks,
            "unstable" => Self::Unstable,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for MergeableState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Behind => "behind",
            Self::Blocked => "blocked",
            Self::Clean => "clean",
            Self::Dirty => "dirty",
            Self::Draft => "draft",
            Self::HasHooks => "has_hooks",
            Self::Unstable => "unstable",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Outcome of merging one branch into another through the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchMergeResult {
    /// Nothing to merge (HTTP 204)
    NoOp,
    /// A merge commit was created (HTTP 201)
    Merged {
        /// SHA of the new merge commit
        sha: String,
    },
}

/// An entry of the issue activity timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueEvent {
    /// Event kind, e.g. `labeled`, `unlabeled`, `closed`
    pub event: String,
    /// Label involved, for label events
    pub label: Option<String>,
    /// When the event happened
    pub created_at: DateTime<Utc>,
}

/// Review verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    /// Reviewer approved
    Approved,
    /// Reviewer requested changes
    ChangesRequested,
    /// Review with comments only
    Commented,
    /// Review was dismissed
    Dismissed,
    /// Review not submitted yet
    Pending,
}

impl std::fmt::Display for ReviewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approved => write!(f, "APPROVED"),
            Self::ChangesRequested => write!(f, "CHANGES_REQUESTED"),
            Self::Commented => write!(f, "COMMENTED"),
            Self::Dismissed => write!(f, "DISMISSED"),
            Self::Pending => write!(f, "PENDING"),
        }
    }
}

/// A submitted (or pending) pull request review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Review ID
    pub id: u64,
    /// Verdict
    pub state: ReviewState,
    /// Submission time; `None` while pending
    pub submitted_at: Option<DateTime<Utc>>,
}

/// A line comment attached to a review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewComment {
    /// Comment ID
    pub id: u64,
}

/// Platform configuration
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

impl PlatformConfig {
    /// `owner/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}
