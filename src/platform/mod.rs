//! Platform services
//!
//! Provides the hosting-platform operations the update engine consumes.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{
    BranchMergeResult, IssueEvent, MergeableState, PlatformConfig, PullRequest, Review,
    ReviewComment,
};
use async_trait::async_trait;

/// Platform service trait for pull request operations
///
/// The update engine only talks to the hosting platform through this trait,
/// so tests can substitute a recording mock.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// List open PRs, most recently updated first
    async fn list_open_pull_requests(&self, page_size: u8) -> Result<Vec<PullRequest>>;

    /// Fetch the current mergeable state of a PR
    async fn get_mergeable_state(&self, pr_number: u64) -> Result<MergeableState>;

    /// Merge branch `from` into branch `into`
    async fn merge_branch(&self, into: &str, from: &str) -> Result<BranchMergeResult>;

    /// Replace the full label set of a PR
    async fn replace_labels(&self, pr_number: u64, labels: &[String]) -> Result<()>;

    /// Create a comment on a PR
    async fn create_comment(&self, pr_number: u64, body: &str) -> Result<()>;

    /// List reviews of a PR, oldest first
    async fn list_reviews(&self, pr_number: u64) -> Result<Vec<Review>>;

    /// List issue timeline events of a PR, oldest first
    async fn list_issue_events(&self, pr_number: u64) -> Result<Vec<IssueEvent>>;

    /// List the comments attached to one review
    async fn list_review_comments(&self, pr_number: u64, review_id: u64)
    -> Result<Vec<ReviewComment>>;

    /// URL that `git clone` can use for the given repository, credentials included
    fn clone_url(&self, repo_full_name: &str) -> String;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
