//! Git primitives used by the rebase executor
//!
//! The executor only needs a handful of operations, each of which either
//! succeeds or fails the current pull request.

mod cli;

pub use cli::GitCli;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Git operations on a scratch working directory
#[async_trait]
pub trait GitOps: Send + Sync {
    /// Clone `branch` of `url` into the (empty) directory `dir`
    async fn clone_branch(&self, url: &str, dir: &Path, branch: &str) -> Result<()>;

    /// Fetch `branch` from origin into `origin/<branch>`
    async fn fetch(&self, dir: &Path, branch: &str) -> Result<()>;

    /// Deepen history until `HEAD` and `origin/<branch>` share a merge base.
    ///
    /// Fails with [`crate::error::Error::MergeBaseTimeout`] once `timeout` elapses.
    async fn fetch_until_merge_base(&self, dir: &Path, branch: &str, timeout: Duration)
    -> Result<()>;

    /// Commit SHA of `HEAD`
    async fn head(&self, dir: &Path) -> Result<String>;

    /// Commit SHA of an arbitrary revision
    async fn sha(&self, dir: &Path, rev: &str) -> Result<String>;

    /// Rebase the checked-out branch onto `onto`
    async fn rebase(&self, dir: &Path, onto: &str) -> Result<()>;

    /// Push `HEAD` to `branch` on origin
    async fn push(&self, dir: &Path, force: bool, branch: &str) -> Result<()>;
}

/// Remote-tracking ref for a branch on origin
pub fn remote_ref(branch: &str) -> String {
    format!("origin/{branch}")
}
