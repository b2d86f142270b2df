//! autobase - keep labeled pull requests up to date with their base branch
//!
//! Open pull requests carrying an action label are brought up to date either
//! by merging the base branch into the head branch through the GitHub API
//! (`automerge`) or by rebasing the head branch locally and force-pushing it
//! (`autorebase`). Pull requests whose review state changed after the label
//! was applied lose the label instead.

pub mod auth;
pub mod config;
pub mod error;
pub mod git;
pub mod platform;
pub mod types;
pub mod update;
