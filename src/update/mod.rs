//! Update engine for labeled pull requests
//!
//! Per pull request, three stages run in order:
//! 1. Resolve - pick the action from the label set (pure)
//! 2. Validate - make sure the review state did not regress since labeling
//! 3. Execute - merge base into head, or rebase head onto base
//!
//! Each stage reports a tagged result; expected "leave this PR alone"
//! conditions are [`Outcome::Skipped`], genuine failures are `Err`.

mod action;
mod batch;
mod delay;
mod engine;
mod merge;
mod rebase;
mod review;

pub use action::{Action, Resolution, check_label_gates, resolve_action};
pub use batch::{PassSummary, run_pass};
pub use delay::{Delay, TokioDelay};
pub use engine::{LABEL_REMOVED_NOTICE, update};
pub use merge::merge;
pub use rebase::rebase;
pub use review::{Stability, check_review_stability};

use crate::config::Config;
use crate::git::GitOps;
use crate::platform::PlatformService;
use crate::types::MergeableState;

/// Everything the engine needs, threaded explicitly through every stage
#[derive(Clone, Copy)]
pub struct UpdateContext<'a> {
    /// Immutable process-wide configuration
    pub config: &'a Config,
    /// Hosting platform
    pub platform: &'a dyn PlatformService,
    /// Local git primitives
    pub git: &'a dyn GitOps,
    /// Settle delay implementation
    pub delay: &'a dyn Delay,
}

/// Result of a stage that may decline to act
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome<T> {
    /// The stage completed
    Done(T),
    /// Nothing should be done to this PR in this pass
    Skipped(SkipReason),
}

/// Why a pull request was left alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// PR is already merged
    AlreadyMerged,
    /// PR is closed
    Closed,
    /// Head branch lives in another repository
    Fork {
        /// Repository of the head branch
        head_repo: String,
    },
    /// A blocking label is present
    BlockingLabel(String),
    /// A required label is missing
    MissingRequiredLabel(String),
    /// No action label is present
    NoAction,
    /// Reviews changed after the action label was applied; the label was removed
    ReviewUnstable,
    /// GitHub does not consider the branch updatable
    NotMergeable(MergeableState),
    /// The head branch moved since the PR snapshot was taken
    HeadMoved {
        /// SHA in the snapshot
        expected: String,
        /// SHA found after cloning
        actual: String,
    },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyMerged => write!(f, "already merged"),
            Self::Closed => write!(f, "closed"),
            Self::Fork { head_repo } => write!(f, "head branch is in fork {head_repo}"),
            Self::BlockingLabel(label) => write!(f, "blocked by label '{label}'"),
            Self::MissingRequiredLabel(label) => write!(f, "missing required label '{label}'"),
            Self::NoAction => write!(f, "no action label"),
            Self::ReviewUnstable => write!(f, "review changed after labeling, label removed"),
            Self::NotMergeable(state) => write!(f, "mergeable state is {state}"),
            Self::HeadMoved { expected, actual } => {
                write!(f, "head moved from {expected} to {actual}")
            }
        }
    }
}
