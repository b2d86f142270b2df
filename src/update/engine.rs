//! Decision engine - per-PR control flow composing resolution, validation
//! and execution

use super::{
    Action, Outcome, SkipReason, Stability, UpdateContext, check_review_stability, merge, rebase,
    resolve_action,
};
use crate::error::{Error, Result};
use crate::types::{PrState, PullRequest};
use std::path::Path;
use tracing::{debug, info};

/// Comment posted when an action label is removed because of review activity.
///
/// The label is not re-added automatically; a person (or an external
/// relabeling trigger) has to apply it again.
pub const LABEL_REMOVED_NOTICE: &str = "Reviews were submitted after this pull request was \
labeled for automatic updates, so the label has been removed. It will be added again once \
the review feedback has been addressed.";

/// Remove every action label and explain why
async fn drop_action_labels(ctx: &UpdateContext<'_>, pr: &PullRequest) -> Result<()> {
    let actions = ctx.config.labels.action_labels();
    let remaining: Vec<String> = pr
        .labels
        .iter()
        .filter(|l| !actions.contains(&l.as_str()))
        .cloned()
        .collect();

    ctx.platform.replace_labels(pr.number, &remaining).await?;
    ctx.platform
        .create_comment(pr.number, LABEL_REMOVED_NOTICE)
        .await?;
    Ok(())
}

/// Check the arguments an executor relies on
fn check_preconditions(work_dir: &Path, clone_url: &str) -> Result<()> {
    if !work_dir.is_dir() {
        return Err(Error::Internal(format!(
            "working directory {} does not exist",
            work_dir.display()
        )));
    }
    if clone_url.trim().is_empty() {
        return Err(Error::Internal("empty clone URL".to_string()));
    }
    Ok(())
}

/// Decide what to do with one pull request and do it.
///
/// Returns the resulting head SHA, a skip reason, or an error that should
/// fail this PR (ambiguous labels, broken preconditions, collaborator
/// failures).
pub async fn update(ctx: &UpdateContext<'_>, pr: &PullRequest) -> Result<Outcome<String>> {
    if pr.merged {
        return Ok(Outcome::Skipped(SkipReason::AlreadyMerged));
    }
    if pr.state == PrState::Closed {
        return Ok(Outcome::Skipped(SkipReason::Closed));
    }
    if pr.is_from_fork() {
        return Ok(Outcome::Skipped(SkipReason::Fork {
            head_repo: pr.head.repo_full_name.clone(),
        }));
    }

    let resolution = resolve_action(pr, &ctx.config.labels)?;
    if resolution.action == Action::None {
        return Ok(Outcome::Skipped(SkipReason::NoAction));
    }
    debug!(pr_number = pr.number, action = %resolution.action, "resolved action");

    if resolution.skip_validation {
        debug!(pr_number = pr.number, "review validation bypassed by label");
    } else {
        let actions = ctx.config.labels.action_labels();
        let stability = check_review_stability(ctx.platform, pr, &actions).await?;
        if stability == Stability::Unstable {
            info!(pr_number = pr.number, "removing action label after review changes");
            drop_action_labels(ctx, pr).await?;
            return Ok(Outcome::Skipped(SkipReason::ReviewUnstable));
        }
    }

    match resolution.action {
        Action::Merge => merge(ctx, pr).await,
        Action::Rebase => {
            let work_dir = tempfile::Builder::new().prefix("autobase-").tempdir()?;
            let clone_url = ctx.platform.clone_url(&pr.head.repo_full_name);
            check_preconditions(work_dir.path(), &clone_url)?;
            // `work_dir` is removed when it drops, on every exit path
            rebase(ctx, work_dir.path(), &clone_url, pr).await
        }
        Action::None => Err(Error::Internal(format!(
            "PR #{} reached execution without an action",
            pr.number
        ))),
    }
}
