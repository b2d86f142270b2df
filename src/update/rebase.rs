//! Rebase executor - update a PR branch by rebasing locally and force-pushing

use super::{Outcome, SkipReason, UpdateContext};
use crate::error::Result;
use crate::git::remote_ref;
use crate::types::PullRequest;
use std::path::Path;
use tracing::{debug, info};

/// Rebase the PR's head branch onto its base and force-push the result.
///
/// `work_dir` must be an empty directory owned by the caller for the whole
/// call. The HEAD comparison against the PR snapshot is the only guard
/// against concurrent pushes: a moved head is skipped, never rebased.
pub async fn rebase(
    ctx: &UpdateContext<'_>,
    work_dir: &Path,
    clone_url: &str,
    pr: &PullRequest,
) -> Result<Outcome<String>> {
    let git = ctx.git;
    let head_branch = &pr.head.ref_name;
    let base_branch = &pr.base.ref_name;

    git.clone_branch(clone_url, work_dir, head_branch).await?;
    git.fetch(work_dir, base_branch).await?;
    git.fetch_until_merge_base(work_dir, base_branch, ctx.config.timing.merge_base_timeout())
        .await?;

    let head = git.head(work_dir).await?;
    if head != pr.head.sha {
        return Ok(Outcome::Skipped(SkipReason::HeadMoved {
            expected: pr.head.sha.clone(),
            actual: head,
        }));
    }

    let onto = git.sha(work_dir, &remote_ref(base_branch)).await?;
    debug!(pr_number = pr.number, head = %head, onto = %onto, "rebasing");
    git.rebase(work_dir, &onto).await?;

    let rebased = git.head(work_dir).await?;
    if rebased == head {
        debug!(pr_number = pr.number, "already up to date");
        return Ok(Outcome::Done(head));
    }

    git.push(work_dir, true, head_branch).await?;
    info!(
        pr_number = pr.number,
        from = %head,
        to = %rebased,
        "rebased {head_branch} onto {base_branch}"
    );
    ctx.delay.wait(ctx.config.timing.settle_delay()).await;

    Ok(Outcome::Done(rebased))
}
