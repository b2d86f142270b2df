//! Merge executor - update a PR branch through the platform's merge API

use super::{Outcome, SkipReason, UpdateContext};
use crate::error::Result;
use crate::types::{BranchMergeResult, MergeableState, PullRequest};
use tracing::{debug, info};

/// Fetch the mergeable state, polling while GitHub is still computing it
async fn settled_mergeable_state(
    ctx: &UpdateContext<'_>,
    pr_number: u64,
) -> Result<MergeableState> {
    let timing = &ctx.config.timing;
    let mut state = ctx.platform.get_mergeable_state(pr_number).await?;

    for attempt in 1..=timing.mergeable_poll_attempts {
        if state != MergeableState::Unknown {
            break;
        }
        debug!(pr_number, attempt, "mergeable state unknown, polling again");
        ctx.delay.wait(timing.mergeable_poll_interval()).await;
        state = ctx.platform.get_mergeable_state(pr_number).await?;
    }

    Ok(state)
}

/// Bring the PR's head branch up to date by merging its base into it.
///
/// Returns the resulting head SHA. Waits the settle delay only when a merge
/// commit was actually created.
pub async fn merge(ctx: &UpdateContext<'_>, pr: &PullRequest) -> Result<Outcome<String>> {
    let state = settled_mergeable_state(ctx, pr.number).await?;
    debug!(pr_number = pr.number, %state, "checking mergeable state");

    match state {
        MergeableState::Behind => {
            match ctx
                .platform
                .merge_branch(&pr.head.ref_name, &pr.base.ref_name)
                .await?
            {
                BranchMergeResult::NoOp => Ok(Outcome::Done(pr.head.sha.clone())),
                BranchMergeResult::Merged { sha } => {
                    info!(
                        pr_number = pr.number,
                        sha = %sha,
                        "merged {} into {}",
                        pr.base.ref_name,
                        pr.head.ref_name
                    );
                    ctx.delay.wait(ctx.config.timing.settle_delay()).await;
                    Ok(Outcome::Done(sha))
                }
            }
        }
        MergeableState::Clean | MergeableState::HasHooks => Ok(Outcome::Done(pr.head.sha.clone())),
        other => Ok(Outcome::Skipped(SkipReason::NotMergeable(other))),
    }
}
