//! Orchestrator - run the decision engine over every open pull request

use super::{Outcome, SkipReason, UpdateContext, check_label_gates, update};
use crate::error::Result;
use tracing::{debug, error, info};

/// What happened during one pass
#[derive(Debug, Clone, Default)]
pub struct PassSummary {
    /// PRs that were processed, with their resulting head SHA
    pub updated: Vec<(u64, String)>,
    /// PRs that were left alone, with the reason
    pub skipped: Vec<(u64, SkipReason)>,
    /// PRs whose processing failed, with the error message
    pub failed: Vec<(u64, String)>,
}

impl PassSummary {
    /// Check that no PR failed
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of PRs seen in the pass
    #[must_use]
    pub const fn total(&self) -> usize {
        self.updated.len() + self.skipped.len() + self.failed.len()
    }
}

/// Process all open PRs once, strictly one after another.
///
/// A failing PR is logged and recorded; it never stops the pass. Only a
/// failure to list PRs is returned as an error.
pub async fn run_pass(ctx: &UpdateContext<'_>) -> Result<PassSummary> {
    let prs = ctx
        .platform
        .list_open_pull_requests(ctx.config.timing.page_size)
        .await?;
    info!(
        repo = %ctx.platform.config().full_name(),
        count = prs.len(),
        "processing open PRs"
    );

    let mut summary = PassSummary::default();

    for pr in &prs {
        let outcome = match check_label_gates(pr, &ctx.config.labels) {
            Some(reason) => Ok(Outcome::Skipped(reason)),
            None => update(ctx, pr).await,
        };

        match outcome {
            Ok(Outcome::Done(sha)) => {
                info!(pr_number = pr.number, sha = %sha, "PR up to date");
                summary.updated.push((pr.number, sha));
            }
            Ok(Outcome::Skipped(reason)) => {
                if reason == SkipReason::NoAction {
                    debug!(pr_number = pr.number, %reason, "skipping PR");
                } else {
                    info!(pr_number = pr.number, %reason, "skipping PR");
                }
                summary.skipped.push((pr.number, reason));
            }
            Err(e) => {
                error!(pr_number = pr.number, error = %e, "failed to update PR");
                summary.failed.push((pr.number, e.to_string()));
            }
        }
    }

    Ok(summary)
}
