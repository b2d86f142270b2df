//! Review stability validation
//!
//! An action label is a request made against a particular review state. If
//! reviewers complained after the label was applied, the request is stale.

use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::{IssueEvent, PullRequest, ReviewState};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Whether the review state held since the action label was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stability {
    /// Nothing destabilizing happened after labeling
    Stable,
    /// A review after labeling needs attention
    Unstable,
}

/// Time the most recent action label was applied, if any
fn last_labeled_at(events: &[IssueEvent], action_labels: &[&str]) -> Option<DateTime<Utc>> {
    events
        .iter()
        .rev()
        .find(|e| {
            e.event == "labeled"
                && e
                    .label
                    .as_deref()
                    .is_some_and(|l| action_labels.contains(&l))
        })
        .map(|e| e.created_at)
}

/// Decide whether reviews submitted after the action label was applied
/// leave the PR safe to update.
///
/// Reviews are walked newest first and the walk stops at the first review
/// submitted before the label. Approvals and change requests only count
/// when they carry comments; any other submitted review always counts.
pub async fn check_review_stability(
    platform: &dyn PlatformService,
    pr: &PullRequest,
    action_labels: &[&str],
) -> Result<Stability> {
    let events = platform.list_issue_events(pr.number).await?;
    let reviews = platform.list_reviews(pr.number).await?;

    let Some(labeled_at) = last_labeled_at(&events, action_labels) else {
        debug!(pr_number = pr.number, "no labeled event, nothing can postdate it");
        return Ok(Stability::Stable);
    };

    for review in reviews.iter().rev() {
        // Pending reviews are invisible to everyone but their author
        let Some(submitted_at) = review.submitted_at else {
            continue;
        };
        if submitted_at < labeled_at {
            break;
        }

        let destabilizing = match review.state {
            ReviewState::Approved | ReviewState::ChangesRequested => !platform
                .list_review_comments(pr.number, review.id)
                .await?
                .is_empty(),
            ReviewState::Commented | ReviewState::Dismissed | ReviewState::Pending => true,
        };

        if destabilizing {
            info!(
                pr_number = pr.number,
                review_id = review.id,
                state = %review.state,
                "review after labeling destabilizes PR"
            );
            return Ok(Stability::Unstable);
        }
    }

    Ok(Stability::Stable)
}
