//! Action resolution - pure functions over a PR's label set

use super::SkipReason;
use crate::config::LabelConfig;
use crate::error::{Error, Result};
use crate::types::PullRequest;

/// What the engine should do with a pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Merge the base branch into the head branch on the platform
    Merge,
    /// Rebase the head branch onto the base branch locally and force-push
    Rebase,
    /// No action label present
    None,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merge => write!(f, "merge"),
            Self::Rebase => write!(f, "rebase"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Resolved action plus the validation bypass flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Action to take
    pub action: Action,
    /// Whether the skip-validation marker label is present
    pub skip_validation: bool,
}

/// Derive the single applicable action from the PR's labels.
///
/// More than one action label is an error, never a choice.
pub fn resolve_action(pr: &PullRequest, labels: &LabelConfig) -> Result<Resolution> {
    let mut found: Vec<(&str, Action)> = Vec::new();

    for label in &pr.labels {
        if *label == labels.merge {
            found.push((label.as_str(), Action::Merge));
        } else if *label == labels.rebase {
            found.push((label.as_str(), Action::Rebase));
        }
    }

    if found.len() > 1 {
        return Err(Error::AmbiguousAction {
            pr_number: pr.number,
            labels: found.into_iter().map(|(l, _)| l.to_string()).collect(),
        });
    }

    let action = found.first().map_or(Action::None, |(_, a)| *a);
    let skip_validation =
        !labels.skip_validation.is_empty() && pr.has_label(&labels.skip_validation);

    Ok(Resolution {
        action,
        skip_validation,
    })
}

/// Check blocking and required labels.
///
/// Returns the reason to skip, or `None` when the PR may be processed.
pub fn check_label_gates(pr: &PullRequest, labels: &LabelConfig) -> Option<SkipReason> {
    if let Some(blocking) = labels.blocking.iter().find(|l| pr.has_label(l.as_str())) {
        return Some(SkipReason::BlockingLabel(blocking.clone()));
    }

    labels
        .required
        .iter()
        .find(|l| !pr.has_label(l.as_str()))
        .map(|l| SkipReason::MissingRequiredLabel(l.clone()))
}
