//! Shared fixtures for autobase tests

#![allow(dead_code)]

mod mock_git;
mod mock_platform;

pub use mock_git::{MockGit, RecordingDelay};
pub use mock_platform::{
    CreateCommentCall, MergeBranchCall, MockPlatformService, ReplaceLabelsCall,
};

use autobase::config::Config;
use autobase::types::{
    BranchRef, IssueEvent, PlatformConfig, PrState, PullRequest, Review, ReviewComment,
    ReviewState,
};
use chrono::{DateTime, TimeZone, Utc};

pub const REPO: &str = "acme/widgets";

pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        owner: "acme".to_string(),
        repo: "widgets".to_string(),
        host: None,
    }
}

/// Default config for `acme/widgets` with a blocking label
pub fn test_config() -> Config {
    let mut config = Config {
        repository: REPO.to_string(),
        ..Config::default()
    };
    config.labels.blocking = vec!["blocking-label".to_string()];
    config
}

pub fn mock_platform() -> MockPlatformService {
    MockPlatformService::with_config(github_config())
}

/// Open, same-repo PR from `feature-<number>` into `main`
pub fn make_pr(number: u64, labels: &[&str]) -> PullRequest {
    PullRequest {
        number,
        title: format!("PR {number}"),
        state: PrState::Open,
        merged: false,
        head: BranchRef {
            repo_full_name: REPO.to_string(),
            ref_name: format!("feature-{number}"),
            sha: format!("head_sha_{number}"),
        },
        base: BranchRef {
            repo_full_name: REPO.to_string(),
            ref_name: "main".to_string(),
            sha: "base_sha".to_string(),
        },
        labels: labels.iter().map(ToString::to_string).collect(),
        html_url: format!("https://github.com/{REPO}/pull/{number}"),
    }
}

/// Fixed timestamp `minute` minutes into the test day
pub fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap()
}

pub fn labeled(label: &str, minute: u32) -> IssueEvent {
    IssueEvent {
        event: "labeled".to_string(),
        label: Some(label.to_string()),
        created_at: at(minute),
    }
}

pub fn review(id: u64, state: ReviewState, minute: u32) -> Review {
    Review {
        id,
        state,
        submitted_at: Some(at(minute)),
    }
}

pub fn comment(id: u64) -> ReviewComment {
    ReviewComment { id }
}
