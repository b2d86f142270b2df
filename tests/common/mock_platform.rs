//! Mock platform service for testing

#![allow(dead_code)]

use async_trait::async_trait;
use autobase::error::{Error, Result};
use autobase::platform::PlatformService;
use autobase::types::{
    BranchMergeResult, IssueEvent, MergeableState, PlatformConfig, PullRequest, Review,
    ReviewComment,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Call record for `merge_branch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeBranchCall {
    pub into: String,
    pub from: String,
}

/// Call record for `replace_labels`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceLabelsCall {
    pub pr_number: u64,
    pub labels: Vec<String>,
}

/// Call record for `create_comment`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommentCall {
    pub pr_number: u64,
    pub body: String,
}

/// Simple mock platform service for testing
///
/// Features:
/// - Configurable responses per PR / review / branch
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    clone_url: Mutex<Option<String>>,
    open_prs: Mutex<Vec<PullRequest>>,
    // Responses; mergeable states are consumed in order, the last one repeats
    mergeable_states: Mutex<HashMap<u64, VecDeque<MergeableState>>>,
    merge_responses: Mutex<HashMap<String, BranchMergeResult>>,
    reviews: Mutex<HashMap<u64, Vec<Review>>>,
    events: Mutex<HashMap<u64, Vec<IssueEvent>>>,
    review_comments: Mutex<HashMap<u64, Vec<ReviewComment>>>,
    // Call tracking
    list_prs_calls: Mutex<usize>,
    mergeable_state_calls: Mutex<Vec<u64>>,
    merge_branch_calls: Mutex<Vec<MergeBranchCall>>,
    replace_labels_calls: Mutex<Vec<ReplaceLabelsCall>>,
    create_comment_calls: Mutex<Vec<CreateCommentCall>>,
    list_reviews_calls: Mutex<Vec<u64>>,
    list_events_calls: Mutex<Vec<u64>>,
    list_review_comments_calls: Mutex<Vec<u64>>,
    // Error injection
    error_on_list_prs: Mutex<Option<String>>,
    error_on_merge_branch: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            clone_url: Mutex::new(None),
            open_prs: Mutex::new(Vec::new()),
            mergeable_states: Mutex::new(HashMap::new()),
            merge_responses: Mutex::new(HashMap::new()),
            reviews: Mutex::new(HashMap::new()),
            events: Mutex::new(HashMap::new()),
            review_comments: Mutex::new(HashMap::new()),
            list_prs_calls: Mutex::new(0),
            mergeable_state_calls: Mutex::new(Vec::new()),
            merge_branch_calls: Mutex::new(Vec::new()),
            replace_labels_calls: Mutex::new(Vec::new()),
            create_comment_calls: Mutex::new(Vec::new()),
            list_reviews_calls: Mutex::new(Vec::new()),
            list_events_calls: Mutex::new(Vec::new()),
            list_review_comments_calls: Mutex::new(Vec::new()),
            error_on_list_prs: Mutex::new(None),
            error_on_merge_branch: Mutex::new(None),
        }
    }

    // === Error injection methods ===

    /// Make `list_open_pull_requests` return an error
    pub fn fail_list_prs(&self, msg: &str) {
        *self.error_on_list_prs.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `merge_branch` return an error
    pub fn fail_merge_branch(&self, msg: &str) {
        *self.error_on_merge_branch.lock().unwrap() = Some(msg.to_string());
    }

    // === Response setup ===

    /// Override the URL returned by `clone_url`
    pub fn set_clone_url(&self, url: &str) {
        *self.clone_url.lock().unwrap() = Some(url.to_string());
    }

    /// Set the PRs returned by `list_open_pull_requests`
    pub fn set_open_prs(&self, prs: Vec<PullRequest>) {
        *self.open_prs.lock().unwrap() = prs;
    }

    /// Set the sequence of mergeable states reported for a PR
    pub fn set_mergeable_states(&self, pr_number: u64, states: &[MergeableState]) {
        self.mergeable_states
            .lock()
            .unwrap()
            .insert(pr_number, states.iter().copied().collect());
    }

    /// Set the result of merging into `into`
    pub fn set_merge_response(&self, into: &str, result: BranchMergeResult) {
        self.merge_responses
            .lock()
            .unwrap()
            .insert(into.to_string(), result);
    }

    /// Set the reviews of a PR (oldest first)
    pub fn set_reviews(&self, pr_number: u64, reviews: Vec<Review>) {
        self.reviews.lock().unwrap().insert(pr_number, reviews);
    }

    /// Set the issue events of a PR (oldest first)
    pub fn set_events(&self, pr_number: u64, events: Vec<IssueEvent>) {
        self.events.lock().unwrap().insert(pr_number, events);
    }

    /// Set the comments attached to a review
    pub fn set_review_comments(&self, review_id: u64, comments: Vec<ReviewComment>) {
        self.review_comments
            .lock()
            .unwrap()
            .insert(review_id, comments);
    }

    // === Call verification methods ===

    pub fn list_prs_call_count(&self) -> usize {
        *self.list_prs_calls.lock().unwrap()
    }

    pub fn get_mergeable_state_calls(&self) -> Vec<u64> {
        self.mergeable_state_calls.lock().unwrap().clone()
    }

    pub fn get_merge_branch_calls(&self) -> Vec<MergeBranchCall> {
        self.merge_branch_calls.lock().unwrap().clone()
    }

    pub fn get_replace_labels_calls(&self) -> Vec<ReplaceLabelsCall> {
        self.replace_labels_calls.lock().unwrap().clone()
    }

    pub fn get_create_comment_calls(&self) -> Vec<CreateCommentCall> {
        self.create_comment_calls.lock().unwrap().clone()
    }

    pub fn get_list_reviews_calls(&self) -> Vec<u64> {
        self.list_reviews_calls.lock().unwrap().clone()
    }

    pub fn get_list_events_calls(&self) -> Vec<u64> {
        self.list_events_calls.lock().unwrap().clone()
    }

    /// Review IDs whose comments were requested
    pub fn get_list_review_comments_calls(&self) -> Vec<u64> {
        self.list_review_comments_calls.lock().unwrap().clone()
    }

    /// Whether any call changed state on the platform
    pub fn has_mutations(&self) -> bool {
        !self.merge_branch_calls.lock().unwrap().is_empty()
            || !self.replace_labels_calls.lock().unwrap().is_empty()
            || !self.create_comment_calls.lock().unwrap().is_empty()
    }

    /// Whether any review or timeline data was requested
    pub fn inspected_reviews(&self) -> bool {
        !self.list_reviews_calls.lock().unwrap().is_empty()
            || !self.list_events_calls.lock().unwrap().is_empty()
    }

    /// Assert that `merge_branch` was NOT called
    pub fn assert_merge_not_called(&self) {
        let calls = self.get_merge_branch_calls();
        assert!(
            calls.is_empty(),
            "Expected merge_branch NOT to be called but it was: {calls:?}"
        );
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn list_open_pull_requests(&self, _page_size: u8) -> Result<Vec<PullRequest>> {
        *self.list_prs_calls.lock().unwrap() += 1;

        if let Some(msg) = self.error_on_list_prs.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        Ok(self.open_prs.lock().unwrap().clone())
    }

    async fn get_mergeable_state(&self, pr_number: u64) -> Result<MergeableState> {
        self.mergeable_state_calls.lock().unwrap().push(pr_number);

        let mut states = self.mergeable_states.lock().unwrap();
        let queue = states.get_mut(&pr_number).ok_or_else(|| {
            Error::GitHubApi(format!(
                "get_mergeable_state: no response configured for PR #{pr_number}"
            ))
        })?;

        let state = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().copied()
        };
        Ok(state.unwrap_or(MergeableState::Unknown))
    }

    async fn merge_branch(&self, into: &str, from: &str) -> Result<BranchMergeResult> {
        self.merge_branch_calls.lock().unwrap().push(MergeBranchCall {
            into: into.to_string(),
            from: from.to_string(),
        });

        if let Some(msg) = self.error_on_merge_branch.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let responses = self.merge_responses.lock().unwrap();
        responses.get(into).cloned().ok_or_else(|| {
            Error::GitHubApi(format!("merge_branch: no response configured for {into}"))
        })
    }

    async fn replace_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        self.replace_labels_calls
            .lock()
            .unwrap()
            .push(ReplaceLabelsCall {
                pr_number,
                labels: labels.to_vec(),
            });
        Ok(())
    }

    async fn create_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        self.create_comment_calls
            .lock()
            .unwrap()
            .push(CreateCommentCall {
                pr_number,
                body: body.to_string(),
            });
        Ok(())
    }

    async fn list_reviews(&self, pr_number: u64) -> Result<Vec<Review>> {
        self.list_reviews_calls.lock().unwrap().push(pr_number);
        let reviews = self.reviews.lock().unwrap();
        Ok(reviews.get(&pr_number).cloned().unwrap_or_default())
    }

    async fn list_issue_events(&self, pr_number: u64) -> Result<Vec<IssueEvent>> {
        self.list_events_calls.lock().unwrap().push(pr_number);
        let events = self.events.lock().unwrap();
        Ok(events.get(&pr_number).cloned().unwrap_or_default())
    }

    async fn list_review_comments(
        &self,
        _pr_number: u64,
        review_id: u64,
    ) -> Result<Vec<ReviewComment>> {
        self.list_review_comments_calls
            .lock()
            .unwrap()
            .push(review_id);
        let comments = self.review_comments.lock().unwrap();
        Ok(comments.get(&review_id).cloned().unwrap_or_default())
    }

    fn clone_url(&self, repo_full_name: &str) -> String {
        self.clone_url
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| format!("https://example.invalid/{repo_full_name}.git"))
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
