//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    BranchMergeResult, BranchRef, IssueEvent, MergeableState, PlatformConfig, PrState,
    PullRequest, Review, ReviewComment, ReviewState,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use reqwest::header::{HeaderMap, LINK};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

/// Largest page GitHub serves
const MAX_PER_PAGE: u8 = 100;

// Raw REST response types for endpoints octocrab does not model the way we need

#[derive(Deserialize)]
struct RawPullMergeability {
    mergeable_state: Option<String>,
}

#[derive(Deserialize)]
struct RawLabel {
    name: String,
}

#[derive(Deserialize)]
struct RawIssueEvent {
    event: String,
    label: Option<RawLabel>,
    created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawReviewComment {
    id: u64,
}

#[derive(Deserialize)]
struct RawCommit {
    sha: String,
}

#[derive(Deserialize)]
struct RawErrorMessage {
    message: String,
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
    /// Token for raw HTTP requests and clone URLs
    token: String,
    /// HTTP client for raw requests
    http_client: Client,
    /// API base URL for raw requests, without trailing slash
    api_base: String,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let api_base = host.as_ref().map_or_else(
            || "https://api.github.com".to_string(),
            |h| format!("https://{h}/api/v3"),
        );
        Self::with_api_base(token, owner, repo, host, &api_base)
    }

    /// Create a service talking to an explicit API base URL
    pub fn with_api_base(
        token: &str,
        owner: String,
        repo: String,
        host: Option<String>,
        api_base: &str,
    ) -> Result<Self> {
        let api_base = api_base.trim_end_matches('/').to_string();

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(api_base.as_str())
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("autobase")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: PlatformConfig { owner, repo, host },
            token: token.to_string(),
            http_client,
            api_base,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!(
            "{}/repos/{}/{}/{}",
            self.api_base, self.config.owner, self.config.repo, path
        );
        self.request_url(method, &url)
    }

    fn request_url(&self, method: Method, url: &str) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    async fn send_get(&self, request: RequestBuilder, path: &str) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("GET {path} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::GitHubApi(format!(
                "GET {path} returned {}",
                response.status()
            )));
        }
        Ok(response)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send_get(self.request(Method::GET, path), path)
            .await?
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse {path}: {e}")))
    }

    /// GET a list endpoint, following `Link: rel="next"` until the last page
    async fn get_all_pages<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut response = self.send_get(self.request(Method::GET, path), path).await?;
        let mut pages = 1u32;

        loop {
            let next = next_page_url(response.headers());
            let mut page: Vec<T> = response
                .json()
                .await
                .map_err(|e| Error::GitHubApi(format!("Failed to parse {path}: {e}")))?;
            items.append(&mut page);

            let Some(next) = next else {
                break;
            };
            pages += 1;
            response = self
                .send_get(self.request_url(Method::GET, &next), path)
                .await?;
        }

        debug!(path, pages, count = items.len(), "fetched all pages");
        Ok(items)
    }
}

/// URL of the next page from a GitHub `Link` header
fn next_page_url(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;
    link.split(',').find_map(|part| {
        let (url, params) = part.split_once(';')?;
        params
            .split(';')
            .any(|p| p.trim() == r#"rel="next""#)
            .then(|| url.trim().trim_start_matches('<').trim_end_matches('>').to_string())
    })
}

/// Helper to convert octocrab PR to our `PullRequest` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    let repo_name = |repo: Option<&octocrab::models::Repository>| {
        repo.and_then(|r| r.full_name.clone()).unwrap_or_default()
    };

    PullRequest {
        number: pr.number,
        title: pr.title.clone().unwrap_or_default(),
        state: match pr.state {
            Some(octocrab::models::IssueState::Open) => PrState::Open,
            // IssueState is non-exhaustive, so use wildcard for Closed and any future variants
            Some(_) | None => PrState::Closed,
        },
        merged: pr.merged_at.is_some() || pr.merged.unwrap_or(false),
        head: BranchRef {
            repo_full_name: repo_name(pr.head.repo.as_ref()),
            ref_name: pr.head.ref_field.clone(),
            sha: pr.head.sha.clone(),
        },
        base: BranchRef {
            repo_full_name: repo_name(pr.base.repo.as_ref()),
            ref_name: pr.base.ref_field.clone(),
            sha: pr.base.sha.clone(),
        },
        labels: pr
            .labels
            .as_ref()
            .map(|labels| labels.iter().map(|l| l.name.clone()).collect())
            .unwrap_or_default(),
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
    }
}

fn review_state_from_octocrab(state: Option<octocrab::models::pulls::ReviewState>) -> ReviewState {
    use octocrab::models::pulls::ReviewState as Octo;
    match state {
        Some(Octo::Approved) => ReviewState::Approved,
        Some(Octo::ChangesRequested) => ReviewState::ChangesRequested,
        Some(Octo::Dismissed) => ReviewState::Dismissed,
        Some(Octo::Pending) => ReviewState::Pending,
        // Treat unknown verdicts like plain comments
        Some(_) | None => ReviewState::Commented,
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn list_open_pull_requests(&self, page_size: u8) -> Result<Vec<PullRequest>> {
        debug!(page_size, "listing open PRs");
        let page = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .state(octocrab::params::State::Open)
            .sort(octocrab::params::pulls::Sort::Updated)
            .direction(octocrab::params::Direction::Descending)
            .per_page(page_size.min(MAX_PER_PAGE))
            .send()
            .await?;

        let result: Vec<PullRequest> = page.items.iter().map(pr_from_octocrab).collect();
        debug!(count = result.len(), "listed open PRs");
        Ok(result)
    }

    async fn get_mergeable_state(&self, pr_number: u64) -> Result<MergeableState> {
        let raw: RawPullMergeability = self.get_json(&format!("pulls/{pr_number}")).await?;
        let state = raw
            .mergeable_state
            .as_deref()
            .map_or(MergeableState::Unknown, MergeableState::parse);
        debug!(pr_number, %state, "got mergeable state");
        Ok(state)
    }

    async fn merge_branch(&self, into: &str, from: &str) -> Result<BranchMergeResult> {
        debug!(into, from, "merging branch");
        let response = self
            .request(Method::POST, "merges")
            .json(&serde_json::json!({
                "base": into,
                "head": from,
                "commit_message": format!("Merge branch '{from}' into {into}"),
            }))
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Merge request failed: {e}")))?;

        match response.status() {
            StatusCode::NO_CONTENT => {
                debug!(into, from, "nothing to merge");
                Ok(BranchMergeResult::NoOp)
            }
            StatusCode::CREATED => {
                let commit: RawCommit = response
                    .json()
                    .await
                    .map_err(|e| Error::GitHubApi(format!("Failed to parse merge commit: {e}")))?;
                debug!(into, from, sha = %commit.sha, "merged branch");
                Ok(BranchMergeResult::Merged { sha: commit.sha })
            }
            status => {
                let message = response
                    .json::<RawErrorMessage>()
                    .await
                    .map(|m| m.message)
                    .unwrap_or_default();
                Err(Error::GitHubApi(format!(
                    "Merging '{from}' into '{into}' returned {status}: {message}"
                )))
            }
        }
    }

    async fn replace_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        debug!(pr_number, ?labels, "replacing labels");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .replace_all_labels(pr_number, labels)
            .await?;
        Ok(())
    }

    async fn create_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        debug!(pr_number, "creating PR comment");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .create_comment(pr_number, body)
            .await?;
        debug!(pr_number, "created PR comment");
        Ok(())
    }

    async fn list_reviews(&self, pr_number: u64) -> Result<Vec<Review>> {
        debug!(pr_number, "listing reviews");
        let page = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list_reviews(pr_number)
            .per_page(MAX_PER_PAGE)
            .send()
            .await?;
        let all = self.client.all_pages(page).await?;

        let reviews: Vec<Review> = all
            .into_iter()
            .map(|r| Review {
                id: r.id.0,
                state: review_state_from_octocrab(r.state),
                submitted_at: r.submitted_at,
            })
            .collect();
        debug!(pr_number, count = reviews.len(), "listed reviews");
        Ok(reviews)
    }

    async fn list_issue_events(&self, pr_number: u64) -> Result<Vec<IssueEvent>> {
        let raw: Vec<RawIssueEvent> = self
            .get_all_pages(&format!("issues/{pr_number}/events?per_page={MAX_PER_PAGE}"))
            .await?;
        debug!(pr_number, count = raw.len(), "listed issue events");
        Ok(raw
            .into_iter()
            .map(|e| IssueEvent {
                event: e.event,
                label: e.label.map(|l| l.name),
                created_at: e.created_at,
            })
            .collect())
    }

    async fn list_review_comments(
        &self,
        pr_number: u64,
        review_id: u64,
    ) -> Result<Vec<ReviewComment>> {
        let raw: Vec<RawReviewComment> = self
            .get_all_pages(&format!(
                "pulls/{pr_number}/reviews/{review_id}/comments?per_page={MAX_PER_PAGE}"
            ))
            .await?;
        debug!(pr_number, review_id, count = raw.len(), "listed review comments");
        Ok(raw
            .into_iter()
            .map(|c| ReviewComment { id: c.id })
            .collect())
    }

    fn clone_url(&self, repo_full_name: &str) -> String {
        let host = self.config.host.as_deref().unwrap_or("github.com");
        format!(
            "https://x-access-token:{}@{host}/{repo_full_name}.git",
            self.token
        )
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
