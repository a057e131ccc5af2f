pub mod link;
pub mod paginate;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use types::{ChangedFile, Page, PullRequest, PullRequestState, RepoTarget};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, LINK, USER_AGENT};
use thiserror::Error;
use tracing::{debug, instrument};

/// Items requested per page, the maximum the API allows.
pub const PAGE_SIZE: usize = 100;

const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub API request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),

    #[error("Invalid GitHub API URL: {0}")]
    InvalidApiUrl(String),

    #[error("Invalid repository (expected owner/repo or a GitHub URL): {0}")]
    InvalidRepository(String),

    #[error("Pagination stopped after {limit} pages; more pages were advertised")]
    PageLimitExceeded { limit: usize },
}

/// The two GitHub endpoints this tool talks to.
/// Implementations must be Send + Sync so they can be shared across awaits.
#[async_trait]
pub trait PullRequestApi: Send + Sync {
    /// URL of the first page of the pull request listing.
    fn first_page_url(&self) -> String;

    /// Fetch one page of pull requests from an absolute URL.
    async fn fetch_page(&self, url: &str) -> Result<Page, GithubError>;

    /// Fetch the changed-file records for a single pull request.
    async fn list_changed_files(&self, number: u64) -> Result<Vec<ChangedFile>, GithubError>;
}

/// Parse a repository reference into `(owner, repo)`.
///
/// Accepts either `owner/repo` or a URL such as
/// `https://github.com/owner/repo` (a trailing `.git` is stripped).
pub fn parse_repo_slug(input: &str) -> Result<(String, String), GithubError> {
    let invalid = || GithubError::InvalidRepository(input.to_string());

    let segments: Vec<String> = if input.contains("://") {
        let parsed = reqwest::Url::parse(input).map_err(|_| invalid())?;
        if parsed.host_str() != Some("github.com") {
            return Err(invalid());
        }
        parsed
            .path_segments()
            .ok_or_else(invalid)?
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        input
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect()
    };

    if segments.len() != 2 {
        return Err(invalid());
    }

    let owner = segments[0].clone();
    let repo = segments[1].trim_end_matches(".git").to_string();
    if repo.is_empty() {
        return Err(invalid());
    }

    Ok((owner, repo))
}

/// reqwest-backed client for the GitHub REST API.
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    owner: String,
    repo: String,
    token: String,
}

impl GitHubClient {
    pub fn new(target: &RepoTarget) -> Result<Self, GithubError> {
        reqwest::Url::parse(&target.api_url)
            .map_err(|_| GithubError::InvalidApiUrl(target.api_url.clone()))?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("pr-stats"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            api_url: target.api_url.trim_end_matches('/').to_string(),
            owner: target.owner.clone(),
            repo: target.repo.clone(),
            token: target.token.clone(),
        })
    }

    fn repo_url(&self) -> String {
        format!("{}/repos/{}/{}", self.api_url, self.owner, self.repo)
    }
}

#[async_trait]
impl PullRequestApi for GitHubClient {
    fn first_page_url(&self) -> String {
        format!("{}/pulls?state=all&per_page={}", self.repo_url(), PAGE_SIZE)
    }

    #[instrument(skip(self))]
    async fn fetch_page(&self, url: &str) -> Result<Page, GithubError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?;

        let link = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let items = response.json::<Vec<PullRequest>>().await?;
        debug!(items = items.len(), has_link = link.is_some(), "received page");

        Ok(Page { items, link })
    }

    #[instrument(skip(self))]
    async fn list_changed_files(&self, number: u64) -> Result<Vec<ChangedFile>, GithubError> {
        let url = format!("{}/pulls/{}/files?per_page={}", self.repo_url(), number, PAGE_SIZE);
        let files = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<ChangedFile>>()
            .await?;
        debug!(files = files.len(), "received changed files");
        Ok(files)
    }
}
