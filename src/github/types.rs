use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Lifecycle state of a pull request as reported by the GitHub API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestState {
    Open,
    Closed,
    /// Any state string the API may add later. Counted by neither branch.
    #[serde(other)]
    Other,
}

/// A pull request record from `GET /repos/{owner}/{repo}/pulls`.
/// Only the fields the aggregation reads are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    /// PR number, unique within the repository
    pub number: u64,
    pub state: PullRequestState,
    #[serde(default)]
    pub title: String,
    pub created_at: DateTime<Utc>,
    /// Present only once the PR has been closed
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

/// A single file record from `GET /repos/{owner}/{repo}/pulls/{number}/files`.
#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)] // Only the count of records is consumed today
pub struct ChangedFile {
    pub filename: String,
    /// added, removed, modified, renamed, ...
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub additions: usize,
    #[serde(default)]
    pub deletions: usize,
}

/// One page of the pull request listing.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<PullRequest>,
    /// Raw value of the `link` response header, if any
    pub link: Option<String>,
}

/// A fully validated repository to query, with the credential to query it.
#[derive(Debug, Clone)]
pub struct RepoTarget {
    pub owner: String,
    pub repo: String,
    pub token: String,
    pub api_url: String,
}
