//! In-memory `PullRequestApi` for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{ChangedFile, GithubError, Page, PullRequest, PullRequestApi, PullRequestState};

pub const FIRST_PAGE: &str = "fake://pulls?page=1";

/// Serves canned pages keyed by URL and a changed-file count per PR number.
/// Records every request so tests can assert on call counts and order.
#[derive(Default)]
pub struct FakeApi {
    pages: HashMap<String, Page>,
    file_counts: HashMap<u64, usize>,
    failing_files: HashSet<u64>,
    requests: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `pages` in sequence starting at `FIRST_PAGE`, linking each to the next.
    pub fn with_pages(mut self, pages: Vec<Vec<PullRequest>>) -> Self {
        let count = pages.len();
        for (index, items) in pages.into_iter().enumerate() {
            let link = (index + 1 < count).then(|| {
                format!(
                    "<{}>; rel=\"next\", <{}>; rel=\"last\"",
                    page_url(index + 2),
                    page_url(count)
                )
            });
            self.pages.insert(page_url(index + 1), Page { items, link });
        }
        self
    }

    /// Serve a single page under `url` with a raw link header.
    pub fn with_raw_page(mut self, url: &str, items: Vec<PullRequest>, link: Option<&str>) -> Self {
        self.pages.insert(
            url.to_string(),
            Page {
                items,
                link: link.map(str::to_string),
            },
        );
        self
    }

    pub fn with_files(mut self, number: u64, count: usize) -> Self {
        self.file_counts.insert(number, count);
        self
    }

    /// Make the changed-files request for `number` fail with a transport error.
    pub fn with_failing_files(mut self, number: u64) -> Self {
        self.failing_files.insert(number);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }
}

pub fn page_url(page: usize) -> String {
    format!("fake://pulls?page={page}")
}

#[async_trait]
impl PullRequestApi for FakeApi {
    fn first_page_url(&self) -> String {
        FIRST_PAGE.to_string()
    }

    async fn fetch_page(&self, url: &str) -> Result<Page, GithubError> {
        self.record(url.to_string());
        Ok(self.pages.get(url).cloned().unwrap_or_default())
    }

    async fn list_changed_files(&self, number: u64) -> Result<Vec<ChangedFile>, GithubError> {
        self.record(format!("files/{number}"));
        if self.failing_files.contains(&number) {
            return Err(request_error());
        }
        let count = self.file_counts.get(&number).copied().unwrap_or(0);
        Ok((0..count)
            .map(|i| ChangedFile {
                filename: format!("src/file_{i}.rs"),
                status: "modified".to_string(),
                additions: 1,
                deletions: 0,
            })
            .collect())
    }
}

/// A genuine reqwest error, built from a request that can't be constructed.
fn request_error() -> GithubError {
    reqwest::Client::new()
        .get("not a url")
        .build()
        .unwrap_err()
        .into()
}

/// Helper to create a pull request with the given state and timestamps.
pub fn pull_request(
    number: u64,
    state: PullRequestState,
    created_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
) -> PullRequest {
    PullRequest {
        number,
        state,
        title: format!("PR {number}"),
        created_at,
        closed_at,
    }
}
