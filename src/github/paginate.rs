use std::num::NonZeroUsize;

use tracing::{debug, info, instrument, warn};

use super::link;
use super::{GithubError, PullRequest, PullRequestApi};

/// Fetch every pull request in the repository, following `link: rel="next"`
/// until the API stops advertising one.
///
/// Items are returned in the order the API served them. When `max_pages` is
/// set and the API still advertises a next page after that many requests,
/// returns `GithubError::PageLimitExceeded` instead of walking further.
#[instrument(skip(api))]
pub async fn fetch_all_pull_requests(
    api: &dyn PullRequestApi,
    max_pages: Option<NonZeroUsize>,
) -> Result<Vec<PullRequest>, GithubError> {
    info!("getting pull requests for repo");

    let mut pull_requests = Vec::new();
    let mut next_url = Some(api.first_page_url());
    let mut pages = 0usize;

    while let Some(url) = next_url.take() {
        if let Some(limit) = max_pages.map(NonZeroUsize::get) {
            if pages >= limit {
                return Err(GithubError::PageLimitExceeded { limit });
            }
        }

        let page = api.fetch_page(&url).await?;
        pages += 1;
        debug!(page = pages, items = page.items.len(), "fetched page");

        pull_requests.extend(page.items);
        next_url = page.link.as_deref().and_then(next_page_url);
    }

    info!(pages, pull_requests = pull_requests.len(), "fetched all pull requests");
    Ok(pull_requests)
}

/// Resolve the next page from a `link` header value.
/// A header that claims a next page but doesn't parse ends pagination.
fn next_page_url(header: &str) -> Option<String> {
    let next = link::next_link(header);
    if next.is_none() && link::claims_next(header) {
        warn!(link = %header, "unparseable next link; treating this page as the last");
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::fake::{page_url, pull_request, FakeApi, FIRST_PAGE};
    use crate::github::PullRequestState;
    use chrono::{TimeZone, Utc};

    fn prs(numbers: std::ops::Range<u64>) -> Vec<PullRequest> {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        numbers
            .map(|n| pull_request(n, PullRequestState::Open, created, None))
            .collect()
    }

    fn numbers(pull_requests: &[PullRequest]) -> Vec<u64> {
        pull_requests.iter().map(|pr| pr.number).collect()
    }

    #[tokio::test]
    async fn test_concatenates_pages_in_order() {
        let api = FakeApi::new().with_pages(vec![prs(1..101), prs(101..201), prs(201..238)]);
        let all = fetch_all_pull_requests(&api, None).await.unwrap();

        assert_eq!(all.len(), 237);
        assert_eq!(numbers(&all), (1..238).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_issues_exactly_one_request_per_page() {
        let api = FakeApi::new().with_pages(vec![prs(1..3), prs(3..5), prs(5..6)]);
        fetch_all_pull_requests(&api, None).await.unwrap();

        assert_eq!(api.requests(), vec![page_url(1), page_url(2), page_url(3)]);
    }

    #[tokio::test]
    async fn test_single_page_without_link_header() {
        let api = FakeApi::new().with_raw_page(FIRST_PAGE, prs(1..4), None);
        let all = fetch_all_pull_requests(&api, None).await.unwrap();

        assert_eq!(all.len(), 3);
        assert_eq!(api.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_repository() {
        let api = FakeApi::new().with_raw_page(FIRST_PAGE, vec![], None);
        let all = fetch_all_pull_requests(&api, None).await.unwrap();

        assert!(all.is_empty());
        assert_eq!(api.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_next_link_ends_pagination() {
        let api = FakeApi::new().with_raw_page(
            FIRST_PAGE,
            prs(1..3),
            Some("fake://pulls?page=2; rel=\"next\""),
        );
        let all = fetch_all_pull_requests(&api, None).await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(api.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_page_limit_stops_runaway_pagination() {
        // A server that always links back to itself
        let self_link = format!("<{FIRST_PAGE}>; rel=\"next\"");
        let api = FakeApi::new().with_raw_page(FIRST_PAGE, prs(1..2), Some(&self_link));
        let result = fetch_all_pull_requests(&api, NonZeroUsize::new(5)).await;

        assert!(matches!(result, Err(GithubError::PageLimitExceeded { limit: 5 })));
        assert_eq!(api.requests().len(), 5);
    }

    #[tokio::test]
    async fn test_page_limit_of_one_still_fetches_first_page() {
        let api = FakeApi::new().with_raw_page(FIRST_PAGE, prs(1..4), None);
        let all = fetch_all_pull_requests(&api, NonZeroUsize::new(1)).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(api.requests(), vec![FIRST_PAGE.to_string()]);
    }

    #[tokio::test]
    async fn test_page_limit_not_hit_when_pages_fit() {
        let api = FakeApi::new().with_pages(vec![prs(1..2), prs(2..3)]);
        let all = fetch_all_pull_requests(&api, NonZeroUsize::new(2)).await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
