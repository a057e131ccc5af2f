use chrono::{DateTime, Duration, NaiveTime, Utc};
use tracing::{debug, info, instrument};

use crate::config::{ConfigError, ThresholdConfig};
use crate::github::{GithubError, PullRequest, PullRequestApi, PullRequestState};

/// The seven counters produced by one aggregation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullRequestStats {
    pub total_opened: usize,
    pub total_closed: usize,
    pub opened_in_past_week: usize,
    pub closed_in_past_week: usize,
    /// Open pull requests older than the stuck threshold
    pub stuck_in_review: usize,
    /// Pull requests touching at least the complex-files threshold
    pub complex_changes: usize,
    pub minimal_changes: usize,
}

/// Time boundaries for one run, fixed at the moment the pass starts.
#[derive(Debug, Clone, Copy)]
pub struct Window {
    now: DateTime<Utc>,
    /// Start of the UTC day `recent_days` ago; inclusive
    recent_start: DateTime<Utc>,
    /// Open pull requests created strictly before this are stuck
    stuck_before: DateTime<Utc>,
}

impl Window {
    /// Fails on out-of-range thresholds instead of overflowing the date math.
    pub fn new(now: DateTime<Utc>, thresholds: &ThresholdConfig) -> Result<Self, ConfigError> {
        thresholds.validate()?;
        let recent_start = (now - Duration::days(thresholds.recent_days))
            .date_naive()
            .and_time(NaiveTime::MIN)
            .and_utc();
        Ok(Self {
            now,
            recent_start,
            stuck_before: now - Duration::days(thresholds.stuck_days),
        })
    }

    /// Inclusive at both ends.
    pub fn is_recent(&self, at: DateTime<Utc>) -> bool {
        at >= self.recent_start && at <= self.now
    }

    pub fn is_stuck(&self, created_at: DateTime<Utc>) -> bool {
        created_at < self.stuck_before
    }
}

impl PullRequestStats {
    /// Count one pull request by state and dates. Unknown states are ignored.
    pub fn record_state(&mut self, pr: &PullRequest, window: &Window) {
        match pr.state {
            PullRequestState::Open => {
                self.total_opened += 1;
                if window.is_recent(pr.created_at) {
                    self.opened_in_past_week += 1;
                }
                if window.is_stuck(pr.created_at) {
                    self.stuck_in_review += 1;
                }
            }
            PullRequestState::Closed => {
                self.total_closed += 1;
                if pr.closed_at.is_some_and(|closed_at| window.is_recent(closed_at)) {
                    self.closed_in_past_week += 1;
                }
            }
            PullRequestState::Other => {}
        }
    }

    /// Classify one pull request by how many files it changed.
    pub fn record_change_size(&mut self, changed_files: usize, complex_files: usize) {
        if changed_files >= complex_files {
            self.complex_changes += 1;
        } else {
            self.minimal_changes += 1;
        }
    }
}

/// Walk every pull request once, in order, fetching its changed files.
///
/// Requests are issued one at a time. The first failed fetch aborts the pass
/// and no partial counters are returned.
#[instrument(skip_all, fields(pull_requests = pull_requests.len()))]
pub async fn aggregate(
    pull_requests: &[PullRequest],
    api: &dyn PullRequestApi,
    window: &Window,
    complex_files: usize,
) -> Result<PullRequestStats, GithubError> {
    info!("going to parse through pull request data");

    let mut stats = PullRequestStats::default();
    for pr in pull_requests {
        stats.record_state(pr, window);

        let files = api.list_changed_files(pr.number).await?;
        debug!(pr = pr.number, title = %pr.title, state = ?pr.state, files = files.len(), "classified pull request");
        stats.record_change_size(files.len(), complex_files);
    }

    Ok(stats)
}
