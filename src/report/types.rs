use crate::stats::PullRequestStats;

/// Final summary of one run over a repository.
#[derive(Debug, Clone)]
pub struct Summary {
    /// Repository owner or organization
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Number of pull requests fetched
    pub total: usize,
    /// Counters from the aggregation pass
    pub stats: PullRequestStats,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
