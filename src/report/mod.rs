pub mod types;

pub use types::Summary;

use crate::github::RepoTarget;
use crate::stats::PullRequestStats;
use colored::Colorize;
use tracing::{info, instrument};

/// Build a Summary from the aggregation result and repository metadata.
pub fn build(target: &RepoTarget, total: usize, stats: PullRequestStats) -> Summary {
    Summary {
        owner: target.owner.clone(),
        repo: target.repo.clone(),
        total,
        stats,
    }
}

/// Print the summary to stdout and log the same lines.
///
/// An empty repository yields a single "no pull requests found" line.
#[instrument(skip(summary), fields(owner = %summary.owner, repo = %summary.repo, total = summary.total))]
pub fn output(summary: &Summary) {
    let lines = summary_lines(summary);
    for line in &lines {
        info!("{line}");
    }
    print_terminal_report(summary, &lines);
}

/// Plain-text summary sentences, one per line.
pub fn summary_lines(summary: &Summary) -> Vec<String> {
    if summary.is_empty() {
        return vec![format!(
            "No pull requests found for {}/{}",
            summary.owner, summary.repo
        )];
    }

    let stats = &summary.stats;
    vec![
        format!(
            "There are {} open and {} closed pull requests in the {} repo",
            stats.total_opened, stats.total_closed, summary.repo
        ),
        format!(
            "There were {} pull requests opened and {} pull requests closed in the past week.",
            stats.opened_in_past_week, stats.closed_in_past_week
        ),
        format!(
            "There are {} pull requests that are stuck in review for a long time - i.e. in an open state for greater than 2 weeks.",
            stats.stuck_in_review
        ),
        format!(
            "From all pull requests created, {} have many changes and {} have little changes",
            stats.complex_changes, stats.minimal_changes
        ),
    ]
}

fn print_terminal_report(summary: &Summary, lines: &[String]) {
    println!();
    if summary.is_empty() {
        for line in lines {
            println!("{}", line.yellow());
        }
        println!();
        return;
    }

    println!(
        "═══ {}/{}: {} pull requests ═══",
        summary.owner.bold(),
        summary.repo.bold(),
        summary.total
    );
    for line in lines {
        println!("  • {line}");
    }
    if summary.stats.stuck_in_review > 0 {
        println!(
            "  {}",
            format!("{} stuck in review", summary.stats.stuck_in_review).red().bold()
        );
    }
    println!();
}
