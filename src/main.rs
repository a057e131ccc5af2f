mod config;
mod github;
mod report;
mod stats;

use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::{debug, error, info, info_span};
use tracing_subscriber::EnvFilter;

/// PR Stats — CLI tool that walks every pull request of a GitHub repository
/// and summarizes open/closed totals, weekly activity, stale reviews and
/// change complexity.
#[derive(Parser, Debug)]
#[command(name = "pr-stats", version, about)]
struct Cli {
    /// Repository as owner/repo or a GitHub URL (e.g., https://github.com/org/repo)
    ///
    /// Overrides github.owner and github.repo from the config file.
    repository: Option<String>,

    /// Repository owner or organization
    #[arg(long)]
    owner: Option<String>,

    /// Repository name
    #[arg(long)]
    repo: Option<String>,

    /// GitHub API token (defaults to config file, then GITHUB_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Path to a config file instead of ./.pr-stats.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the GitHub REST API
    #[arg(long)]
    api_url: Option<String>,

    /// Stop with an error if the listing has more than this many pages (at least 1)
    #[arg(long)]
    max_pages: Option<NonZeroUsize>,
}

impl Cli {
    /// Layer command-line values over the loaded configuration.
    fn apply(&self, config: &mut config::Config) -> Result<(), github::GithubError> {
        if let Some(repository) = self.repository.as_deref() {
            let (owner, repo) = github::parse_repo_slug(repository)?;
            config.github.owner = Some(owner);
            config.github.repo = Some(repo);
        }
        if let Some(owner) = &self.owner {
            config.github.owner = Some(owner.clone());
        }
        if let Some(repo) = &self.repo {
            config.github.repo = Some(repo.clone());
        }
        if let Some(token) = &self.token {
            config.github.token = Some(token.clone());
        }
        if let Some(api_url) = &self.api_url {
            config.github.api_url = Some(api_url.clone());
        }
        if self.max_pages.is_some() {
            config.github.max_pages = self.max_pages;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("loading configuration");
    let mut config = config::Config::load_path(cli.config.as_deref())?;
    cli.apply(&mut config)?;

    let target = match config.validate() {
        Ok(target) => target,
        Err(e) => {
            error!(error = %e, "cannot get pull requests");
            return Ok(());
        }
    };

    let _main_span = info_span!("pr_stats", owner = %target.owner, repo = %target.repo).entered();
    debug!(api_url = %target.api_url, max_pages = ?config.github.max_pages, "resolved target");

    let client = github::GitHubClient::new(&target)?;
    let pull_requests =
        github::paginate::fetch_all_pull_requests(&client, config.github.max_pages).await?;

    let pr_stats = if pull_requests.is_empty() {
        stats::PullRequestStats::default()
    } else {
        info!(total = pull_requests.len(), "aggregating pull requests");
        let window = stats::Window::new(chrono::Utc::now(), &config.thresholds)?;
        stats::aggregate(
            &pull_requests,
            &client,
            &window,
            config.thresholds.complex_files,
        )
        .await?
    };

    let summary = report::build(&target, pull_requests.len(), pr_stats);
    report::output(&summary);
    info!("done");

    Ok(())
}
