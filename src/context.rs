// ABOUTME: Source-control context of the CI run: repository and commit to wait for.
// ABOUTME: Reads the GitHub Actions environment and resolves pull requests to head SHAs.

use serde_json::Value;
use std::path::Path;
use tracing::info;

use crate::error::{Error, Result};
use crate::github::{DeploymentApi, Repository};

const PULL_REQUEST_EVENTS: &[&str] = &["pull_request", "pull_request_target"];

/// The commit the preview was built from, or the pull request that names it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitTarget {
    Sha(String),
    PullRequest(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub repo: Repository,
    pub target: CommitTarget,
}

/// Explicit values from the command line; anything unset comes from the environment.
#[derive(Debug, Clone, Default)]
pub struct ContextOverrides {
    pub repository: Option<String>,
    pub sha: Option<String>,
    pub pull_request: Option<u64>,
}

impl RunContext {
    pub fn new(repo: Repository, target: CommitTarget) -> Self {
        Self { repo, target }
    }

    /// Build the context from overrides and the `GITHUB_*` environment.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidContext` when the repository or commit cannot be
    /// determined, and `Error::MissingPullRequestNumber` for a pull request
    /// event whose payload has no number.
    pub fn detect(overrides: ContextOverrides) -> Result<Self> {
        let full_name = overrides
            .repository
            .or_else(|| env_var("GITHUB_REPOSITORY"))
            .ok_or_else(|| {
                Error::InvalidContext("repository not set (GITHUB_REPOSITORY)".to_string())
            })?;
        let repo = Repository::parse(&full_name).ok_or_else(|| {
            Error::InvalidContext(format!("expected owner/repo, got '{full_name}'"))
        })?;

        let target = if let Some(number) = overrides.pull_request {
            CommitTarget::PullRequest(number)
        } else if let Some(sha) = overrides.sha {
            CommitTarget::Sha(sha)
        } else {
            target_from_env()?
        };

        Ok(Self { repo, target })
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn target_from_env() -> Result<CommitTarget> {
    let event_name = env_var("GITHUB_EVENT_NAME").unwrap_or_default();

    if PULL_REQUEST_EVENTS.contains(&event_name.as_str()) {
        let path = env_var("GITHUB_EVENT_PATH").ok_or(Error::MissingPullRequestNumber)?;
        let number = pull_request_number(Path::new(&path))?
            .ok_or(Error::MissingPullRequestNumber)?;
        return Ok(CommitTarget::PullRequest(number));
    }

    env_var("GITHUB_SHA")
        .map(CommitTarget::Sha)
        .ok_or_else(|| Error::InvalidContext("commit not set (GITHUB_SHA)".to_string()))
}

/// Read the pull request number from a webhook event payload file.
pub fn pull_request_number(event_path: &Path) -> Result<Option<u64>> {
    let content = std::fs::read_to_string(event_path)?;
    let payload: Value = serde_json::from_str(&content)?;
    Ok(payload
        .pointer("/pull_request/number")
        .or_else(|| payload.get("number"))
        .and_then(Value::as_u64))
}

/// Turn the context's commit target into a SHA.
///
/// A pull request is looked up once; failure is fatal since nothing retries it.
pub async fn resolve_sha<A>(api: &A, context: &RunContext) -> Result<String>
where
    A: DeploymentApi + ?Sized,
{
    match &context.target {
        CommitTarget::Sha(sha) => Ok(sha.clone()),
        CommitTarget::PullRequest(number) => {
            let pr = api
                .get_pull_request(&context.repo, *number)
                .await
                .map_err(|source| Error::PullRequestLookup {
                    number: *number,
                    source,
                })?;
            info!("pull request #{} head is {}", number, pr.head.sha);
            Ok(pr.head.sha)
        }
    }
}
