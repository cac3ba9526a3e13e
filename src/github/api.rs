// ABOUTME: Capability trait for the deployment-related GitHub API calls.
// ABOUTME: Lets the waiters run against the REST client or an in-memory fake.

use async_trait::async_trait;
use std::fmt;

use super::error::ApiError;
use super::models::{Deployment, DeploymentStatus, PullRequest};

/// Repository coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub repo: String,
}

impl Repository {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parse the `owner/repo` form used by `GITHUB_REPOSITORY`.
    pub fn parse(full_name: &str) -> Option<Self> {
        let (owner, repo) = full_name.split_once('/')?;
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return None;
        }
        Some(Self::new(owner, repo))
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Deployment queries used while waiting for a preview.
#[async_trait]
pub trait DeploymentApi: Send + Sync {
    /// List deployments for a commit, optionally filtered by environment.
    async fn list_deployments(
        &self,
        repo: &Repository,
        sha: &str,
        environment: Option<&str>,
    ) -> Result<Vec<Deployment>, ApiError>;

    /// List a deployment's statuses, newest first.
    async fn list_deployment_statuses(
        &self,
        repo: &Repository,
        deployment_id: u64,
    ) -> Result<Vec<DeploymentStatus>, ApiError>;

    /// Fetch a pull request.
    async fn get_pull_request(
        &self,
        repo: &Repository,
        number: u64,
    ) -> Result<PullRequest, ApiError>;
}
