// ABOUTME: GitHub REST payloads used by the waiters.
// ABOUTME: Deployments, deployment statuses, and pull requests, trimmed to the fields we read.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

/// A user or app account as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Actor {
    pub login: String,
}

/// A deployment record created by the preview platform for one commit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Deployment {
    pub id: u64,
    #[serde(default)]
    pub creator: Option<Actor>,
    #[serde(default)]
    pub environment: Option<String>,
}

impl Deployment {
    /// Login of the account that created the deployment, if the API reported one.
    pub fn creator_login(&self) -> Option<&str> {
        self.creator.as_ref().map(|c| c.login.as_str())
    }
}

/// State of a single deployment status entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentState {
    Success,
    Inactive,
    Pending,
    Error,
    Failure,
    Queued,
    InProgress,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeploymentState::Success => "success",
            DeploymentState::Inactive => "inactive",
            DeploymentState::Pending => "pending",
            DeploymentState::Error => "error",
            DeploymentState::Failure => "failure",
            DeploymentState::Queued => "queued",
            DeploymentState::InProgress => "in_progress",
            DeploymentState::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// One entry of a deployment's status history.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeploymentStatus {
    pub state: DeploymentState,
    #[serde(default)]
    pub target_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl DeploymentStatus {
    pub fn new(state: DeploymentState) -> Self {
        Self {
            state,
            target_url: None,
            created_at: None,
        }
    }

    pub fn with_target_url(mut self, url: impl Into<String>) -> Self {
        self.target_url = Some(url.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitRef {
    pub sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub head: CommitRef,
}
