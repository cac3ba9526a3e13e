// ABOUTME: Application-wide error types for preview-wait.
// ABOUTME: Every variant is fatal for the run; transient failures never reach this type.

use crate::auth::AuthError;
use crate::github::ApiError;
use crate::wait::WaitError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("missing GitHub token: pass --token, set INPUT_TOKEN, or set GITHUB_TOKEN")]
    MissingToken,

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid CI context: {0}")]
    InvalidContext(String),

    #[error("pull request event carries no pull request number")]
    MissingPullRequestNumber,

    #[error("failed to resolve head commit of pull request #{number}: {source}")]
    PullRequestLookup {
        number: u64,
        #[source]
        source: ApiError,
    },

    #[error("no deployment by {actor} found for commit {sha}")]
    NoDeployment { actor: String, sha: String },

    #[error("deployment {deployment_id} never reached a successful status: {source}")]
    NoSuccessfulStatus {
        deployment_id: u64,
        #[source]
        source: WaitError,
    },

    #[error("deployment {deployment_id} succeeded without a target_url")]
    MissingTargetUrl { deployment_id: u64 },

    #[error("preview at {url} never became healthy: {source}")]
    UrlUnhealthy {
        url: String,
        #[source]
        source: WaitError,
    },

    #[error("cancelled while waiting for the preview")]
    Cancelled,

    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Map a waiter failure onto the run error for its stage.
    ///
    /// Cancellation and a missing target URL read the same whatever the stage;
    /// everything else goes through `stage`.
    pub fn from_wait(err: WaitError, stage: impl FnOnce(WaitError) -> Error) -> Error {
        match err {
            WaitError::Cancelled => Error::Cancelled,
            WaitError::MissingTargetUrl { deployment_id } => {
                Error::MissingTargetUrl { deployment_id }
            }
            other => stage(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
