// ABOUTME: reqwest-based GitHub REST client implementing DeploymentApi.
// ABOUTME: Handles auth headers, base URL selection, and error mapping.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use super::api::{DeploymentApi, Repository};
use super::error::{ApiError, Result};
use super::models::{Deployment, DeploymentStatus, PullRequest};

pub const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("preview-wait/", env!("CARGO_PKG_VERSION"));

/// GitHub REST client scoped to the deployment endpoints.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    /// Create a client against the public GitHub API.
    pub fn new(token: &str) -> Result<Self> {
        Self::builder(token).build()
    }

    pub fn builder(token: &str) -> GitHubClientBuilder {
        GitHubClientBuilder {
            token: token.to_string(),
            base_url: GITHUB_API_BASE.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn repo_url(&self, repo: &Repository, rest: &str) -> Result<Url> {
        let url = format!(
            "{}/repos/{}/{}/{}",
            self.base_url, repo.owner, repo.repo, rest
        );
        Ok(Url::parse(&url)?)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(target: "github", "GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let body = response.text().await?;
        trace!(target: "github", "response body: {}", body);

        serde_json::from_str(&body).map_err(|e| ApiError::Status {
            status: status.as_u16(),
            message: format!("failed to parse response: {e}"),
        })
    }
}

#[async_trait]
impl DeploymentApi for GitHubClient {
    async fn list_deployments(
        &self,
        repo: &Repository,
        sha: &str,
        environment: Option<&str>,
    ) -> Result<Vec<Deployment>> {
        let mut url = self.repo_url(repo, "deployments")?;
        url.query_pairs_mut().append_pair("sha", sha);
        if let Some(env) = environment {
            url.query_pairs_mut().append_pair("environment", env);
        }
        self.get(url).await
    }

    async fn list_deployment_statuses(
        &self,
        repo: &Repository,
        deployment_id: u64,
    ) -> Result<Vec<DeploymentStatus>> {
        let url = self.repo_url(repo, &format!("deployments/{deployment_id}/statuses"))?;
        self.get(url).await
    }

    async fn get_pull_request(&self, repo: &Repository, number: u64) -> Result<PullRequest> {
        let url = self.repo_url(repo, &format!("pulls/{number}"))?;
        self.get(url).await
    }
}

/// Builder for configuring a GitHub client.
#[derive(Debug)]
pub struct GitHubClientBuilder {
    token: String,
    base_url: String,
}

impl GitHubClientBuilder {
    /// Set a custom API base URL (GitHub Enterprise, or a mock server in tests).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn build(self) -> Result<GitHubClient> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| ApiError::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(GitHubClient {
            client,
            base_url: self.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        })
}
