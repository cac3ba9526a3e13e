// ABOUTME: Waits for the preview platform to create a deployment for a commit.
// ABOUTME: Matches deployments by creator login; request failures count as "not yet".

use tokio_util::sync::CancellationToken;

use super::attempt::{Attempt, poll_until};
use super::budget::RetryPolicy;
use super::error::WaitError;
use crate::github::{Deployment, DeploymentApi, Repository};

/// Default creator login of preview deployments.
pub const DEFAULT_ACTOR: &str = "vercel[bot]";

/// What to look for when polling the deployment list.
#[derive(Debug, Clone, Copy)]
pub struct DeploymentQuery<'a> {
    pub repo: &'a Repository,
    pub sha: &'a str,
    pub environment: Option<&'a str>,
    pub actor: &'a str,
}

/// Poll until a deployment created by `query.actor` exists for `query.sha`.
///
/// Returns `Ok(None)` when the budget runs out; deciding whether that is fatal
/// is left to the caller.
///
/// # Errors
///
/// Returns `WaitError::Cancelled` if `cancel` fires.
pub async fn wait_for_deployment<A>(
    api: &A,
    query: DeploymentQuery<'_>,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> Result<Option<Deployment>, WaitError>
where
    A: DeploymentApi + ?Sized,
{
    let found = poll_until("waiting for deployment", policy, cancel, || {
        find_deployment(api, query)
    })
    .await;

    match found {
        Ok(deployment) => Ok(Some(deployment)),
        Err(WaitError::Timeout { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

async fn find_deployment<A>(api: &A, query: DeploymentQuery<'_>) -> Attempt<Deployment>
where
    A: DeploymentApi + ?Sized,
{
    let deployments = match api
        .list_deployments(query.repo, query.sha, query.environment)
        .await
    {
        Ok(d) => d,
        Err(e) => return Attempt::Retry(format!("failed to list deployments: {e}")),
    };

    match deployments
        .into_iter()
        .find(|d| d.creator_login() == Some(query.actor))
    {
        Some(deployment) => Attempt::Ready(deployment),
        None => Attempt::Pending(format!(
            "no deployment by {} for {} yet",
            query.actor, query.sha
        )),
    }
}
