// ABOUTME: Sequences the waiters: commit → deployment → status → auth → URL health.
// ABOUTME: Publishes the url and vercel_jwt outputs and stops at the first fatal error.

use std::future::Future;

use reqwest::Client;
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::auth::{PasswordAuthenticator, ProtectionAuth};
use crate::config::Settings;
use crate::context::{RunContext, resolve_sha};
use crate::error::{Error, Result};
use crate::github::DeploymentApi;
use crate::output::Output;
use crate::wait::{DeploymentQuery, wait_for_deployment, wait_for_status, wait_for_url};

const USER_AGENT: &str = concat!("preview-wait/", env!("CARGO_PKG_VERSION"));

/// What a successful run found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewOutcome {
    pub sha: String,
    pub deployment_id: u64,
    pub url: String,
    pub vercel_jwt: Option<String>,
    pub status: StatusCode,
}

/// Wait for the preview of `context` to exist, succeed, and answer requests.
///
/// # Errors
///
/// Every error is fatal for the run; transient failures are retried inside
/// the individual waiters.
pub async fn wait_for_preview<A>(
    api: &A,
    settings: &Settings,
    context: &RunContext,
    output: &Output,
    cancel: &CancellationToken,
) -> Result<PreviewOutcome>
where
    A: DeploymentApi + ?Sized,
{
    let policy = &settings.policy;
    info!(
        "waiting up to {}s per stage, checking every {:?} ({} attempts)",
        policy.max_timeout.as_secs(),
        policy.interval,
        policy.iterations()
    );

    let sha = until_cancelled(cancel, resolve_sha(api, context)).await?;
    output.progress(&format!(
        "  → Waiting for a deployment of {} by {}...",
        sha, settings.actor
    ));

    let query = DeploymentQuery {
        repo: &context.repo,
        sha: &sha,
        environment: settings.environment.as_deref(),
        actor: &settings.actor,
    };
    let no_deployment = || Error::NoDeployment {
        actor: settings.actor.clone(),
        sha: sha.clone(),
    };
    let deployment = wait_for_deployment(api, query, policy, cancel)
        .await
        .map_err(|e| Error::from_wait(e, |_| no_deployment()))?
        .ok_or_else(no_deployment)?;
    match &deployment.environment {
        Some(env) => info!("found deployment {} in {}", deployment.id, env),
        None => info!("found deployment {}", deployment.id),
    }

    output.progress(&format!(
        "  → Waiting for deployment {} to succeed...",
        deployment.id
    ));
    let target = wait_for_status(
        api,
        &context.repo,
        deployment.id,
        settings.allow_inactive,
        policy,
        cancel,
    )
    .await
    .map_err(|e| {
        Error::from_wait(e, |source| Error::NoSuccessfulStatus {
            deployment_id: deployment.id,
            source,
        })
    })?;
    info!("deployment {} is {} at {}", deployment.id, target.state, target.url);
    output.set_output("url", &target.url)?;

    let vercel_jwt = match &settings.vercel_password {
        Some(password) => {
            output.progress("  → Exchanging password for a preview token...");
            let authenticator = PasswordAuthenticator::new()?;
            let jwt = until_cancelled(cancel, async {
                Ok(authenticator.exchange(&target.url, password).await?)
            })
            .await?;
            output.mask(&jwt);
            output.set_output("vercel_jwt", &jwt)?;
            Some(jwt)
        }
        None => None,
    };

    let auth = ProtectionAuth::select(
        vercel_jwt.as_deref(),
        settings.protection_bypass_header.as_deref(),
    );
    let headers = auth.headers()?;
    let client = Client::builder().user_agent(USER_AGENT).build()?;

    output.progress(&format!(
        "  → Waiting for {} to respond...",
        crate::wait::join_url(&target.url, &settings.path)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| target.url.clone())
    ));
    let status = wait_for_url(&client, &target.url, &settings.path, &headers, policy, cancel)
        .await
        .map_err(|e| {
            Error::from_wait(e, |source| Error::UrlUnhealthy {
                url: target.url.clone(),
                source,
            })
        })?;

    Ok(PreviewOutcome {
        sha,
        deployment_id: deployment.id,
        url: target.url,
        vercel_jwt,
        status,
    })
}

/// Run a single-shot step, giving up with `Error::Cancelled` if `cancel` fires first.
async fn until_cancelled<T>(
    cancel: &CancellationToken,
    step: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        _ = cancel.cancelled() => Err(Error::Cancelled),
        result = step => result,
    }
}
