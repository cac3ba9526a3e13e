// ABOUTME: Waits for a deployment's newest status to become successful.
// ABOUTME: Non-terminal and failed states are retried; inactive is accepted on request.

use tokio_util::sync::CancellationToken;

use super::attempt::{Attempt, poll_until};
use super::budget::RetryPolicy;
use super::error::WaitError;
use crate::github::{DeploymentApi, DeploymentState, DeploymentStatus, Repository};

/// A deployment whose newest status is terminal and points at a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewTarget {
    pub deployment_id: u64,
    pub state: DeploymentState,
    pub url: String,
}

/// Poll the status history of `deployment_id` until the newest entry is
/// `success`, or `inactive` when `allow_inactive` is set.
///
/// `error` and `failure` are retried like any other non-terminal state.
///
/// # Errors
///
/// Returns `WaitError::Timeout` when the budget runs out,
/// `WaitError::MissingTargetUrl` for a terminal status without a URL,
/// and `WaitError::Cancelled` if `cancel` fires.
pub async fn wait_for_status<A>(
    api: &A,
    repo: &Repository,
    deployment_id: u64,
    allow_inactive: bool,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> Result<PreviewTarget, WaitError>
where
    A: DeploymentApi + ?Sized,
{
    poll_until("waiting for deployment status", policy, cancel, move || async move {
        match api.list_deployment_statuses(repo, deployment_id).await {
            Ok(statuses) => evaluate(deployment_id, statuses, allow_inactive),
            Err(e) => Attempt::Retry(format!("failed to list deployment statuses: {e}")),
        }
    })
    .await
}

/// Decide what the newest status in `statuses` means for the wait.
pub fn evaluate(
    deployment_id: u64,
    statuses: Vec<DeploymentStatus>,
    allow_inactive: bool,
) -> Attempt<PreviewTarget> {
    let Some(latest) = statuses.into_iter().next() else {
        return Attempt::Retry(format!("no status for deployment {deployment_id} yet"));
    };

    let terminal = match latest.state {
        DeploymentState::Success => true,
        DeploymentState::Inactive => allow_inactive,
        _ => false,
    };

    if !terminal {
        return Attempt::Pending(match latest.created_at {
            Some(at) => format!(
                "no status with success yet (latest is {} since {})",
                latest.state,
                at.to_rfc3339()
            ),
            None => format!("no status with success yet (latest is {})", latest.state),
        });
    }

    match latest.target_url {
        Some(url) if !url.is_empty() => Attempt::Ready(PreviewTarget {
            deployment_id,
            state: latest.state,
            url,
        }),
        _ => Attempt::Fatal(WaitError::MissingTargetUrl { deployment_id }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(state: DeploymentState) -> DeploymentStatus {
        DeploymentStatus::new(state).with_target_url("https://preview.example.com")
    }

    #[test]
    fn empty_history_is_retried() {
        assert!(matches!(evaluate(1, vec![], false), Attempt::Retry(_)));
    }

    #[test]
    fn success_is_ready() {
        let target = match evaluate(1, vec![status(DeploymentState::Success)], false) {
            Attempt::Ready(target) => target,
            other => panic!("expected ready, got {other:?}"),
        };
        assert_eq!(target.url, "https://preview.example.com");
        assert_eq!(target.state, DeploymentState::Success);
    }

    #[test]
    fn only_newest_status_counts() {
        let history = vec![
            status(DeploymentState::InProgress),
            status(DeploymentState::Success),
        ];
        assert!(matches!(evaluate(1, history, false), Attempt::Pending(_)));
    }

    #[test]
    fn inactive_needs_opt_in() {
        let history = || vec![status(DeploymentState::Inactive)];
        assert!(matches!(evaluate(1, history(), false), Attempt::Pending(_)));
        assert!(matches!(evaluate(1, history(), true), Attempt::Ready(_)));
    }

    #[test]
    fn pending_reason_names_latest_state_and_time() {
        let at = chrono::DateTime::parse_from_rfc3339("2024-05-01T10:01:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        let history = vec![status(DeploymentState::Queued).with_created_at(at)];
        match evaluate(1, history, false) {
            Attempt::Pending(reason) => assert_eq!(
                reason,
                "no status with success yet (latest is queued since 2024-05-01T10:01:00+00:00)"
            ),
            other => panic!("expected pending, got {other:?}"),
        }
    }

    #[test]
    fn failure_states_are_retried() {
        for state in [DeploymentState::Error, DeploymentState::Failure] {
            assert!(matches!(
                evaluate(1, vec![status(state)], false),
                Attempt::Pending(_)
            ));
        }
    }

    #[test]
    fn success_without_url_is_fatal() {
        let result = evaluate(9, vec![DeploymentStatus::new(DeploymentState::Success)], false);
        assert!(matches!(
            result,
            Attempt::Fatal(WaitError::MissingTargetUrl { deployment_id: 9 })
        ));
    }
}
