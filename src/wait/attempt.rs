// ABOUTME: Tagged result of a single poll attempt and the bounded loop that drives it.
// ABOUTME: Sleeps a fixed interval between attempts; cancellation interrupts attempts and sleeps.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::budget::RetryPolicy;
use super::error::WaitError;

/// Outcome of one poll attempt.
#[derive(Debug)]
pub enum Attempt<T> {
    /// The awaited condition holds; stop polling.
    Ready(T),
    /// Condition not reached yet. Logged at debug level.
    Pending(String),
    /// Transient failure. Logged as a warning.
    Retry(String),
    /// Stop polling and fail the wait.
    Fatal(WaitError),
}

/// Poll `step` until it reports `Ready`, the budget runs out, or `cancel` fires.
///
/// Runs at most `policy.iterations()` attempts with `policy.interval` between
/// consecutive attempts. A zero budget fails with `Timeout` without calling `step`.
/// Cancellation is observed while a step is in flight as well as between steps.
pub async fn poll_until<T, F, Fut>(
    what: &str,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut step: F,
) -> Result<T, WaitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Attempt<T>>,
{
    let attempts = policy.iterations();

    for i in 0..attempts {
        if cancel.is_cancelled() {
            return Err(WaitError::Cancelled);
        }

        info!("{what}: attempt {} of {}", i + 1, attempts);

        let attempt = tokio::select! {
            _ = cancel.cancelled() => return Err(WaitError::Cancelled),
            attempt = step() => attempt,
        };

        match attempt {
            Attempt::Ready(value) => return Ok(value),
            Attempt::Fatal(e) => return Err(e),
            Attempt::Pending(reason) => {
                debug!("{what}: {reason}");
            }
            Attempt::Retry(reason) => {
                warn!("{what}: {reason}");
            }
        }

        if i + 1 < attempts {
            tokio::select! {
                _ = cancel.cancelled() => return Err(WaitError::Cancelled),
                _ = tokio::time::sleep(policy.interval) => {}
            }
        }
    }

    Err(WaitError::Timeout { attempts })
}
