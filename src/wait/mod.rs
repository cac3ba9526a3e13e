// ABOUTME: Bounded fixed-interval waiters for deployment creation, status, and URL health.
// ABOUTME: All waiters share one retry budget computation and one polling loop.

mod attempt;
mod budget;
mod deployment;
mod error;
mod health;
mod status;

pub use attempt::{Attempt, poll_until};
pub use budget::RetryPolicy;
pub use deployment::{DEFAULT_ACTOR, DeploymentQuery, wait_for_deployment};
pub use error::WaitError;
pub use health::{join_url, wait_for_url};
pub use status::{PreviewTarget, wait_for_status};
