// ABOUTME: Error types for the bounded waiting loops.
// ABOUTME: Covers budget exhaustion, cancellation, and fatal poll outcomes.

/// Terminal failures of a waiter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WaitError {
    /// Every attempt in the retry budget was used without success.
    #[error("timed out after {attempts} attempt(s)")]
    Timeout { attempts: u32 },

    /// The wait was cancelled before it completed.
    #[error("wait was cancelled")]
    Cancelled,

    /// A terminal deployment status carried no target URL.
    #[error("deployment {deployment_id} reached a terminal status without a target_url")]
    MissingTargetUrl { deployment_id: u64 },

    /// The URL to probe could not be parsed.
    #[error("invalid preview URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}
