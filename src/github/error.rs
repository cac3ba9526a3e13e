// ABOUTME: Error types for GitHub API calls.
// ABOUTME: Separates transport failures from non-success HTTP responses.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("GitHub request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GitHub API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("token contains characters not allowed in an HTTP header")]
    InvalidToken,

    #[error("invalid GitHub API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, ApiError>;
