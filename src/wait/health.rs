// ABOUTME: Waits for the preview URL to answer without a transport or HTTP error.
// ABOUTME: Attaches protection credentials and logs why each failed probe failed.

use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use tokio_util::sync::CancellationToken;
use url::Url;

use super::attempt::{Attempt, poll_until};
use super::budget::RetryPolicy;
use super::error::WaitError;

/// Append `path` to the path of `base`, keeping exactly one slash between them.
///
/// Query and fragment of `base` are kept; a query on `path` is appended to it.
pub fn join_url(base: &str, path: &str) -> Result<Url, WaitError> {
    let invalid = |reason: String| WaitError::InvalidUrl {
        url: base.to_string(),
        reason,
    };
    let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot carry a path".to_string()));
    }

    let (path, extra_query) = match path.split_once('?') {
        Some((p, q)) => (p, Some(q).filter(|q| !q.is_empty())),
        None => (path, None),
    };
    let joined = format!(
        "{}/{}",
        url.path().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    url.set_path(&joined);

    if let Some(extra) = extra_query {
        let query = match url.query().filter(|q| !q.is_empty()) {
            Some(existing) => format!("{existing}&{extra}"),
            None => extra.to_string(),
        };
        url.set_query(Some(&query));
    }
    Ok(url)
}

/// Poll `base_url` + `path` until a GET returns a non-error response.
///
/// Any status below 400 counts as healthy.
///
/// # Errors
///
/// Returns `WaitError::Timeout` when the budget runs out,
/// `WaitError::InvalidUrl` when `base_url` does not parse,
/// and `WaitError::Cancelled` if `cancel` fires.
pub async fn wait_for_url(
    client: &Client,
    base_url: &str,
    path: &str,
    headers: &HeaderMap,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> Result<StatusCode, WaitError> {
    let url = join_url(base_url, path)?;

    poll_until("waiting for preview URL", policy, cancel, || {
        probe(client, url.clone(), headers)
    })
    .await
}

async fn probe(client: &Client, url: Url, headers: &HeaderMap) -> Attempt<StatusCode> {
    let result = client
        .get(url)
        .headers(headers.clone())
        .send()
        .await
        .and_then(|r| r.error_for_status());

    match result {
        Ok(response) => Attempt::Ready(response.status()),
        Err(e) => match e.status() {
            Some(status) => Attempt::Retry(format!("server responded with status {status}")),
            None => Attempt::Retry(format!("no response received: {e}")),
        },
    }
}
