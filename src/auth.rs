// ABOUTME: Authentication against password-protected preview hosts.
// ABOUTME: Exchanges a shared password for the _vercel_jwt cookie and builds request headers.

use reqwest::header::{COOKIE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, redirect};
use thiserror::Error;
use tracing::debug;

/// Cookie carrying the token issued by the password exchange.
pub const JWT_COOKIE: &str = "_vercel_jwt";

/// Header carrying a protection bypass secret.
pub const BYPASS_HEADER: &str = "x-vercel-protection-bypass";

const PASSWORD_FIELD: &str = "_vercel_password";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password exchange request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("password exchange returned unexpected status {0}")]
    UnexpectedStatus(u16),

    #[error("no _vercel_jwt cookie in the password exchange response")]
    MissingToken,

    #[error("authentication value cannot be sent as an HTTP header")]
    InvalidHeaderValue,
}

pub type Result<T> = std::result::Result<T, AuthError>;

/// Credentials attached to every health-check request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProtectionAuth {
    #[default]
    None,
    /// Token obtained through the password exchange.
    Jwt(String),
    /// Bypass secret supplied by configuration.
    Bypass(String),
}

impl ProtectionAuth {
    /// Pick the credentials for the health check. A bypass header wins over a JWT.
    pub fn select(jwt: Option<&str>, bypass: Option<&str>) -> Self {
        match (bypass, jwt) {
            (Some(b), _) if !b.is_empty() => ProtectionAuth::Bypass(b.to_string()),
            (_, Some(j)) if !j.is_empty() => ProtectionAuth::Jwt(j.to_string()),
            _ => ProtectionAuth::None,
        }
    }

    /// Request headers carrying these credentials.
    pub fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        match self {
            ProtectionAuth::None => {}
            ProtectionAuth::Jwt(token) => {
                headers.insert(COOKIE, sensitive(&format!("{JWT_COOKIE}={token}"))?);
            }
            ProtectionAuth::Bypass(secret) => {
                headers.insert(HeaderName::from_static(BYPASS_HEADER), sensitive(secret)?);
            }
        }
        Ok(headers)
    }
}

fn sensitive(value: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(value).map_err(|_| AuthError::InvalidHeaderValue)?;
    value.set_sensitive(true);
    Ok(value)
}

/// Performs the password-for-token exchange against a protected preview.
#[derive(Debug, Clone)]
pub struct PasswordAuthenticator {
    client: Client,
}

impl PasswordAuthenticator {
    /// Build an authenticator whose client does not follow redirects.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self { client })
    }

    /// POST the password to `url` and return the `_vercel_jwt` cookie value.
    ///
    /// The host answers with a redirect (usually 303) that sets the cookie, so
    /// any status in `200..307` is accepted.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingToken` when the response sets no usable cookie.
    pub async fn exchange(&self, url: &str, password: &str) -> Result<String> {
        let response = self
            .client
            .post(url)
            .form(&[(PASSWORD_FIELD, password)])
            .send()
            .await?;

        let status = response.status().as_u16();
        debug!("password exchange responded with status {}", status);
        if !(200..307).contains(&status) {
            return Err(AuthError::UnexpectedStatus(status));
        }

        response
            .cookies()
            .find(|c| c.name() == JWT_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(AuthError::MissingToken)
    }
}
