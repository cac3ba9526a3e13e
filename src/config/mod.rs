// ABOUTME: Configuration types and parsing for preview-wait.yml.
// ABOUTME: Handles YAML parsing, command-line overrides, and validation into Settings.

mod env_value;
mod init;

pub use env_value::{EnvValue, resolve_secret};
pub use init::init_config;

use crate::error::{Error, Result};
use crate::wait::{DEFAULT_ACTOR, RetryPolicy};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "preview-wait.yml";
pub const CONFIG_FILENAME_ALT: &str = "preview-wait.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".github/preview-wait.yml";

/// Environment variable used for the token when nothing else supplies one.
pub const TOKEN_FALLBACK_VAR: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub token: Option<EnvValue>,

    #[serde(default)]
    pub vercel_password: Option<EnvValue>,

    #[serde(default)]
    pub protection_bypass_header: Option<EnvValue>,

    #[serde(default)]
    pub environment: Option<String>,

    /// Seconds each waiter may spend before giving up.
    #[serde(default = "default_max_timeout")]
    pub max_timeout: u64,

    /// Seconds between attempts.
    #[serde(default = "default_check_interval")]
    pub check_interval: u64,

    #[serde(default)]
    pub allow_inactive: bool,

    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default = "default_actor")]
    pub actor: String,
}

fn default_max_timeout() -> u64 {
    60
}

fn default_check_interval() -> u64 {
    2
}

fn default_path() -> String {
    "/".to_string()
}

fn default_actor() -> String {
    DEFAULT_ACTOR.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            token: None,
            vercel_password: None,
            protection_bypass_header: None,
            environment: None,
            max_timeout: default_max_timeout(),
            check_interval: default_check_interval(),
            allow_inactive: false,
            path: default_path(),
            actor: default_actor(),
        }
    }
}

/// Values supplied on the command line (or through `INPUT_*` variables).
/// `Some` replaces whatever the file said.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub token: Option<String>,
    pub vercel_password: Option<String>,
    pub protection_bypass_header: Option<String>,
    pub environment: Option<String>,
    pub max_timeout: Option<u64>,
    pub check_interval: Option<u64>,
    pub allow_inactive: Option<bool>,
    pub path: Option<String>,
    pub actor: Option<String>,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file deserializes to unit, not to a map of defaults.
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Find the config file in `dir`, if any.
    pub fn find(dir: &Path) -> Option<PathBuf> {
        [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ]
        .into_iter()
        .find(|p| p.exists())
    }

    /// Load the config file in `dir`, or defaults when there is none.
    pub fn discover(dir: &Path) -> Result<Self> {
        match Self::find(dir) {
            Some(path) => Self::load(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(token) = overrides.token {
            self.token = Some(EnvValue::Literal(token));
        }
        if let Some(password) = overrides.vercel_password {
            self.vercel_password = Some(EnvValue::Literal(password));
        }
        if let Some(header) = overrides.protection_bypass_header {
            self.protection_bypass_header = Some(EnvValue::Literal(header));
        }
        if overrides.environment.is_some() {
            self.environment = overrides.environment;
        }
        if let Some(v) = overrides.max_timeout {
            self.max_timeout = v;
        }
        if let Some(v) = overrides.check_interval {
            self.check_interval = v;
        }
        if let Some(v) = overrides.allow_inactive {
            self.allow_inactive = v;
        }
        if let Some(v) = overrides.path {
            self.path = v;
        }
        if let Some(v) = overrides.actor {
            self.actor = v;
        }
        self
    }

    /// Resolve env references and validate into run settings.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingToken` when no token is configured (and
    /// `GITHUB_TOKEN` is unset), `Error::MissingEnvVar` for an unresolvable
    /// reference, and `Error::InvalidConfig` for unusable values.
    pub fn resolve(&self) -> Result<Settings> {
        let token = match resolve_secret(self.token.as_ref())? {
            Some(t) => t,
            None => std::env::var(TOKEN_FALLBACK_VAR)
                .ok()
                .filter(|t| !t.is_empty())
                .ok_or(Error::MissingToken)?,
        };

        if self.check_interval == 0 {
            return Err(Error::InvalidConfig(
                "check_interval must be at least 1 second".to_string(),
            ));
        }

        let actor = self.actor.trim();
        if actor.is_empty() {
            return Err(Error::InvalidConfig("actor cannot be empty".to_string()));
        }

        let path = if self.path.is_empty() {
            default_path()
        } else {
            self.path.clone()
        };

        Ok(Settings {
            token,
            vercel_password: resolve_secret(self.vercel_password.as_ref())?,
            protection_bypass_header: resolve_secret(self.protection_bypass_header.as_ref())?,
            environment: self.environment.clone().filter(|e| !e.is_empty()),
            allow_inactive: self.allow_inactive,
            path,
            actor: actor.to_string(),
            policy: RetryPolicy::from_secs(self.max_timeout, self.check_interval),
        })
    }
}

/// Validated settings for one run.
#[derive(Clone)]
pub struct Settings {
    pub token: String,
    pub vercel_password: Option<String>,
    pub protection_bypass_header: Option<String>,
    pub environment: Option<String>,
    pub allow_inactive: bool,
    pub path: String,
    pub actor: String,
    pub policy: RetryPolicy,
}

impl Settings {
    /// Settings with defaults for everything but the token.
    pub fn new(token: impl Into<String>) -> Self {
        let defaults = Config::default();
        Settings {
            token: token.into(),
            vercel_password: None,
            protection_bypass_header: None,
            environment: None,
            allow_inactive: defaults.allow_inactive,
            path: defaults.path,
            actor: defaults.actor,
            policy: RetryPolicy::from_secs(defaults.max_timeout, defaults.check_interval),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("token", &"<redacted>")
            .field("vercel_password", &self.vercel_password.as_ref().map(|_| "<redacted>"))
            .field(
                "protection_bypass_header",
                &self.protection_bypass_header.as_ref().map(|_| "<redacted>"),
            )
            .field("environment", &self.environment)
            .field("allow_inactive", &self.allow_inactive)
            .field("path", &self.path)
            .field("actor", &self.actor)
            .field("policy", &self.policy)
            .finish()
    }
}
