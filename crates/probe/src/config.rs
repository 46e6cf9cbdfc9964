//! Session configuration
//!
//! One explicit value threaded into every page and region through the
//! [`crate::Session`]: base URL, wait bounds, approval polling bounds, named
//! test users and the expected-text variables used by content assertions.

use crate::result::{ProbeError, ProbeResult};
use crate::wait::{PollConfig, WaitConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Environment variable overriding [`SessionConfig::base_url`]
pub const ENV_BASE_URL: &str = "AMO_BASE_URL";
/// Environment variable overriding [`WaitConfig::timeout_ms`]
pub const ENV_WAIT_TIMEOUT_MS: &str = "AMO_WAIT_TIMEOUT_MS";
/// Environment variable overriding [`PollConfig::ceiling_ms`]
pub const ENV_APPROVAL_CEILING_MS: &str = "AMO_APPROVAL_CEILING_MS";

const DEFAULT_BASE_URL: &str = "https://addons-dev.allizom.org";

/// Login credentials of a named test user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    /// Create credentials
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Configuration for a browser session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Root URL of the site under test, without trailing slash
    pub base_url: String,
    /// Bounds for explicit and implicit waits
    pub wait: WaitConfig,
    /// Bounds for the version auto-approval poll
    pub approval: PollConfig,
    /// Named test users
    pub users: BTreeMap<String, Credentials>,
    /// Expected texts keyed by name (headers, summaries, translations)
    pub variables: BTreeMap<String, String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            wait: WaitConfig::default(),
            approval: PollConfig::default(),
            users: BTreeMap::new(),
            variables: BTreeMap::new(),
        }
    }
}

impl SessionConfig {
    /// Create a config for `base_url` with default bounds
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            ..Self::default()
        }
    }

    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> ProbeResult<Self> {
        let mut config: Self = serde_yaml_ng::from_str(yaml)?;
        config.base_url = normalize_base_url(config.base_url);
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> ProbeResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| ProbeError::Config {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Apply `AMO_*` environment overrides
    pub fn with_env_overrides(self) -> ProbeResult<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn with_overrides_from<F>(mut self, lookup: F) -> ProbeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = normalize_base_url(url);
        }
        if let Some(ms) = lookup(ENV_WAIT_TIMEOUT_MS) {
            self.wait.timeout_ms = parse_ms(ENV_WAIT_TIMEOUT_MS, &ms)?;
        }
        if let Some(ms) = lookup(ENV_APPROVAL_CEILING_MS) {
            self.approval.ceiling_ms = parse_ms(ENV_APPROVAL_CEILING_MS, &ms)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject bounds that would make waits or polls spin without sleeping
    pub fn validate(&self) -> ProbeResult<()> {
        if self.wait.poll_interval_ms == 0 {
            return Err(ProbeError::Config {
                message: "wait.poll_interval_ms must be greater than 0".to_string(),
            });
        }
        if self.approval.interval_ms == 0 {
            return Err(ProbeError::Config {
                message: "approval.interval_ms must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Set wait bounds
    #[must_use]
    pub fn with_wait(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    /// Set approval polling bounds
    #[must_use]
    pub fn with_approval(mut self, approval: PollConfig) -> Self {
        self.approval = approval;
        self
    }

    /// Add a named user
    #[must_use]
    pub fn with_user(mut self, name: impl Into<String>, credentials: Credentials) -> Self {
        let _ = self.users.insert(name.into(), credentials);
        self
    }

    /// Add an expected-text variable
    #[must_use]
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.variables.insert(key.into(), value.into());
        self
    }

    /// Look up an expected-text variable
    pub fn variable(&self, key: &str) -> ProbeResult<&str> {
        self.variables
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ProbeError::Config {
                message: format!("missing variable {key:?}"),
            })
    }

    /// Look up a named user
    pub fn user(&self, name: &str) -> ProbeResult<&Credentials> {
        self.users.get(name).ok_or_else(|| ProbeError::Config {
            message: format!("missing credentials for user {name:?}"),
        })
    }

    /// Join a site-relative path onto the base URL
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn parse_ms(key: &str, value: &str) -> ProbeResult<u64> {
    value.trim().parse().map_err(|_| ProbeError::Config {
        message: format!("{key} must be milliseconds, got {value:?}"),
    })
}
