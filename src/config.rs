//! Client configuration
//!
//! `ClientConfig` describes the concrete HTTP transport and the operator-level
//! switches of the query engine. It can be loaded from YAML or assembled with
//! [`ClientConfig::builder`].
//!
//! ```yaml
//! base_url: https://api.twitter.com/1.1/
//! timeout_secs: 20
//! max_retries: 2
//! backoff:
//!   type: linear
//!   initial_ms: 250
//!   max_ms: 5000
//! headers:
//!   Authorization: "Bearer AAAA..."
//! swallow_remote_failures: false
//! ```

use crate::error::{Error, Result};
use crate::policy::ErrorPolicy;
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Client Config
// ============================================================================

/// Configuration for the transport and the query engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Base URL that relative queries are resolved against
    #[serde(default)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of transport retries per query
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff between transport retries
    #[serde(default)]
    pub backoff: BackoffConfig,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Headers sent with every request (e.g. a pre-signed Authorization)
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Whether remote failures become empty results instead of errors
    #[serde(default = "default_swallow")]
    pub swallow_remote_failures: bool,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_user_agent() -> String {
    format!("cursorkit/{}", env!("CARGO_PKG_VERSION"))
}

fn default_swallow() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff: BackoffConfig::default(),
            user_agent: default_user_agent(),
            headers: HashMap::new(),
            swallow_remote_failures: default_swallow(),
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the error policy described by this config
    pub fn error_policy(&self) -> ErrorPolicy {
        ErrorPolicy::new(self.swallow_remote_failures)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(base) = &self.base_url {
            let url = url::Url::parse(base)?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(Error::config(format!(
                    "base_url must use http or https, got '{}'",
                    url.scheme()
                )));
            }
        }

        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than zero"));
        }

        if self.backoff.initial_ms > self.backoff.max_ms {
            return Err(Error::config(format!(
                "backoff.initial_ms ({}) exceeds backoff.max_ms ({})",
                self.backoff.initial_ms, self.backoff.max_ms
            )));
        }

        if self.user_agent.trim().is_empty() {
            return Err(Error::config("user_agent cannot be empty"));
        }

        Ok(())
    }
}

// ============================================================================
// Backoff Config
// ============================================================================

/// Backoff settings for transport retries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackoffConfig {
    /// Backoff strategy
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Delay before the first retry, in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Upper bound on any single delay, in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

fn default_initial_ms() -> u64 {
    100
}

fn default_max_ms() -> u64 {
    60_000
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::default(),
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

impl BackoffConfig {
    /// Delay before the first retry
    pub fn initial(&self) -> Duration {
        Duration::from_millis(self.initial_ms)
    }

    /// Maximum delay
    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`ClientConfig`]
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Set max retries
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff configuration
    #[must_use]
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff = BackoffConfig {
            backoff_type,
            initial_ms: initial.as_millis() as u64,
            max_ms: max.as_millis() as u64,
        };
        self
    }

    /// Add a default header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Choose whether remote failures are swallowed
    #[must_use]
    pub fn swallow_remote_failures(mut self, swallow: bool) -> Self {
        self.config.swallow_remote_failures = swallow;
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load and validate a client config from a YAML file
pub fn load_config(path: impl AsRef<Path>) -> Result<ClientConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;
    load_config_from_str(&content)
}

/// Load and validate a client config from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<ClientConfig> {
    let config: ClientConfig = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}
