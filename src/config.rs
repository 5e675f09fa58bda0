//! Consumer configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::naming::{Resolver, DEFAULT_FALLBACK_PREFIX};

/// Timeout used when a call does not supply one (10 minutes).
pub const DEFAULT_TIMEOUT_MS: u64 = 600_000;

/// Name the connection factory is bound under by default.
pub const DEFAULT_CONNECTION_FACTORY: &str = "ConnectionFactory";

/// Settings for a [`CorrelatedConsumer`](crate::CorrelatedConsumer).
///
/// Every field has a default, so a partial (or empty) JSON document is valid:
///
/// ```
/// use correlated_reply::ConsumerConfig;
///
/// let config = ConsumerConfig::from_json(r#"{ "default_timeout_ms": 30000 }"#).unwrap();
/// assert_eq!(config.connection_factory, "ConnectionFactory");
/// assert_eq!(config.default_timeout().as_secs(), 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumerConfig {
    /// Directory name of the connection factory
    pub connection_factory: String,
    /// Namespace prefix tried when a primary lookup misses
    pub fallback_prefix: String,
    /// Timeout for calls that don't pass one
    pub default_timeout_ms: u64,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            connection_factory: DEFAULT_CONNECTION_FACTORY.to_string(),
            fallback_prefix: DEFAULT_FALLBACK_PREFIX.to_string(),
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ConsumerConfig {
    /// Parse a configuration from JSON.
    ///
    /// A `default_timeout_ms` of zero is rejected, since every call using it
    /// would fail validation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        if config.default_timeout_ms == 0 {
            return Err(<serde_json::Error as serde::de::Error>::custom(
                "default_timeout_ms must be greater than zero",
            ));
        }
        Ok(config)
    }

    pub fn with_connection_factory(mut self, name: impl Into<String>) -> Self {
        self.connection_factory = name.into();
        self
    }

    pub fn with_fallback_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.fallback_prefix = prefix.into();
        self
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    /// The resolver implementing this configuration's fallback convention.
    pub fn resolver(&self) -> Resolver {
        Resolver::with_fallback_prefix(self.fallback_prefix.clone())
    }
}
