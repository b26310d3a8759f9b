//! Configuration surface for the persistence layer.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Failure to assemble configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is unset.
    #[error("{0} environment variable must be set")]
    MissingVariable(&'static str),
    /// An environment variable is set but does not parse.
    #[error("{variable} must be a valid {expected}: {value:?}")]
    InvalidVariable {
        /// The offending variable.
        variable: &'static str,
        /// What it should have parsed as.
        expected: &'static str,
        /// The raw value found.
        value: String,
    },
}

/// Default forward-read page size. Purely an I/O chunking knob; it must not
/// affect reconstructed state.
pub const DEFAULT_READ_PAGE_SIZE: usize = 5;

/// Default snapshot interval: a snapshot is written after every append whose
/// new version is an exact multiple of this value. Zero disables snapshots.
pub const DEFAULT_SNAPSHOT_INTERVAL: i64 = 10;

/// Default response timeout for log-service calls.
pub const DEFAULT_RESPONSE_TIMEOUT_SECS: u64 = 30;

/// Tuning options for reads and snapshot cadence.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Maximum records fetched per forward-read page.
    pub read_page_size: usize,
    /// Snapshot cadence; zero disables snapshotting.
    pub snapshot_interval: i64,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            read_page_size: DEFAULT_READ_PAGE_SIZE,
            snapshot_interval: DEFAULT_SNAPSHOT_INTERVAL,
        }
    }
}

/// Connection settings for the substrate log service.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Target address of the log service.
    pub url: String,
    /// Credential override; `None` keeps whatever the url carries.
    #[serde(default)]
    pub username: Option<String>,
    /// Credential override; `None` keeps whatever the url carries.
    #[serde(default)]
    pub password: Option<String>,
    /// Response timeout in seconds for log-service calls.
    #[serde(default = "default_timeout_secs")]
    pub response_timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_RESPONSE_TIMEOUT_SECS
}

impl LogConfig {
    /// Creates a config for the given address with default credentials and
    /// timeout.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
            response_timeout_secs: DEFAULT_RESPONSE_TIMEOUT_SECS,
        }
    }

    /// Reads configuration from the environment: `JOURNAL_LOG_URL`
    /// (required), `JOURNAL_LOG_USERNAME`, `JOURNAL_LOG_PASSWORD`, and
    /// `JOURNAL_LOG_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `JOURNAL_LOG_URL` is unset or the
    /// timeout is not a valid integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|variable| std::env::var(variable).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup("JOURNAL_LOG_URL")
            .ok_or(ConfigError::MissingVariable("JOURNAL_LOG_URL"))?;
        let username = lookup("JOURNAL_LOG_USERNAME");
        let password = lookup("JOURNAL_LOG_PASSWORD");
        let response_timeout_secs = match lookup("JOURNAL_LOG_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidVariable {
                variable: "JOURNAL_LOG_TIMEOUT_SECS",
                expected: "u64",
                value: raw,
            })?,
            None => DEFAULT_RESPONSE_TIMEOUT_SECS,
        };

        Ok(Self {
            url,
            username,
            password,
            response_timeout_secs,
        })
    }

    /// Response timeout as a [`Duration`].
    #[must_use]
    pub fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journal_config_defaults() {
        let config = JournalConfig::default();
        assert_eq!(config.read_page_size, 5);
        assert_eq!(config.snapshot_interval, 10);
    }

    #[test]
    fn test_journal_config_deserializes_partial_input() {
        let config: JournalConfig = serde_json::from_str(r#"{"snapshot_interval": 25}"#).unwrap();
        assert_eq!(config.read_page_size, 5);
        assert_eq!(config.snapshot_interval, 25);
    }

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::new("postgres://localhost/journal");
        assert_eq!(config.response_timeout(), Duration::from_secs(30));
        assert!(config.username.is_none());
    }

    #[test]
    fn test_log_config_requires_the_url_variable() {
        let err = LogConfig::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVariable("JOURNAL_LOG_URL")));
    }

    #[test]
    fn test_log_config_reads_overrides_and_timeout() {
        let config = LogConfig::from_lookup(|variable| match variable {
            "JOURNAL_LOG_URL" => Some("postgres://localhost/journal".to_string()),
            "JOURNAL_LOG_USERNAME" => Some("writer".to_string()),
            "JOURNAL_LOG_TIMEOUT_SECS" => Some("5".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.username.as_deref(), Some("writer"));
        assert!(config.password.is_none());
        assert_eq!(config.response_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_log_config_rejects_unparseable_timeout() {
        let err = LogConfig::from_lookup(|variable| match variable {
            "JOURNAL_LOG_URL" => Some("postgres://localhost/journal".to_string()),
            "JOURNAL_LOG_TIMEOUT_SECS" => Some("soon".to_string()),
            _ => None,
        })
        .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidVariable {
                variable: "JOURNAL_LOG_TIMEOUT_SECS",
                ..
            }
        ));
    }
}
