//! Configuration management for the relay.
//!
//! Configuration is read from `~/.config/rivulet-relay/config.toml` unless a
//! path is given on the command line. If the default file doesn't exist, a
//! commented template is created.

mod interval;

pub use interval::{format_interval, parse_interval};

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetcher::http_fetcher::DEFAULT_USER_AGENT;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feeds: FeedsConfig,
    pub delivery: DeliveryConfig,
}

/// Where feeds come from and how often they are checked.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    /// Feed list, one URL per line. Re-read every cycle.
    pub list_file: PathBuf,
    /// Persisted seen-set.
    pub seen_file: PathBuf,
    #[serde(with = "interval")]
    pub check_interval: Duration,
    #[serde(with = "interval")]
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            list_file: PathBuf::from("rss.txt"),
            seen_file: PathBuf::from("seen_entries.txt"),
            check_interval: Duration::from_secs(20 * 60),
            request_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Outbound webhook settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    pub webhook_url: String,
    /// Receives the end-of-cycle signal. Falls back to `webhook_url`.
    pub completion_webhook_url: Option<String>,
    #[serde(with = "interval")]
    pub send_interval: Duration,
    /// Used when a 429 response doesn't say how long to wait.
    #[serde(with = "interval")]
    pub default_retry_after: Duration,
    /// Unset means throttled notifications are retried forever.
    pub max_throttle_retries: Option<u32>,
    #[serde(with = "interval")]
    pub request_timeout: Duration,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            completion_webhook_url: None,
            send_interval: Duration::from_secs(5),
            default_retry_after: Duration::from_secs(10),
            max_throttle_retries: None,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl DeliveryConfig {
    pub fn completion_url(&self) -> &str {
        self.completion_webhook_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(&self.webhook_url)
    }
}

impl Config {
    /// Load configuration from `path`, or from the default path when `None`.
    ///
    /// Only the default path gets a template written when missing; an
    /// explicit path that doesn't exist is an error. Missing fields use
    /// default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::default_config_path()?;
                if !default_path.exists() {
                    Self::create_default_config(&default_path)?;
                }
                default_path
            }
        };

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        Self::from_toml(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reject configurations the relay can't run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delivery.webhook_url.trim().is_empty() {
            return Err(ConfigError::Missing("delivery.webhook_url"));
        }
        if self.feeds.check_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "feeds.check_interval must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Get the default config file path: `~/.config/rivulet-relay/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("rivulet-relay").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        tracing::info!("Wrote default config to {}", path.display());
        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> &'static str {
        r##"# rivulet-relay configuration
#
# Intervals accept "30s", "20m", "1h", "1d" or a plain number of seconds.

[feeds]
# One feed URL per line; blank lines and lines starting with '#' are ignored.
# Re-read at the start of every check, so edits apply without a restart.
list_file = "rss.txt"

# Keys of entries already announced, one per line.
seen_file = "seen_entries.txt"

# Time between feed checks
check_interval = "20m"

# Per-request timeout when fetching feeds
request_timeout = "10s"

[delivery]
# Webhook receiving one message per new entry (required)
webhook_url = ""

# Webhook receiving the "check complete" message after every cycle.
# Defaults to webhook_url.
# completion_webhook_url = ""

# Minimum pause between two sends
send_interval = "5s"

# Wait used when a rate-limited response carries no Retry-After
default_retry_after = "10s"

# Give up on a notification after this many rate-limited attempts.
# Unset: retry forever.
# max_throttle_retries = 20

request_timeout = "10s"
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("{0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let config =
            Config::from_toml(Config::default_config_content()).expect("Default config should be valid TOML");

        assert_eq!(config.feeds.list_file, PathBuf::from("rss.txt"));
        assert_eq!(config.feeds.check_interval, Duration::from_secs(1200));
        assert_eq!(config.delivery.send_interval, Duration::from_secs(5));
        assert_eq!(config.delivery.max_throttle_retries, None);
    }

    #[test]
    fn test_default_config_needs_webhook() {
        let config = Config::from_toml(Config::default_config_content()).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("delivery.webhook_url"))
        ));
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[feeds]
check_interval = 90

[delivery]
webhook_url = "https://hooks.example/abc"
send_interval = "2s"
max_throttle_retries = 3
"##;
        let config = Config::from_toml(content).expect("Partial config should work");

        assert_eq!(config.feeds.check_interval, Duration::from_secs(90));
        assert_eq!(config.feeds.seen_file, PathBuf::from("seen_entries.txt"));
        assert_eq!(config.delivery.send_interval, Duration::from_secs(2));
        assert_eq!(config.delivery.max_throttle_retries, Some(3));
        assert_eq!(config.delivery.default_retry_after, Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_toml("").expect("Empty config should work");
        assert_eq!(config.feeds.request_timeout, Duration::from_secs(10));
        assert!(config.delivery.webhook_url.is_empty());
    }

    #[test]
    fn test_bad_interval_is_rejected() {
        assert!(Config::from_toml("[feeds]\ncheck_interval = \"soon\"\n").is_err());
    }

    #[test]
    fn test_zero_check_interval_is_invalid() {
        let config = Config::from_toml(
            "[feeds]\ncheck_interval = 0\n[delivery]\nwebhook_url = \"https://h.example\"\n",
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_completion_url_falls_back() {
        let mut delivery = DeliveryConfig {
            webhook_url: "https://hooks.example/main".into(),
            ..DeliveryConfig::default()
        };
        assert_eq!(delivery.completion_url(), "https://hooks.example/main");

        delivery.completion_webhook_url = Some("https://hooks.example/ok".into());
        assert_eq!(delivery.completion_url(), "https://hooks.example/ok");
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.toml");
        fs::write(&path, "[delivery]\nwebhook_url = \"https://h.example\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.delivery.webhook_url, "https://h.example");

        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Config::load(Some(&missing)),
            Err(ConfigError::Io { .. })
        ));
    }
}
