//! Configuration loading and typed config structures for the Pulse backend.
//!
//! The configuration lives in `pulse-config.yaml` at the working
//! directory root (or wherever `PULSE_CONFIG` points). Every field has a
//! default, so a missing file or an empty document yields a runnable
//! configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "pulse-config.yaml";

/// Environment variable naming an alternate configuration file.
pub const CONFIG_PATH_ENV: &str = "PULSE_CONFIG";

/// Largest accepted `broadcast.lookback_days`.
///
/// Matches the widest span `/post/mock/` will generate, so the default
/// mock range and every broadcast dataset stay within it.
pub const MAX_LOOKBACK_DAYS: u32 = 366;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value for {name}: {reason}")]
    InvalidOverride {
        /// The environment variable name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A value parsed but is outside its accepted range.
    #[error("invalid {field}: {reason}")]
    OutOfRange {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level backend configuration.
///
/// Mirrors the structure of `pulse-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PulseConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Upstream post-listing service.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Mock data broadcast settings.
    #[serde(default)]
    pub broadcast: BroadcastConfig,
}

impl PulseConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `PULSE_UPSTREAM_URL` overrides `upstream.base_url`
    /// - `PULSE_PORT` overrides `server.port`
    /// - `PULSE_BROADCAST_INTERVAL_SECS` overrides `broadcast.interval_secs`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML,
    /// [`ConfigError::InvalidOverride`] if an override is malformed, or
    /// [`ConfigError::OutOfRange`] if the result fails [`PulseConfig::validate`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse_yaml(&contents)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise start from defaults.
    /// Environment overrides apply either way.
    ///
    /// # Errors
    ///
    /// Same as [`PulseConfig::from_file`].
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        tracing::info!(path = %path.display(), "Config file not found, using defaults");
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall or overload the server.
    ///
    /// - `upstream.timeout_ms` must be positive
    /// - `broadcast.interval_secs` must be positive
    /// - `broadcast.lookback_days` must not exceed [`MAX_LOOKBACK_DAYS`]
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.timeout_ms == 0 {
            return Err(ConfigError::OutOfRange {
                field: "upstream.timeout_ms",
                reason: String::from("must be greater than 0"),
            });
        }
        if self.broadcast.interval_secs == 0 {
            return Err(ConfigError::OutOfRange {
                field: "broadcast.interval_secs",
                reason: String::from("must be greater than 0"),
            });
        }
        if self.broadcast.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(ConfigError::OutOfRange {
                field: "broadcast.lookback_days",
                reason: format!(
                    "{} exceeds the maximum of {MAX_LOOKBACK_DAYS}",
                    self.broadcast.lookback_days
                ),
            });
        }
        Ok(())
    }

    /// Parse configuration from a YAML string without consulting the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml treats an empty document as null.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] if a numeric override
    /// does not parse.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] if a numeric override
    /// does not parse.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("PULSE_UPSTREAM_URL") {
            self.upstream.base_url = val;
        }
        if let Some(val) = lookup("PULSE_PORT") {
            self.server.port = parse_override("PULSE_PORT", &val)?;
        }
        if let Some(val) = lookup("PULSE_BROADCAST_INTERVAL_SECS") {
            self.broadcast.interval_secs = parse_override("PULSE_BROADCAST_INTERVAL_SECS", &val)?;
        }
        Ok(())
    }
}

fn parse_override<T>(name: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidOverride {
            name: name.to_owned(),
            reason: format!("{raw:?}: {e}"),
        })
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Upstream post-listing service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL, without the `/post/list/` path.
    #[serde(default = "default_upstream_url")]
    pub base_url: String,

    /// Whole-request timeout in milliseconds.
    #[serde(default = "default_upstream_timeout_ms")]
    pub timeout_ms: u64,
}

impl UpstreamConfig {
    /// The request timeout as a [`Duration`].
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_upstream_url(),
            timeout_ms: default_upstream_timeout_ms(),
        }
    }
}

/// Broadcast loop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BroadcastConfig {
    /// Seconds between `data_update` emissions.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Days of history each generated dataset covers.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
}

impl BroadcastConfig {
    /// The emission period as a [`Duration`].
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            lookback_days: default_lookback_days(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    5000
}

fn default_upstream_url() -> String {
    "http://192.168.100.35:8051".to_owned()
}

const fn default_upstream_timeout_ms() -> u64 {
    10_000
}

const fn default_interval_secs() -> u64 {
    30
}

const fn default_lookback_days() -> u32 {
    30
}
