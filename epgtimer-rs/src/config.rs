//! Configuration file loading and settings resolution.
//!
//! Values are resolved once per invocation, in this order:
//! command-line flag, environment variable, config file, built-in default.
//! The flag/environment step is handled by clap before we get here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::context::GlobalArgs;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "epgtimer.toml";

/// Channel list read by `epg --all-channels` when nothing else is configured.
pub const DEFAULT_CHANNEL_LIST: &str = "serviceList_without_local.txt";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

pub const ENDPOINT_ENV: &str = "EMWUI_ENDPOINT";

/// Configuration errors. All of them are raised before any network call.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// No endpoint from the flag, the environment or the config file.
    #[error("EMWUI endpoint not configured")]
    MissingEndpoint,

    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// `--timeout` or `timeout_secs` was 0.
    #[error("invalid timeout {0}s: must be at least 1 second")]
    InvalidTimeout(u64),
}

/// Configuration file format.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub epg: EpgSection,
}

#[derive(Debug, Deserialize, Default)]
pub struct ServerSection {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct LoggingSection {
    pub level: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct EpgSection {
    pub channel_list: Option<String>,
}

impl ConfigFile {
    pub fn from_toml(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

/// Load the config file: explicit path > auto-detect > default.
///
/// Returns the path that was actually read, if any.
pub fn load_config(explicit: Option<&Path>) -> Result<(Option<PathBuf>, ConfigFile), ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default_path.exists() {
                return Ok((None, ConfigFile::default()));
            }
            default_path
        }
    };

    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let config = ConfigFile::from_toml(&contents, &path)?;
    Ok((Some(path), config))
}

/// Settings shared by every command handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base URL without a trailing slash.
    pub endpoint: String,
    pub timeout: Duration,
    /// Channel list used by `epg --all-channels` unless overridden.
    pub channel_list: PathBuf,
}

impl Settings {
    pub fn resolve(args: &GlobalArgs, file: &ConfigFile) -> Result<Self, ConfigError> {
        let endpoint = non_empty(args.endpoint.as_deref())
            .or_else(|| non_empty(file.server.endpoint.as_deref()))
            .ok_or(ConfigError::MissingEndpoint)?;
        let endpoint = normalize_endpoint(endpoint)?;

        let timeout_secs = args
            .timeout
            .or(file.server.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(timeout_secs));
        }

        let channel_list = PathBuf::from(
            file.epg
                .channel_list
                .as_deref()
                .unwrap_or(DEFAULT_CHANNEL_LIST),
        );

        Ok(Self {
            endpoint,
            timeout: Duration::from_secs(timeout_secs),
            channel_list,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn normalize_endpoint(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEndpoint {
        endpoint: raw.to_string(),
        reason,
    };

    let url = reqwest::Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(raw.trim_end_matches('/').to_string())
}
