//! Startup configuration.
//!
//! Read once from the environment in `main` and passed down explicitly. The
//! prediction server address is never inferred at runtime from anything other
//! than this value.

use std::path::PathBuf;
use std::time::Duration;

/// Fallback server address when neither the runtime nor the build
/// environment provides one.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Server address baked in at build time, if the builder set one.
pub const BUILD_API_URL: Option<&str> = option_env!("AMDSCREEN_API_URL");

const DEFAULT_LOG_FILE: &str = "amdscreen.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when attached to a terminal, stdout otherwise
    Auto,
    File,
    Stdout,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid AMDSCREEN_API_URL {value:?}: {reason}")]
    InvalidApiUrl { value: String, reason: String },

    #[error("invalid AMDSCREEN_REQUEST_TIMEOUT_SECS {0:?}: expected a positive number of seconds")]
    InvalidTimeout(String),

    #[error("invalid AMDSCREEN_LOG_MODE {0:?}: expected auto, file or stdout")]
    InvalidLogMode(String),
}

/// Resolved startup configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the prediction server, without trailing slash
    pub api_url: String,
    /// Per-request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Config {
    /// Read configuration from process environment variables.
    ///
    /// # Errors
    /// Returns error if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns error if a variable is set to an unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup("AMDSCREEN_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| BUILD_API_URL.unwrap_or(DEFAULT_API_URL).to_string());
        let api_url = normalize_api_url(&raw_url)?;

        let request_timeout = match lookup("AMDSCREEN_REQUEST_TIMEOUT_SECS") {
            Some(raw) if !raw.trim().is_empty() => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|&s| s > 0)
                    .ok_or_else(|| ConfigError::InvalidTimeout(raw.clone()))?;
                Some(Duration::from_secs(secs))
            }
            _ => None,
        };

        let log_mode = match lookup("AMDSCREEN_LOG_MODE").as_deref().map(str::trim) {
            None | Some("") | Some("auto") => LogMode::Auto,
            Some("file") => LogMode::File,
            Some("stdout") => LogMode::Stdout,
            Some(other) => return Err(ConfigError::InvalidLogMode(other.to_string())),
        };

        let log_file = lookup("AMDSCREEN_LOG_FILE")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from);

        Ok(Self {
            api_url,
            request_timeout,
            log_mode,
            log_file,
        })
    }

    /// Absolute URL of an endpoint path such as `/api/predict`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        join_endpoint(&self.api_url, path)
    }
}

pub(crate) fn join_endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base, path.trim_start_matches('/'))
}

fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = reqwest::Url::parse(trimmed).map_err(|e| ConfigError::InvalidApiUrl {
        value: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidApiUrl {
            value: raw.to_string(),
            reason: format!("unsupported scheme {:?}", parsed.scheme()),
        });
    }

    Ok(trimmed.to_string())
}
