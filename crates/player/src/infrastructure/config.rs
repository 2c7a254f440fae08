//! Player configuration from the environment
//!
//! Numbers that fail to parse fall back to their defaults with a warning. A towns
//! service URL that does not parse is a hard error: there is nothing sensible to
//! connect to instead.

use std::time::Duration;

use url::Url;

pub const TOWNS_SERVICE_URL_VAR: &str = "COVEY_TOWNS_SERVICE_URL";
pub const LISTING_REFRESH_MS_VAR: &str = "COVEY_LISTING_REFRESH_MS";
pub const REQUEST_TIMEOUT_MS_VAR: &str = "COVEY_REQUEST_TIMEOUT_MS";
pub const USER_NAME_VAR: &str = "COVEY_USER_NAME";
pub const TOWN_ID_VAR: &str = "COVEY_TOWN_ID";

/// Default towns service address.
pub const DEFAULT_TOWNS_SERVICE_URL: &str = "http://localhost:8081";

/// Default listing poll interval in milliseconds
pub const DEFAULT_LISTING_REFRESH_MS: u64 = 2_000;

/// Default request timeout in milliseconds (2 minutes)
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 120_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid URL ({value}): {reason}")]
    InvalidUrl {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error("{var} must be an http or https URL, got {scheme}")]
    UnsupportedScheme { var: &'static str, scheme: String },
}

/// Join to run once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoJoin {
    pub user_name: String,
    pub town_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerConfig {
    pub towns_service_url: Url,
    pub listing_refresh: Duration,
    pub request_timeout: Duration,
    pub auto_join: Option<AutoJoin>,
}

impl PlayerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = lookup(TOWNS_SERVICE_URL_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_TOWNS_SERVICE_URL.to_string());
        let towns_service_url = parse_url(TOWNS_SERVICE_URL_VAR, &raw_url)?;

        let listing_refresh = Duration::from_millis(millis(
            &lookup,
            LISTING_REFRESH_MS_VAR,
            DEFAULT_LISTING_REFRESH_MS,
        ));
        let request_timeout = Duration::from_millis(millis(
            &lookup,
            REQUEST_TIMEOUT_MS_VAR,
            DEFAULT_REQUEST_TIMEOUT_MS,
        ));

        let auto_join = match (lookup(USER_NAME_VAR), lookup(TOWN_ID_VAR)) {
            (Some(user_name), Some(town_id)) => Some(AutoJoin { user_name, town_id }),
            _ => None,
        };

        Ok(Self {
            towns_service_url,
            listing_refresh,
            request_timeout,
            auto_join,
        })
    }
}

fn parse_url(var: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme {
            var,
            scheme: other.to_string(),
        }),
    }
}

fn millis(lookup: &impl Fn(&str) -> Option<String>, var: &str, default: u64) -> u64 {
    let Some(raw) = lookup(var) else {
        return default;
    };
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => value,
        _ => {
            tracing::warn!(var, value = %raw, default, "Ignoring invalid duration");
            default
        }
    }
}
