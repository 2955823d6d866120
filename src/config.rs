//! Process configuration, loaded once at startup from the environment.
//!
//! `.env` files are honoured through `dotenvy`. Everything downstream receives
//! explicit config values instead of reading the environment itself.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

pub const API_KEY_VAR: &str = "NEWS_API_KEY";
pub const BASE_URL_VAR: &str = "NEWS_API_BASE_URL";
pub const TIMEOUT_VAR: &str = "NEWS_API_TIMEOUT_SECS";
pub const TRANSPORT_VAR: &str = "MCP_TRANSPORT";
pub const HTTP_BIND_VAR: &str = "MCP_HTTP_BIND";

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HTTP_BIND: &str = "127.0.0.1:8080";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing {0} environment variable")]
    Missing(&'static str),
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Settings for the upstream news service.
#[derive(Clone)]
pub struct NewsApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl NewsApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source, so tests don't
    /// have to mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::Missing(API_KEY_VAR))?;

        let mut config = Self::new(api_key);

        if let Some(base_url) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(base_url.trim());
        }

        if let Some(raw) = lookup(TIMEOUT_VAR).filter(|v| !v.trim().is_empty()) {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: TIMEOUT_VAR,
                reason: format!("'{}' is not a whole number of seconds", raw),
            })?;
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    var: TIMEOUT_VAR,
                    reason: "timeout must be greater than zero".to_string(),
                });
            }
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

// Hand-written so the key never lands in a log line.
impl std::fmt::Debug for NewsApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsApiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Stdio,
    Http(SocketAddr),
}

/// Settings for the MCP front end.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub transport: Transport,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let transport = match lookup(TRANSPORT_VAR)
            .map(|v| v.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("") | Some("stdio") => Transport::Stdio,
            Some("http") => {
                let raw = lookup(HTTP_BIND_VAR)
                    .filter(|v| !v.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_HTTP_BIND.to_string());
                let addr = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    var: HTTP_BIND_VAR,
                    reason: format!("'{}' is not a socket address", raw),
                })?;
                Transport::Http(addr)
            }
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: TRANSPORT_VAR,
                    reason: format!("unknown transport '{}' (expected stdio or http)", other),
                })
            }
        };

        Ok(Self { transport })
    }
}
