// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! [`Config`] struct built from them at startup. Nothing else in the crate
//! reads the process environment; handlers receive their configuration
//! through [`crate::state::AppState`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | Secret used to sign login tokens, also tried second on verify | unset |
//! | `NEXTAUTH_SECRET` | Secret of the external session issuer, tried first on verify | unset |
//! | `NEXTAUTH_URL` | Frontend URL whose origin is allowed by CORS | unset |
//! | `CORS_ALLOWED_ORIGINS` | Comma-separated list of extra allowed origins | unset |
//! | `HOST` | Server bind host, an IP address or a hostname | `0.0.0.0` |
//! | `PORT` | Server bind port | `4000` |
//! | `MEME_API_URL` | Upstream meme endpoint | `https://meme-api.com/gimme` |
//! | `MEME_API_TIMEOUT_SECS` | Upstream request timeout | `10` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//!
//! Malformed entries in `NEXTAUTH_URL` and `CORS_ALLOWED_ORIGINS` only affect
//! CORS, so they are logged and skipped instead of failing startup.

use std::time::Duration;

use url::Url;

use crate::auth::TokenConfig;

/// Secret used to sign tokens issued by the login endpoint.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Secret shared with the external session issuer (NextAuth).
///
/// Tokens are verified against this secret before falling back to
/// [`JWT_SECRET_ENV`].
pub const NEXTAUTH_SECRET_ENV: &str = "NEXTAUTH_SECRET";

/// Public URL of the frontend. Its origin is added to the CORS allow-list.
pub const NEXTAUTH_URL_ENV: &str = "NEXTAUTH_URL";

pub const CORS_ALLOWED_ORIGINS_ENV: &str = "CORS_ALLOWED_ORIGINS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const MEME_API_URL_ENV: &str = "MEME_API_URL";
pub const MEME_API_TIMEOUT_ENV: &str = "MEME_API_TIMEOUT_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_MEME_API_URL: &str = "https://meme-api.com/gimme";
pub const DEFAULT_MEME_API_TIMEOUT: Duration = Duration::from_secs(10);

/// Default `RUST_LOG` filter when the variable is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Origins allowed for local frontend development.
pub const DEV_ORIGINS: [&str; 2] = ["http://localhost:3000", "https://localhost:3000"];

/// Host suffix of preview and production deployments.
pub const DEPLOYMENT_HOST_SUFFIX: &str = ".vercel.app";

/// Configuration errors raised while reading the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a valid port number, got {value:?}")]
    InvalidPort { name: &'static str, value: String },

    #[error("{name} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { name: &'static str, value: String },

    #[error("{name} must be an absolute URL: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("{name} must be `json` or `pretty`, got {value:?}")]
    InvalidLogFormat { name: &'static str, value: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// Read [`LOG_FORMAT_ENV`] on its own, so logging can start before the
    /// rest of the configuration is loaded.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::parse(std::env::var(LOG_FORMAT_ENV).ok())
    }

    fn parse(value: Option<String>) -> Result<Self, ConfigError> {
        let Some(value) = value.filter(|value| !value.trim().is_empty()) else {
            return Ok(Self::default());
        };
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            _ => Err(ConfigError::InvalidLogFormat {
                name: LOG_FORMAT_ENV,
                value,
            }),
        }
    }
}

/// A single CORS origin rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginRule {
    /// Matches one serialized origin exactly, e.g. `http://localhost:3000`.
    Exact(String),
    /// Matches any origin whose host ends with the suffix, e.g. `.vercel.app`.
    HostSuffix(String),
}

impl OriginRule {
    pub fn matches(&self, origin: &str) -> bool {
        match self {
            OriginRule::Exact(allowed) => allowed == origin,
            OriginRule::HostSuffix(suffix) => Url::parse(origin)
                .ok()
                .and_then(|url| url.host_str().map(|host| host.ends_with(suffix.as_str())))
                .unwrap_or(false),
        }
    }
}

/// Cross-origin policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    pub rules: Vec<OriginRule>,
}

impl CorsConfig {
    pub fn allows(&self, origin: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(origin))
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        let mut rules: Vec<OriginRule> = DEV_ORIGINS
            .iter()
            .map(|origin| OriginRule::Exact((*origin).to_string()))
            .collect();
        rules.push(OriginRule::HostSuffix(DEPLOYMENT_HOST_SUFFIX.to_string()));
        Self { rules }
    }
}

/// Upstream meme API settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemeApiConfig {
    pub url: String,
    pub timeout: Duration,
}

impl Default for MemeApiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_MEME_API_URL.to_string(),
            timeout: DEFAULT_MEME_API_TIMEOUT,
        }
    }
}

/// Full service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    pub tokens: TokenConfig,
    pub cors: CorsConfig,
    pub meme_api: MemeApiConfig,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match get(PORT_ENV) {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidPort {
                name: PORT_ENV,
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let log_format = LogFormat::parse(get(LOG_FORMAT_ENV))?;

        let signing_secret = get(JWT_SECRET_ENV);
        let verification_secrets = [get(NEXTAUTH_SECRET_ENV), signing_secret.clone()]
            .into_iter()
            .flatten()
            .collect();
        let tokens = TokenConfig {
            signing_secret,
            verification_secrets,
        };

        let mut cors = CorsConfig::default();
        if let Some(frontend) = get(NEXTAUTH_URL_ENV) {
            if let Some(origin) = origin_of(NEXTAUTH_URL_ENV, frontend.trim()) {
                cors.rules.push(OriginRule::Exact(origin));
            }
        }
        if let Some(extra) = get(CORS_ALLOWED_ORIGINS_ENV) {
            for entry in extra.split(',').map(str::trim).filter(|e| !e.is_empty()) {
                if let Some(origin) = origin_of(CORS_ALLOWED_ORIGINS_ENV, entry) {
                    cors.rules.push(OriginRule::Exact(origin));
                }
            }
        }

        let mut meme_api = MemeApiConfig::default();
        if let Some(value) = get(MEME_API_URL_ENV) {
            Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl {
                name: MEME_API_URL_ENV,
                source,
            })?;
            meme_api.url = value.trim().to_string();
        }
        if let Some(value) = get(MEME_API_TIMEOUT_ENV) {
            let secs: u64 = value
                .trim()
                .parse()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout {
                    name: MEME_API_TIMEOUT_ENV,
                    value: value.clone(),
                })?;
            meme_api.timeout = Duration::from_secs(secs);
        }

        Ok(Self {
            host,
            port,
            log_format,
            tokens,
            cors,
            meme_api,
        })
    }

    /// Host and port for the listener, resolved at bind time so hostnames
    /// and IPv6 literals both work.
    pub fn bind_target(&self) -> (&str, u16) {
        (self.host.trim(), self.port)
    }
}

/// ASCII serialization of `raw`'s origin. Unparseable URLs and opaque
/// origins are logged and yield `None`.
fn origin_of(name: &'static str, raw: &str) -> Option<String> {
    let origin = match Url::parse(raw) {
        Ok(url) => url.origin(),
        Err(e) => {
            tracing::warn!(variable = name, value = raw, error = %e, "ignoring malformed CORS origin");
            return None;
        }
    };
    if !origin.is_tuple() {
        tracing::warn!(variable = name, value = raw, "ignoring opaque CORS origin");
        return None;
    }
    Some(origin.ascii_serialization())
}
