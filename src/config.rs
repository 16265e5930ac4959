//! Configuration loading and constants.
//!
//! All runtime configuration comes from environment variables and is read once at
//! startup into an immutable [`AppConfig`]. Missing variables fall back to documented
//! defaults; only a malformed `PORT` is fatal.

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::downward::EnvSource;

// =============================================================================
// Environment Variable Names
// =============================================================================

pub const ENV_DEBUG: &str = "DEBUG";
pub const ENV_VERSION: &str = "MY_VERSION";
pub const ENV_BUILD_TIME: &str = "MY_BUILDTIME";
pub const ENV_APP_CONTEXT: &str = "APP_CONTEXT";
pub const ENV_PORT: &str = "PORT";

// =============================================================================
// Defaults
// =============================================================================

/// Value reported for any unset string setting
pub const DEFAULT_VALUE: &str = "none";

/// Path prefix served when APP_CONTEXT is unset
pub const DEFAULT_APP_CONTEXT: &str = "/";

pub const DEFAULT_PORT: u16 = 8000;

/// All interfaces; TLS and exposure are left to the ingress in front of the pod
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Mount point of the Downward API volume
pub const PODINFO_DIR: &str = "/etc/podinfo/";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "podprobe=info,tower_http=info";

/// Log filter used when DEBUG is truthy
pub const DEBUG_LOG_FILTER: &str = "podprobe=debug,tower_http=debug";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Seconds in-flight requests get to finish once shutdown starts
pub const SHUTDOWN_GRACE_SECS: u64 = 30;

/// Diagnostic output reflects live state and must never be cached upstream
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Build version exposed on /healthz
    pub version: String,
    /// Build timestamp exposed on /healthz
    pub build_time: String,
    /// Required prefix for every introspection request path
    pub app_context: String,
    pub host: IpAddr,
    pub port: u16,
    pub debug: bool,
    /// Directory scanned for Downward API files on every report
    pub podinfo_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_VALUE.to_string(),
            build_time: DEFAULT_VALUE.to_string(),
            app_context: DEFAULT_APP_CONTEXT.to_string(),
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            debug: false,
            podinfo_dir: PathBuf::from(PODINFO_DIR),
        }
    }
}

impl AppConfig {
    /// Build the configuration from an environment source.
    pub fn from_env(env: &dyn EnvSource) -> Result<Self, ConfigError> {
        let port = match env.var(ENV_PORT) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            version: env
                .var(ENV_VERSION)
                .unwrap_or_else(|| DEFAULT_VALUE.to_string()),
            build_time: env
                .var(ENV_BUILD_TIME)
                .unwrap_or_else(|| DEFAULT_VALUE.to_string()),
            app_context: env
                .var(ENV_APP_CONTEXT)
                .unwrap_or_else(|| DEFAULT_APP_CONTEXT.to_string()),
            port,
            // Any non-empty value counts, "false" and "0" included
            debug: env.var(ENV_DEBUG).is_some_and(|v| !v.is_empty()),
            ..Self::default()
        })
    }

    /// Log filter to use when neither the CLI nor RUST_LOG provide one.
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            DEBUG_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value: {0:?}")]
    InvalidPort(String),
}
