//! Environment variable configuration
//!
//! Provides `RUNT_*` overrides for configuration.

use std::env;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "RUNT";

/// Overrides read from the environment
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnvConfig {
    /// Concurrency ceiling from RUNT_CONCURRENT
    pub concurrent: Option<usize>,
    /// Event source label from RUNT_SOURCE
    pub source: Option<String>,
    /// Output format from RUNT_FORMAT
    pub format: Option<String>,
    /// Log level from RUNT_LOG
    pub log_level: Option<String>,
    /// Config file from RUNT_CONFIG
    pub config_file: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}_{name}"));

        Self {
            concurrent: get("CONCURRENT").and_then(|v| v.parse().ok()),
            source: get("SOURCE"),
            format: get("FORMAT"),
            log_level: get("LOG"),
            config_file: get("CONFIG"),
        }
    }
}
