//! Configuration module
//!
//! Settings come from, in rising precedence: built-in defaults, a config
//! file, `RUNT_*` environment variables, and command-line flags.

mod env;

pub use env::{EnvConfig, ENV_PREFIX};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::executor::DEFAULT_MAX_CONCURRENT;
use crate::output::{OutputFormat, DEFAULT_SOURCE};
use crate::utils::LogLevel;

/// Config file locations relative to the working directory, in order
const LOCAL_CONFIG_FILES: &[&str] = &["./runt.yaml", "./runt.yml", "./.runt.yaml"];

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Maximum children running at once
    pub max_concurrent: usize,

    /// `@source` label on every event
    pub source: String,

    /// Output format (json, summary)
    pub format: String,

    /// Log level for diagnostics on stderr
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            source: DEFAULT_SOURCE.to_string(),
            format: "json".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml_file(path) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// First existing config file in the standard locations
    pub fn find() -> Option<PathBuf> {
        LOCAL_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .chain(dirs::config_dir().map(|d| d.join("runt").join("config.yaml")))
            .find(|p| p.exists())
    }

    /// Load from `path`, or from the first standard location, or defaults
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path.map(Path::to_path_buf).or_else(Self::find) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Overlay any values set in the environment
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(n) = env.concurrent {
            self.max_concurrent = n;
        }
        if let Some(ref source) = env.source {
            self.source = source.clone();
        }
        if let Some(ref format) = env.format {
            self.format = format.clone();
        }
        if let Some(ref level) = env.log_level {
            self.log_level = level.clone();
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent == 0 {
            bail!("max_concurrent must be at least 1");
        }
        if OutputFormat::from_str(&self.format).is_none() {
            bail!("Unknown output format: {}", self.format);
        }
        if LogLevel::from_str(&self.log_level).is_none() {
            bail!("Unknown log level: {}", self.log_level);
        }
        Ok(())
    }

    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from_str(&self.format).unwrap_or(OutputFormat::Json)
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_str(&self.log_level).unwrap_or(LogLevel::Warn)
    }
}

fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}
