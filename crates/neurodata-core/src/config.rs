use std::path::Path;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{NeuroError, Result};
use crate::types::Environment;

pub const DEFAULT_TICK_SECS: u64 = 1;
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;
pub const ENV_PREFIX: &str = "NEURODATA_";

/// Top-level config (neurodata.toml + NEURODATA_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NeuroConfig {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// How often the engine checks the periodic table for due jobs.
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
    /// Capacity of the fired-job channel. A full channel drops fires.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_secs: DEFAULT_TICK_SECS,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Explicit `tracing` filter. Falls back to the environment's default.
    pub filter: Option<String>,
}

fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.neurodata/neurodata.db", home)
}
fn default_tick_secs() -> u64 {
    DEFAULT_TICK_SECS
}
fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

impl NeuroConfig {
    /// Load config from a TOML file with NEURODATA_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.neurodata/neurodata.toml
    ///
    /// A missing file is [`NeuroError::ConfigNotFound`].
    /// Nested keys use a double underscore: `NEURODATA_SCHEDULER__TICK_SECS=5`.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);
        Self::load_file(&path)
    }

    /// Like [`load`](Self::load), but a missing *default* file falls back to
    /// env-only config. The not-found error is returned alongside so the
    /// caller can warn about it. An explicit path must exist.
    pub fn load_or_default(config_path: Option<&str>) -> Result<(Self, Option<NeuroError>)> {
        Self::resolve(config_path, &default_config_path())
    }

    fn resolve(explicit: Option<&str>, default_path: &str) -> Result<(Self, Option<NeuroError>)> {
        if let Some(path) = explicit {
            return Ok((Self::load_file(path)?, None));
        }
        match Self::load_file(default_path) {
            Ok(config) => Ok((config, None)),
            Err(e @ NeuroError::ConfigNotFound { .. }) => {
                Ok((Self::from_figment(Figment::new().merge(env_overrides()))?, Some(e)))
            }
            Err(e) => Err(e),
        }
    }

    fn load_file(path: &str) -> Result<Self> {
        // Toml::file treats a missing file as empty
        if !Path::new(path).is_file() {
            return Err(NeuroError::ConfigNotFound {
                path: path.to_string(),
            });
        }
        Self::from_figment(
            Figment::new()
                .merge(Toml::file(path))
                .merge(env_overrides()),
        )
    }

    /// Extract and validate a config from an already-assembled figment.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: NeuroConfig = figment
            .extract()
            .map_err(|e| NeuroError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.scheduler.tick_secs == 0 {
            return Err(NeuroError::Config(
                "scheduler.tick_secs must be at least 1".to_string(),
            ));
        }
        if self.scheduler.channel_capacity == 0 {
            return Err(NeuroError::Config(
                "scheduler.channel_capacity must be at least 1".to_string(),
            ));
        }
        if self.database.path.trim().is_empty() {
            return Err(NeuroError::Config("database.path is empty".to_string()));
        }
        Ok(())
    }

    /// The `tracing` filter to install when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> String {
        self.logging
            .filter
            .clone()
            .unwrap_or_else(|| self.environment.default_log_filter().to_string())
    }
}

fn env_overrides() -> Env {
    Env::prefixed(ENV_PREFIX).split("__")
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.neurodata/neurodata.toml", home)
}
