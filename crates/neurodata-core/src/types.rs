use serde::{Deserialize, Serialize};
use std::fmt;

/// Deployment environment. Drives defaults that differ between a developer
/// laptop and a production host (log verbosity, mostly).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    /// Default `tracing` filter when neither `RUST_LOG` nor `logging.filter` is set.
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Environment::Development => "neurodata=debug,neurodata_datasets=debug,neurodata_scheduler=debug",
            Environment::Production => "neurodata=info,neurodata_datasets=info,neurodata_scheduler=info",
            Environment::Testing => "warn",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}
