use thiserror::Error;

#[derive(Debug, Error)]
pub enum NeuroError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found: {path}")]
    ConfigNotFound { path: String },
}

impl NeuroError {
    /// Short machine-readable code, used as a structured log field.
    pub fn code(&self) -> &'static str {
        match self {
            NeuroError::Config(_) => "CONFIG_ERROR",
            NeuroError::ConfigNotFound { .. } => "CONFIG_NOT_FOUND",
        }
    }
}

pub type Result<T> = std::result::Result<T, NeuroError>;
