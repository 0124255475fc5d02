//! `neurodata-core` — configuration and shared error types for the NeuroData
//! operations workspace.

pub mod config;
pub mod error;
pub mod types;

pub use config::NeuroConfig;
pub use error::{NeuroError, Result};
pub use types::Environment;
