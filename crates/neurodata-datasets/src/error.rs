use thiserror::Error;

/// Errors that can occur during dataset store operations.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// A SQLite operation failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The requested dataset does not exist.
    #[error("dataset not found: {id}")]
    NotFound { id: String },

    /// The requested page is outside `1..=total_pages`.
    #[error("invalid page {page}: expected 1..={total_pages}")]
    InvalidPage { page: u32, total_pages: u32 },

    /// A stored status string could not be parsed.
    #[error("invalid dataset status: {0}")]
    InvalidStatus(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DatasetError>;
