use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Approval state of a dataset. Only `Draft → Approved` is ever applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetStatus {
    Draft,
    Approved,
}

impl std::fmt::Display for DatasetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Approved => write!(f, "approved"),
        }
    }
}

impl std::str::FromStr for DatasetStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "approved" => Ok(Self::Approved),
            other => Err(format!("unknown dataset status: {other}")),
        }
    }
}

/// A persisted dataset record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// UUIDv7 primary key.
    pub id: String,
    pub title: String,
    /// Username of the uploader.
    pub owner: String,
    /// SHA-256 hex of the uploaded bytes. Equal hashes mean identical content.
    pub content_hash: String,
    pub status: DatasetStatus,
    /// RFC 3339 UTC, microsecond precision.
    pub created_at: String,
    pub updated_at: String,
}

/// Fields supplied when a dataset is uploaded. New datasets start as drafts.
#[derive(Debug, Clone)]
pub struct NewDataset {
    pub title: String,
    pub owner: String,
    pub content_hash: String,
}

impl NewDataset {
    pub fn new(
        title: impl Into<String>,
        owner: impl Into<String>,
        content_hash: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            owner: owner.into(),
            content_hash: content_hash.into(),
        }
    }
}

/// Format a timestamp the way the store persists it.
///
/// Fixed width (always six fractional digits, `Z` suffix) so that string
/// comparison in SQL agrees with chronological order.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}
