//! `neurodata-datasets` — the dataset record store and its maintenance
//! operations: bulk approval, duplicate detection and cleanup, paginated
//! listing.

pub mod db;
pub mod dedup;
pub mod error;
pub mod hash;
pub mod pagination;
pub mod store;
pub mod types;

pub use dedup::{find_duplicates, CleanupMode, Duplicate, DuplicateReport};
pub use error::{DatasetError, Result};
pub use pagination::{Page, PageRequest, PaginationPreset};
pub use store::{ApprovalSummary, DatasetStore};
pub use types::{Dataset, DatasetStatus, NewDataset};
