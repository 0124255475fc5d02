use std::collections::HashMap;

use serde::Serialize;

use crate::types::Dataset;

/// Whether a cleanup pass only reports duplicates or also deletes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupMode {
    /// Read-only; the store is never mutated.
    Report,
    /// Delete every reported duplicate in the same transaction as the scan.
    Commit,
}

/// A dataset whose content hash repeats an earlier-created one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Duplicate {
    pub dataset: Dataset,
    /// Id of the earliest dataset carrying the same hash. Never deleted.
    pub canonical_id: String,
}

/// Outcome of a duplicate scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DuplicateReport {
    /// Number of datasets visited.
    pub scanned: usize,
    /// Duplicates in scan order (oldest duplicate first).
    pub duplicates: Vec<Duplicate>,
    /// Rows actually deleted. Always 0 in report mode.
    pub deleted: usize,
}

impl DuplicateReport {
    pub fn is_empty(&self) -> bool {
        self.duplicates.is_empty()
    }
}

/// Walk `datasets` in the given order and collect every record whose
/// `content_hash` was already seen.
///
/// The caller supplies ascending creation order; the first record of each
/// hash group is canonical and never appears in the output.
pub fn find_duplicates<I>(datasets: I) -> (usize, Vec<Duplicate>)
where
    I: IntoIterator<Item = Dataset>,
{
    // hash -> canonical id
    let mut seen: HashMap<String, String> = HashMap::new();
    let mut duplicates = Vec::new();
    let mut scanned = 0;

    for dataset in datasets {
        scanned += 1;
        match seen.get(&dataset.content_hash) {
            Some(canonical) => {
                let canonical_id = canonical.clone();
                duplicates.push(Duplicate {
                    dataset,
                    canonical_id,
                });
            }
            None => {
                seen.insert(dataset.content_hash.clone(), dataset.id.clone());
            }
        }
    }

    (scanned, duplicates)
}
