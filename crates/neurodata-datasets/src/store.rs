use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior};
use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::dedup::{find_duplicates, CleanupMode, DuplicateReport};
use crate::error::{DatasetError, Result};
use crate::pagination::{Page, PageRequest};
use crate::types::{format_timestamp, Dataset, DatasetStatus, NewDataset};

const DATASET_COLUMNS: &str =
    "id, title, owner, content_hash, status, created_at, updated_at";

/// Result of a bulk approval pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApprovalSummary {
    /// Drafts matching the filter when the pass started.
    pub found: usize,
    /// Rows moved to `approved`.
    pub approved: usize,
}

/// Thread-safe store for dataset records.
///
/// Wraps a single SQLite connection in a `Mutex`; every multi-statement
/// operation runs in its own `IMMEDIATE` transaction so concurrent writers
/// on the same database file wait instead of interleaving.
pub struct DatasetStore {
    db: Mutex<Connection>,
}

impl DatasetStore {
    /// Wrap an already-open (and `init_db`-initialised) connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }

    /// Register an uploaded dataset as a draft, stamped with the current time.
    pub fn insert(&self, new: &NewDataset) -> Result<Dataset> {
        self.insert_at(new, Utc::now())
    }

    /// Register an uploaded dataset with an explicit creation time.
    #[instrument(skip(self, new), fields(owner = %new.owner, hash = %new.content_hash))]
    pub fn insert_at(&self, new: &NewDataset, created_at: DateTime<Utc>) -> Result<Dataset> {
        let id = Uuid::now_v7().to_string();
        let ts = format_timestamp(created_at);
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO datasets
             (id, title, owner, content_hash, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, 'draft', ?5, ?5)",
            rusqlite::params![id, new.title, new.owner, new.content_hash, ts],
        )?;
        debug!(dataset_id = %id, "dataset inserted");
        Ok(Dataset {
            id,
            title: new.title.clone(),
            owner: new.owner.clone(),
            content_hash: new.content_hash.clone(),
            status: DatasetStatus::Draft,
            created_at: ts.clone(),
            updated_at: ts,
        })
    }

    /// Fetch one dataset by id.
    pub fn get(&self, id: &str) -> Result<Dataset> {
        let db = self.db.lock().unwrap();
        let sql = format!("SELECT {DATASET_COLUMNS} FROM datasets WHERE id = ?1");
        db.query_row(&sql, [id], row_to_dataset)
            .optional()?
            .ok_or_else(|| DatasetError::NotFound { id: id.to_string() })
    }

    /// Number of stored datasets, optionally restricted to one status.
    pub fn count(&self, status: Option<DatasetStatus>) -> Result<u64> {
        let db = self.db.lock().unwrap();
        count_with(&db, status)
    }

    /// Newest-first page of datasets, optionally restricted to one status.
    #[instrument(skip(self), fields(page = request.page, page_size = request.page_size))]
    pub fn list(&self, status: Option<DatasetStatus>, request: PageRequest) -> Result<Page<Dataset>> {
        let db = self.db.lock().unwrap();
        let total = count_with(&db, status)?;
        request.validate(total)?;

        let sql = format!(
            "SELECT {DATASET_COLUMNS} FROM datasets
             WHERE (?1 IS NULL OR status = ?1)
             ORDER BY created_at DESC, seq DESC
             LIMIT ?2 OFFSET ?3"
        );
        let mut stmt = db.prepare(&sql)?;
        let items = stmt
            .query_map(
                rusqlite::params![
                    status.map(|s| s.to_string()),
                    i64::from(request.page_size),
                    request.offset() as i64
                ],
                row_to_dataset,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Page::new(items, request, total))
    }

    /// Move every draft (optionally only `owner`'s) to `approved`.
    ///
    /// Records that are already approved are excluded by the filter, so a
    /// second call is a no-op.
    #[instrument(skip(self))]
    pub fn approve_drafts(&self, owner: Option<&str>) -> Result<ApprovalSummary> {
        let mut db = self.db.lock().unwrap();
        let tx = db.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let found: i64 = tx.query_row(
            "SELECT COUNT(*) FROM datasets
             WHERE status = 'draft' AND (?1 IS NULL OR owner = ?1)",
            [owner],
            |row| row.get(0),
        )?;

        if found == 0 {
            // nothing to write; dropping `tx` rolls back the empty transaction
            debug!("no drafts matched");
            return Ok(ApprovalSummary::default());
        }

        let now = format_timestamp(Utc::now());
        let approved = tx.execute(
            "UPDATE datasets SET status = 'approved', updated_at = ?1
             WHERE status = 'draft' AND (?2 IS NULL OR owner = ?2)",
            rusqlite::params![now, owner],
        )?;
        tx.commit()?;

        info!(found, approved, "drafts approved");
        Ok(ApprovalSummary {
            found: found as usize,
            approved,
        })
    }

    /// Scan all datasets oldest-first and report (or delete) the ones whose
    /// content hash repeats an earlier dataset.
    ///
    /// The scan and any deletes share one `IMMEDIATE` transaction, so the
    /// report reflects a single snapshot and no insert can land between
    /// the scan and the delete.
    #[instrument(skip(self))]
    pub fn cleanup_duplicates(&self, mode: CleanupMode) -> Result<DuplicateReport> {
        let mut db = self.db.lock().unwrap();
        let tx = db.transaction_with_behavior(TransactionBehavior::Immediate)?;

        // Collect eagerly so `stmt` is dropped before the DELETEs borrow `tx`.
        let ordered: Vec<Dataset> = {
            let sql = format!(
                "SELECT {DATASET_COLUMNS} FROM datasets ORDER BY created_at ASC, seq ASC"
            );
            let mut stmt = tx.prepare(&sql)?;
            let rows = stmt
                .query_map([], row_to_dataset)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
        };

        let (scanned, duplicates) = find_duplicates(ordered);
        let mut deleted = 0;

        if mode == CleanupMode::Commit && !duplicates.is_empty() {
            let mut stmt = tx.prepare("DELETE FROM datasets WHERE id = ?1")?;
            for dup in &duplicates {
                deleted += stmt.execute([&dup.dataset.id])?;
            }
            drop(stmt);
            tx.commit()?;
            info!(scanned, deleted, "duplicate datasets deleted");
        } else {
            debug!(scanned, found = duplicates.len(), "duplicate scan (report only)");
        }

        Ok(DuplicateReport {
            scanned,
            duplicates,
            deleted,
        })
    }
}

fn count_with(db: &Connection, status: Option<DatasetStatus>) -> Result<u64> {
    let n: i64 = db.query_row(
        "SELECT COUNT(*) FROM datasets WHERE (?1 IS NULL OR status = ?1)",
        [status.map(|s| s.to_string())],
        |row| row.get(0),
    )?;
    Ok(n as u64)
}

/// Map a SQLite row (column order from `DATASET_COLUMNS`) to a `Dataset`.
fn row_to_dataset(row: &rusqlite::Row<'_>) -> rusqlite::Result<Dataset> {
    let status_str: String = row.get(4)?;
    let status = status_str.parse::<DatasetStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            Box::new(DatasetError::InvalidStatus(e)),
        )
    })?;
    Ok(Dataset {
        id: row.get(0)?,
        title: row.get(1)?,
        owner: row.get(2)?,
        content_hash: row.get(3)?,
        status,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use chrono::TimeZone;

    fn store() -> DatasetStore {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        DatasetStore::new(conn)
    }

    fn at(sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, sec).unwrap()
    }

    #[test]
    fn insert_then_get() {
        let s = store();
        let d = s.insert(&NewDataset::new("mnist", "alice", "h1")).unwrap();
        let back = s.get(&d.id).unwrap();
        assert_eq!(back, d);
        assert_eq!(back.status, DatasetStatus::Draft);
    }

    #[test]
    fn get_missing_is_not_found() {
        let s = store();
        assert!(matches!(s.get("nope"), Err(DatasetError::NotFound { .. })));
    }

    #[test]
    fn approve_respects_owner_filter() {
        let s = store();
        let a = s.insert(&NewDataset::new("a", "alice", "h1")).unwrap();
        let b = s.insert(&NewDataset::new("b", "bob", "h2")).unwrap();

        let summary = s.approve_drafts(Some("alice")).unwrap();
        assert_eq!(summary, ApprovalSummary { found: 1, approved: 1 });
        assert_eq!(s.get(&a.id).unwrap().status, DatasetStatus::Approved);
        assert_eq!(s.get(&b.id).unwrap().status, DatasetStatus::Draft);
    }

    #[test]
    fn approve_all_is_idempotent() {
        let s = store();
        for i in 0..3 {
            s.insert(&NewDataset::new(format!("d{i}"), "carol", format!("h{i}")))
                .unwrap();
        }
        let first = s.approve_drafts(None).unwrap();
        assert_eq!(first.approved, 3);
        let second = s.approve_drafts(None).unwrap();
        assert_eq!(second, ApprovalSummary::default());
        assert_eq!(s.count(Some(DatasetStatus::Approved)).unwrap(), 3);
    }

    #[test]
    fn approve_unknown_owner_writes_nothing() {
        let s = store();
        let d = s.insert(&NewDataset::new("a", "alice", "h1")).unwrap();
        let summary = s.approve_drafts(Some("bob")).unwrap();
        assert_eq!(summary.found, 0);
        assert_eq!(s.get(&d.id).unwrap().updated_at, d.updated_at);
    }

    #[test]
    fn report_mode_does_not_delete() {
        let s = store();
        s.insert_at(&NewDataset::new("A", "u", "h1"), at(1)).unwrap();
        s.insert_at(&NewDataset::new("B", "u", "h2"), at(2)).unwrap();
        let c = s.insert_at(&NewDataset::new("C", "u", "h1"), at(3)).unwrap();

        let report = s.cleanup_duplicates(CleanupMode::Report).unwrap();
        assert_eq!(report.scanned, 3);
        assert_eq!(report.deleted, 0);
        assert_eq!(report.duplicates.len(), 1);
        assert_eq!(report.duplicates[0].dataset.id, c.id);
        assert_eq!(s.count(None).unwrap(), 3);
    }

    #[test]
    fn commit_mode_removes_only_duplicates() {
        let s = store();
        let a = s.insert_at(&NewDataset::new("A", "u", "h1"), at(1)).unwrap();
        let b = s.insert_at(&NewDataset::new("B", "u", "h2"), at(2)).unwrap();
        let c = s.insert_at(&NewDataset::new("C", "u", "h1"), at(3)).unwrap();

        let report = s.cleanup_duplicates(CleanupMode::Commit).unwrap();
        assert_eq!(report.deleted, 1);
        assert!(s.get(&a.id).is_ok());
        assert!(s.get(&b.id).is_ok());
        assert!(matches!(s.get(&c.id), Err(DatasetError::NotFound { .. })));
    }

    #[test]
    fn canonical_is_oldest_not_first_inserted() {
        let s = store();
        // inserted first but created later
        let late = s.insert_at(&NewDataset::new("late", "u", "h"), at(9)).unwrap();
        let early = s.insert_at(&NewDataset::new("early", "u", "h"), at(1)).unwrap();

        let report = s.cleanup_duplicates(CleanupMode::Commit).unwrap();
        assert_eq!(report.duplicates[0].dataset.id, late.id);
        assert_eq!(report.duplicates[0].canonical_id, early.id);
        assert!(s.get(&early.id).is_ok());
    }

    #[test]
    fn equal_timestamps_fall_back_to_storage_order() {
        let s = store();
        let first = s.insert_at(&NewDataset::new("x", "u", "h"), at(5)).unwrap();
        let second = s.insert_at(&NewDataset::new("y", "u", "h"), at(5)).unwrap();

        let report = s.cleanup_duplicates(CleanupMode::Report).unwrap();
        assert_eq!(report.duplicates[0].dataset.id, second.id);
        assert_eq!(report.duplicates[0].canonical_id, first.id);
    }

    #[test]
    fn storage_order_survives_vacuum() {
        let s = store();
        let first = s.insert_at(&NewDataset::new("x", "u", "h"), at(5)).unwrap();
        let gap = s.insert_at(&NewDataset::new("g", "u", "other"), at(5)).unwrap();
        let third = s.insert_at(&NewDataset::new("y", "u", "h"), at(5)).unwrap();
        {
            let db = s.db.lock().unwrap();
            db.execute("DELETE FROM datasets WHERE id = ?1", [&gap.id]).unwrap();
            db.execute_batch("VACUUM").unwrap();
            let seqs: Vec<i64> = db
                .prepare("SELECT seq FROM datasets ORDER BY seq")
                .unwrap()
                .query_map([], |r| r.get(0))
                .unwrap()
                .collect::<rusqlite::Result<_>>()
                .unwrap();
            assert_eq!(seqs, [1, 3]);
        }

        let report = s.cleanup_duplicates(CleanupMode::Report).unwrap();
        assert_eq!(report.duplicates.len(), 1);
        assert_eq!(report.duplicates[0].dataset.id, third.id);
        assert_eq!(report.duplicates[0].canonical_id, first.id);
    }

    #[test]
    fn list_pages_newest_first() {
        let s = store();
        for i in 0..5 {
            s.insert_at(&NewDataset::new(format!("d{i}"), "u", format!("h{i}")), at(i))
                .unwrap();
        }
        let page = s
            .list(None, PageRequest { page: 1, page_size: 2 })
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items[0].title, "d4");
        assert!(page.has_next);

        let last = s
            .list(None, PageRequest { page: 3, page_size: 2 })
            .unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].title, "d0");

        assert!(s.list(None, PageRequest { page: 4, page_size: 2 }).is_err());
    }

    #[test]
    fn list_filters_by_status() {
        let s = store();
        s.insert(&NewDataset::new("a", "alice", "h1")).unwrap();
        s.insert(&NewDataset::new("b", "bob", "h2")).unwrap();
        s.approve_drafts(Some("bob")).unwrap();

        let drafts = s
            .list(Some(DatasetStatus::Draft), PageRequest { page: 1, page_size: 10 })
            .unwrap();
        assert_eq!(drafts.total, 1);
        assert_eq!(drafts.items[0].owner, "alice");
    }
}
