// End-to-end checks of the maintenance passes against a file-backed database,
// the way the CLI opens it.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, TimeZone, Utc};
use neurodata_datasets::{
    db::init_db, CleanupMode, DatasetStatus, DatasetStore, NewDataset, PageRequest,
};
use rusqlite::Connection;

struct TempDb(std::path::PathBuf);

impl TempDb {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("neurodata-test-{}.db", uuid::Uuid::new_v4())))
    }

    fn open(&self) -> DatasetStore {
        let conn = Connection::open(&self.0).unwrap();
        init_db(&conn).unwrap();
        DatasetStore::new(conn)
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[test]
fn commit_removes_exactly_the_reported_set() {
    let tmp = TempDb::new();
    let store = tmp.open();
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    // 40 uploads over 7 distinct contents
    let mut all = Vec::new();
    for i in 0..40i64 {
        let hash = format!("hash-{}", (i * 3) % 7);
        let d = store
            .insert_at(&NewDataset::new(format!("upload {i}"), "alice", hash), base + Duration::seconds(i))
            .unwrap();
        all.push(d);
    }

    let report = store.cleanup_duplicates(CleanupMode::Report).unwrap();
    assert_eq!(report.scanned, 40);
    assert_eq!(report.duplicates.len(), 33);

    // the first upload of each hash is canonical
    let mut first_of: HashMap<&str, &str> = HashMap::new();
    for d in &all {
        first_of.entry(d.content_hash.as_str()).or_insert(d.id.as_str());
    }
    for dup in &report.duplicates {
        assert_eq!(first_of[dup.dataset.content_hash.as_str()], dup.canonical_id);
    }

    let reported: HashSet<String> = report.duplicates.iter().map(|d| d.dataset.id.clone()).collect();
    let committed = store.cleanup_duplicates(CleanupMode::Commit).unwrap();
    assert_eq!(committed.deleted, reported.len());

    // reopen through a fresh connection to see what was persisted
    let reopened = tmp.open();
    assert_eq!(reopened.count(None).unwrap(), 7);
    for d in &all {
        let exists = reopened.get(&d.id).is_ok();
        assert_eq!(exists, !reported.contains(&d.id), "dataset {}", d.title);
    }

    // a second commit finds nothing
    let again = reopened.cleanup_duplicates(CleanupMode::Commit).unwrap();
    assert!(again.is_empty());
    assert_eq!(again.deleted, 0);
}

#[test]
fn approval_only_touches_matching_drafts() {
    let tmp = TempDb::new();
    let store = tmp.open();

    for owner in ["alice", "alice", "bob", "carol"] {
        store
            .insert(&NewDataset::new("set", owner, uuid::Uuid::new_v4().to_string()))
            .unwrap();
    }
    store.approve_drafts(Some("carol")).unwrap();

    let summary = store.approve_drafts(Some("alice")).unwrap();
    assert_eq!(summary.found, 2);
    assert_eq!(summary.approved, 2);

    let drafts = store
        .list(Some(DatasetStatus::Draft), PageRequest { page: 1, page_size: 10 })
        .unwrap();
    let owners: Vec<_> = drafts.items.iter().map(|d| d.owner.as_str()).collect();
    assert_eq!(owners, ["bob"]);

    let summary = store.approve_drafts(None).unwrap();
    assert_eq!(summary.approved, 1);
    assert_eq!(store.count(Some(DatasetStatus::Draft)).unwrap(), 0);
}
