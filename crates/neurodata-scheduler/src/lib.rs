//! `neurodata-scheduler` — the periodic job table and the Tokio engine that
//! dispatches it.
//!
//! # Overview
//!
//! The table ([`table::periodic_jobs`]) is static: a name, the task path the
//! external worker pool should execute, and a minimum interval. The
//! [`engine::SchedulerEngine`] wakes on a fixed tick, fires every job whose
//! interval has elapsed since its last recorded run, and hands a
//! [`FiredJob`] to an mpsc channel. Run state lives in the SQLite
//! `job_runs` table so a restart does not re-fire jobs early.
//!
//! Dispatch is best effort: ticks may drift or be skipped under load, and a
//! fire is dropped (with a warning) when the channel is full. Handlers are
//! expected to be idempotent.
//!
//! | Job                        | Every   |
//! |----------------------------|---------|
//! | monitor-blockchain-events  | 30 s    |
//! | process-training-queue     | 60 s    |
//! | update-dataset-statistics  | 30 min  |
//! | cleanup-expired-sessions   | 1 h     |
//! | update-training-statistics | 1 h     |
//! | cleanup-old-training-files | 24 h    |

pub mod db;
pub mod engine;
pub mod error;
pub mod schedule;
pub mod table;
pub mod types;

pub use engine::{SchedulerEngine, SchedulerHandle};
pub use error::{Result, SchedulerError};
pub use table::periodic_jobs;
pub use types::{FiredJob, JobRunState, ScheduledJob};
