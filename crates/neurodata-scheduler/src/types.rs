use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One entry of the periodic job table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledJob {
    /// Unique, kebab-case label (e.g. `process-training-queue`).
    pub name: &'static str,
    /// Dotted path of the task the worker pool executes.
    pub task: &'static str,
    /// Minimum time between two fires.
    pub interval: Duration,
}

impl ScheduledJob {
    pub const fn every_secs(name: &'static str, task: &'static str, secs: u64) -> Self {
        Self {
            name,
            task,
            interval: Duration::from_secs(secs),
        }
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval.as_secs()
    }
}

/// A unit of work handed to the worker pool when a job comes due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiredJob {
    pub name: String,
    pub task: String,
    /// RFC 3339 UTC instant of the fire.
    pub fired_at: String,
    /// Total fires of this job including this one.
    pub run_count: u32,
}

/// Persisted run state of a table entry, as shown by `schedule list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRunState {
    pub name: String,
    pub task: String,
    pub interval_secs: u64,
    /// RFC 3339 timestamp of the most recent fire, if any.
    pub last_run: Option<String>,
    pub run_count: u32,
    /// RFC 3339 timestamp at which the job next becomes due.
    pub next_due: String,
}
