use chrono::{DateTime, Duration, Utc};

use crate::types::ScheduledJob;

/// Earliest instant at which `job` may fire again.
///
/// A job that has never run is due immediately (`now`).
pub fn next_due(job: &ScheduledJob, last_run: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    match last_run {
        None => now,
        Some(last) => {
            let step = Duration::from_std(job.interval).unwrap_or(Duration::MAX);
            last.checked_add_signed(step).unwrap_or(DateTime::<Utc>::MAX_UTC)
        }
    }
}

/// Whether `job` should fire at `now`.
pub fn is_due(job: &ScheduledJob, last_run: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    next_due(job, last_run, now) <= now
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const JOB: ScheduledJob = ScheduledJob::every_secs("tick", "t.tick", 30);

    fn t(sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, sec).unwrap()
    }

    #[test]
    fn never_run_is_due() {
        assert!(is_due(&JOB, None, t(0)));
        assert_eq!(next_due(&JOB, None, t(7)), t(7));
    }

    #[test]
    fn not_due_before_interval() {
        assert!(!is_due(&JOB, Some(t(0)), t(29)));
        assert!(is_due(&JOB, Some(t(0)), t(30)));
        assert!(is_due(&JOB, Some(t(0)), t(45)));
    }

    #[test]
    fn next_due_is_last_plus_interval() {
        assert_eq!(next_due(&JOB, Some(t(10)), t(11)), t(40));
    }
}
