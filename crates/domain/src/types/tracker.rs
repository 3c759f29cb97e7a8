//! Tracker state and elapsed-time math

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// In-memory state of the work timer.
///
/// Invariant: `is_running` and `is_paused` are never both true.
/// `accumulated_seconds` is the sum of completed running segments of the
/// current entry; `start_time` marks the beginning of the in-progress
/// segment and is `None` while paused or idle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerState {
    pub active_project_id: Option<String>,
    pub time_entry_id: Option<String>,
    pub is_running: bool,
    pub is_paused: bool,
    pub is_loading: bool,
    pub start_time: Option<DateTime<Utc>>,
    pub accumulated_seconds: i64,
    pub total_seconds: i64,
}

impl TrackerState {
    /// Whether an entry is active (running or paused)
    pub fn has_active_entry(&self) -> bool {
        self.time_entry_id.is_some()
    }

    /// Elapsed seconds of the current entry at `now`
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> i64 {
        elapsed_seconds(now, self.start_time, self.accumulated_seconds, self.is_running, self.is_paused)
    }
}

/// Elapsed seconds of the current entry, as a pure function of its inputs.
///
/// While running this is the accumulated time plus the in-progress segment;
/// paused or idle it is frozen at the accumulated time. Callable from any
/// timing source, decoupled from any refresh cadence.
pub fn elapsed_seconds(
    now: DateTime<Utc>,
    start_time: Option<DateTime<Utc>>,
    accumulated_seconds: i64,
    is_running: bool,
    is_paused: bool,
) -> i64 {
    if is_paused || !is_running {
        return accumulated_seconds;
    }
    match start_time {
        Some(start) => accumulated_seconds + (now - start).num_seconds().max(0),
        None => accumulated_seconds,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn running_counts_current_segment() {
        assert_eq!(elapsed_seconds(at(45), Some(at(0)), 10, true, false), 55);
    }

    #[test]
    fn paused_is_frozen_at_accumulated() {
        assert_eq!(elapsed_seconds(at(45), Some(at(0)), 10, false, true), 10);
        assert_eq!(elapsed_seconds(at(500), None, 10, false, true), 10);
    }

    #[test]
    fn idle_is_accumulated_only() {
        assert_eq!(elapsed_seconds(at(45), None, 0, false, false), 0);
    }

    #[test]
    fn clock_skew_never_goes_negative() {
        // start timestamp in the future relative to `now`
        assert_eq!(elapsed_seconds(at(0), Some(at(60)), 5, true, false), 5);
    }

    #[test]
    fn state_elapsed_uses_flags() {
        let state = TrackerState {
            start_time: Some(at(0)),
            accumulated_seconds: 7,
            is_running: true,
            ..TrackerState::default()
        };
        assert_eq!(state.elapsed_at(at(3)), 10);
    }
}
