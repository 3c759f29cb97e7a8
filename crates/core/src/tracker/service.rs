//! Tracker service - the work-timer state machine
//!
//! States: IDLE -> RUNNING <-> PAUSED -> IDLE (via stop). All state lives
//! behind a single mutex and is only mutated through the action methods
//! here (single-writer discipline). Nothing is committed before the backend
//! request settles, so a failed action leaves the state untouched apart
//! from the loading flag.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};
use worklens_domain::constants::DEFAULT_ENTRY_DESCRIPTION;
use worklens_domain::{
    NewTimeEntry, Result, TimeEntryStatus, TrackerState, WorkLensError,
};

use super::ports::{Clock, TimeEntryGateway};
use crate::capture::EntryTagSource;
use crate::session::SessionService;

/// Sets `is_loading` for the duration of a network-touching action and
/// clears it on every exit path, success or failure.
struct LoadingGuard<'a> {
    state: &'a Mutex<TrackerState>,
}

impl<'a> LoadingGuard<'a> {
    fn engage(state: &'a Mutex<TrackerState>) -> Self {
        state.lock().is_loading = true;
        Self { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.lock().is_loading = false;
    }
}

/// Work-timer state machine over the backend gateway
pub struct TrackerService {
    state: Mutex<TrackerState>,
    gateway: Arc<dyn TimeEntryGateway>,
    clock: Arc<dyn Clock>,
    session: Arc<SessionService>,
}

impl TrackerService {
    pub fn new(
        gateway: Arc<dyn TimeEntryGateway>,
        clock: Arc<dyn Clock>,
        session: Arc<SessionService>,
    ) -> Self {
        Self { state: Mutex::new(TrackerState::default()), gateway, clock, session }
    }

    /// Snapshot of the current tracker state
    pub fn snapshot(&self) -> TrackerState {
        self.state.lock().clone()
    }

    /// Select the project new entries will be booked against
    pub fn set_active_project(&self, project_id: impl Into<String>) {
        self.state.lock().active_project_id = Some(project_id.into());
    }

    /// Start a new entry for the selected project.
    ///
    /// Requires a selected project and a signed-in user; neither check
    /// touches the network.
    pub async fn start(&self) -> Result<()> {
        let project_id = self
            .state
            .lock()
            .active_project_id
            .clone()
            .ok_or_else(|| WorkLensError::InvalidInput("no project selected".into()))?;
        let user = self
            .session
            .user()
            .ok_or_else(|| WorkLensError::Auth("not signed in".into()))?;

        let _loading = LoadingGuard::engage(&self.state);
        let now = self.clock.now();

        let entry = self
            .gateway
            .start_entry(NewTimeEntry {
                user_id: user.id,
                project_id: project_id.clone(),
                start_time: now,
                description: DEFAULT_ENTRY_DESCRIPTION.to_string(),
                status: TimeEntryStatus::Running,
            })
            .await
            .map_err(|err| {
                warn!(error = %err, "failed to start time entry");
                err
            })?;

        info!(entry_id = %entry.id, project_id = %project_id, "time entry started");

        let mut state = self.state.lock();
        state.time_entry_id = Some(entry.id);
        state.is_running = true;
        state.is_paused = false;
        state.start_time = Some(now);
        state.accumulated_seconds = 0;
        Ok(())
    }

    /// Pause the current entry, folding the finished segment into the
    /// accumulated total.
    pub async fn pause(&self) -> Result<()> {
        let entry_id = self.require_entry()?;
        let _loading = LoadingGuard::engage(&self.state);
        let now = self.clock.now();

        self.gateway.pause_entry(&entry_id).await.map_err(|err| {
            warn!(entry_id = %entry_id, error = %err, "failed to pause time entry");
            err
        })?;

        info!(entry_id = %entry_id, "time entry paused");

        let mut state = self.state.lock();
        if let Some(start) = state.start_time.take() {
            state.accumulated_seconds += (now - start).num_seconds().max(0);
        }
        state.is_paused = true;
        state.is_running = false;
        Ok(())
    }

    /// Resume a paused entry; the accumulated total is retained.
    pub async fn resume(&self) -> Result<()> {
        let entry_id = self.require_entry()?;
        let _loading = LoadingGuard::engage(&self.state);
        let now = self.clock.now();

        self.gateway.resume_entry(&entry_id).await.map_err(|err| {
            warn!(entry_id = %entry_id, error = %err, "failed to resume time entry");
            err
        })?;

        info!(entry_id = %entry_id, "time entry resumed");

        let mut state = self.state.lock();
        state.is_running = true;
        state.is_paused = false;
        state.start_time = Some(now);
        Ok(())
    }

    /// Stop the current entry and refresh the lifetime total.
    pub async fn stop(&self) -> Result<()> {
        let entry_id = self.require_entry()?;

        {
            let _loading = LoadingGuard::engage(&self.state);

            self.gateway.stop_entry(&entry_id).await.map_err(|err| {
                warn!(entry_id = %entry_id, error = %err, "failed to stop time entry");
                err
            })?;

            info!(entry_id = %entry_id, "time entry stopped");

            let mut state = self.state.lock();
            state.time_entry_id = None;
            state.is_running = false;
            state.is_paused = false;
            state.start_time = None;
            state.accumulated_seconds = 0;
        }

        // Best-effort refresh; the stop itself already succeeded
        if let Err(err) = self.fetch_total_time().await {
            warn!(error = %err, "failed to refresh total time after stop");
        }
        Ok(())
    }

    /// Restore in-memory state after a restart.
    ///
    /// Fetches the lifetime total, then the active entry. Accumulated time
    /// for segments before the restart is not recoverable; the entry's
    /// recorded start is all the backend returns for an in-progress entry.
    pub async fn check_active_timer(&self) -> Result<()> {
        let _loading = LoadingGuard::engage(&self.state);

        if let Err(err) = self.fetch_total_time().await {
            warn!(error = %err, "failed to load total time");
        }

        let active = self.gateway.active_entry().await.map_err(|err| {
            warn!(error = %err, "failed to query active time entry");
            err
        })?;

        let mut state = self.state.lock();
        match active {
            Some(entry) if entry.status.is_active() => {
                info!(entry_id = %entry.id, status = ?entry.status, "restored active time entry");
                state.is_running = entry.status == TimeEntryStatus::Running;
                state.is_paused = entry.status == TimeEntryStatus::Paused;
                state.active_project_id = entry.project_id;
                state.start_time = entry.start_time;
                state.time_entry_id = Some(entry.id);
                state.accumulated_seconds = 0;
            }
            _ => {
                state.time_entry_id = None;
                state.is_running = false;
                state.is_paused = false;
                state.start_time = None;
                state.accumulated_seconds = 0;
            }
        }
        Ok(())
    }

    /// Recompute the lifetime total from completed entries.
    ///
    /// Running and paused entries are excluded; entries without a recorded
    /// duration count as zero.
    pub async fn fetch_total_time(&self) -> Result<()> {
        let entries = self.gateway.list_entries().await?;
        let total: i64 = entries
            .iter()
            .filter(|entry| !entry.status.is_active())
            .map(|entry| entry.duration_seconds.unwrap_or(0))
            .sum();
        self.state.lock().total_seconds = total;
        Ok(())
    }

    /// Clear all tracker state, e.g. when the session ends
    pub fn reset(&self) {
        *self.state.lock() = TrackerState::default();
        info!("tracker state reset");
    }

    fn require_entry(&self) -> Result<String> {
        self.state
            .lock()
            .time_entry_id
            .clone()
            .ok_or_else(|| WorkLensError::InvalidInput("no active time entry".into()))
    }
}

impl EntryTagSource for TrackerService {
    fn current_entry_id(&self) -> Option<String> {
        self.state.lock().time_entry_id.clone()
    }
}
