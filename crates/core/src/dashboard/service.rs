//! Dashboard orchestrator
//!
//! Couples the tracker to the capture coordinator with one policy: capture
//! is active if and only if the timer is running and not paused. Manual
//! start/resume acquire the capture stream first and only then commit the
//! backend action, so the backend never records a running entry without
//! capture consent having been granted. A platform-side revocation stops
//! the backend timer through the coordinator's notification channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use worklens_domain::Result;

use crate::capture::CaptureCoordinator;
use crate::projects::ProjectCatalog;
use crate::session::SessionService;
use crate::tracker::TrackerService;

/// Result of a manual start or resume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Capture acquired and the backend action committed
    Committed,
    /// The user declined the capture prompt; nothing was committed
    CaptureDeclined,
}

/// Marks a user-driven action in progress, so the revocation watcher can
/// tell an explicit teardown apart from a platform-side one.
struct ActionGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ActionGuard<'a> {
    fn engage(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self { flag }
    }
}

impl Drop for ActionGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Composes session, tracker, project catalog, and capture coordinator
pub struct DashboardService {
    session: Arc<SessionService>,
    tracker: Arc<TrackerService>,
    catalog: Arc<ProjectCatalog>,
    capture: Arc<CaptureCoordinator>,
    manual_action: AtomicBool,
}

impl DashboardService {
    pub fn new(
        session: Arc<SessionService>,
        tracker: Arc<TrackerService>,
        catalog: Arc<ProjectCatalog>,
        capture: Arc<CaptureCoordinator>,
    ) -> Self {
        Self { session, tracker, catalog, capture, manual_action: AtomicBool::new(false) }
    }

    pub fn tracker(&self) -> &Arc<TrackerService> {
        &self.tracker
    }

    pub fn catalog(&self) -> &Arc<ProjectCatalog> {
        &self.catalog
    }

    pub fn capture(&self) -> &Arc<CaptureCoordinator> {
        &self.capture
    }

    /// Startup recovery: restore the active timer and lifetime total, then
    /// bring capture in line with the restored state.
    pub async fn initialize(&self) -> Result<()> {
        self.tracker.check_active_timer().await?;
        if let Err(err) = self.catalog.load().await {
            warn!(error = %err, "failed to load projects");
        }
        // Forward the catalog's selection unless recovery already set one
        if self.tracker.snapshot().active_project_id.is_none() {
            if let Some(project_id) = self.catalog.selected_id() {
                self.tracker.set_active_project(project_id);
            }
        }
        self.sync_capture().await;
        Ok(())
    }

    /// Forward a project selection to both the catalog and the tracker
    pub fn select_project(&self, project_id: &str) -> Result<()> {
        self.catalog.select(project_id)?;
        self.tracker.set_active_project(project_id);
        Ok(())
    }

    /// Manual start: acquire capture first, commit the backend start only on
    /// success, and release the stream again if the commit fails.
    pub async fn start(&self) -> Result<StartOutcome> {
        let _action = ActionGuard::engage(&self.manual_action);

        if !self.capture.start_tracking().await {
            info!("start aborted: screen capture was declined");
            return Ok(StartOutcome::CaptureDeclined);
        }

        match self.tracker.start().await {
            Ok(()) => Ok(StartOutcome::Committed),
            Err(err) => {
                self.capture.stop_tracking();
                Err(err)
            }
        }
    }

    /// Manual resume, with the same acquire-then-commit order as start
    pub async fn resume(&self) -> Result<StartOutcome> {
        let _action = ActionGuard::engage(&self.manual_action);

        if !self.capture.start_tracking().await {
            info!("resume aborted: screen capture was declined");
            return Ok(StartOutcome::CaptureDeclined);
        }

        match self.tracker.resume().await {
            Ok(()) => Ok(StartOutcome::Committed),
            Err(err) => {
                self.capture.stop_tracking();
                Err(err)
            }
        }
    }

    /// Pause the timer; capture stops once the backend confirmed
    pub async fn pause(&self) -> Result<()> {
        let _action = ActionGuard::engage(&self.manual_action);
        self.tracker.pause().await?;
        self.capture.stop_tracking();
        Ok(())
    }

    /// Stop the timer; capture stops once the backend confirmed
    pub async fn stop(&self) -> Result<()> {
        let _action = ActionGuard::engage(&self.manual_action);
        self.tracker.stop().await?;
        self.capture.stop_tracking();
        Ok(())
    }

    /// Tear down capture and end the session
    pub fn logout(&self) {
        self.capture.stop_tracking();
        self.session.logout();
    }

    /// Total seconds to display: lifetime total plus the live session
    pub fn display_seconds(&self, now: DateTime<Utc>) -> i64 {
        let state = self.tracker.snapshot();
        let session_addition = if state.has_active_entry() { state.elapsed_at(now) } else { 0 };
        state.total_seconds + session_addition
    }

    /// Re-apply the capture policy to the current tracker state
    pub async fn sync_capture(&self) {
        let state = self.tracker.snapshot();
        let should_capture = state.is_running && !state.is_paused && state.has_active_entry();

        if should_capture {
            if !self.capture.is_tracking() && !self.capture.start_tracking().await {
                warn!("timer is running but screen capture could not be started");
            }
        } else if self.capture.is_tracking() {
            self.capture.stop_tracking();
        }
    }

    /// React to platform-side capture revocations: the coordinator has
    /// already stopped itself; stop the backend timer too, unless a manual
    /// action owns the teardown.
    pub fn spawn_revocation_watcher(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let weak = Arc::downgrade(&self);
        let mut revocations = self.capture.subscribe_revocations();
        tokio::spawn(async move {
            while revocations.recv().await.is_ok() {
                let Some(dashboard) = weak.upgrade() else { break };
                if dashboard.manual_action.load(Ordering::SeqCst) {
                    debug!("capture ended during a manual action; skipping timer stop");
                    continue;
                }
                if !dashboard.tracker.snapshot().has_active_entry() {
                    continue;
                }
                info!("screen capture revoked; stopping the timer");
                if let Err(err) = dashboard.tracker.stop().await {
                    warn!(error = %err, "failed to stop timer after capture revocation");
                }
            }
        })
    }
}
