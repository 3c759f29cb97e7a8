//! Timer commands

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::info;
use worklens_core::dashboard::StartOutcome;
use worklens_domain::{Result, TrackerState};

use crate::utils::logging::{error_label, log_command_execution};
use crate::AppContext;

/// Startup recovery: restore the active timer, the lifetime total, and the
/// project list, then bring capture in line with the restored state.
pub async fn restore_tracker(ctx: &Arc<AppContext>) -> Result<TrackerState> {
    let command_name = "tracker::restore_tracker";
    let start = Instant::now();

    info!(command = command_name, "restoring tracker state");
    let result = ctx.dashboard.initialize().await.map(|()| ctx.tracker.snapshot());

    let error_type = result.as_ref().err().map(error_label);
    log_command_execution(command_name, start.elapsed(), result.is_ok(), error_type);
    result
}

/// Manual start: screen capture first, backend timer second
pub async fn start_timer(ctx: &Arc<AppContext>) -> Result<StartOutcome> {
    let command_name = "tracker::start_timer";
    let start = Instant::now();

    info!(command = command_name, "starting timer");
    let result = ctx.dashboard.start().await;

    let error_type = result.as_ref().err().map(error_label);
    log_command_execution(command_name, start.elapsed(), result.is_ok(), error_type);
    result
}

/// Pause the running timer
pub async fn pause_timer(ctx: &Arc<AppContext>) -> Result<()> {
    let command_name = "tracker::pause_timer";
    let start = Instant::now();

    info!(command = command_name, "pausing timer");
    let result = ctx.dashboard.pause().await;

    let error_type = result.as_ref().err().map(error_label);
    log_command_execution(command_name, start.elapsed(), result.is_ok(), error_type);
    result
}

/// Manual resume, with the same capture-first ordering as start
pub async fn resume_timer(ctx: &Arc<AppContext>) -> Result<StartOutcome> {
    let command_name = "tracker::resume_timer";
    let start = Instant::now();

    info!(command = command_name, "resuming timer");
    let result = ctx.dashboard.resume().await;

    let error_type = result.as_ref().err().map(error_label);
    log_command_execution(command_name, start.elapsed(), result.is_ok(), error_type);
    result
}

/// Stop the timer and refresh the lifetime total
pub async fn stop_timer(ctx: &Arc<AppContext>) -> Result<()> {
    let command_name = "tracker::stop_timer";
    let start = Instant::now();

    info!(command = command_name, "stopping timer");
    let result = ctx.dashboard.stop().await;

    let error_type = result.as_ref().err().map(error_label);
    log_command_execution(command_name, start.elapsed(), result.is_ok(), error_type);
    result
}

/// Current tracker state snapshot
pub fn tracker_state(ctx: &Arc<AppContext>) -> TrackerState {
    ctx.tracker.snapshot()
}

/// Seconds the dashboard should display: lifetime total plus live session
pub fn display_seconds(ctx: &Arc<AppContext>) -> i64 {
    ctx.dashboard.display_seconds(Utc::now())
}
