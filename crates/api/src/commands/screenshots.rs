//! Screenshot gallery commands

use std::sync::Arc;
use std::time::Instant;

use tracing::info;
use worklens_domain::{Result, Screenshot};

use crate::utils::logging::{error_label, log_command_execution};
use crate::AppContext;

/// Gallery listing for the active entry: newest first, capped for display.
/// Without an active entry there is nothing to show.
pub async fn recent_screenshots(ctx: &Arc<AppContext>) -> Result<Vec<Screenshot>> {
    let command_name = "screenshots::recent_screenshots";
    let start = Instant::now();

    let result = async {
        let Some(entry_id) = ctx.tracker.snapshot().time_entry_id else {
            return Ok(Vec::new());
        };
        info!(command = command_name, entry_id = %entry_id, "fetching screenshots");
        ctx.screenshots.recent_for_entry(&entry_id).await
    }
    .await;

    let error_type = result.as_ref().err().map(error_label);
    log_command_execution(command_name, start.elapsed(), result.is_ok(), error_type);
    result
}
