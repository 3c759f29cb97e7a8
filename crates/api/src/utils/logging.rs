use std::time::Duration;

use tracing::{info, warn};
use worklens_domain::WorkLensError;

/// Log the outcome of a command execution with structured fields.
///
/// # Parameters
/// * `command` - Logical command identifier (e.g. `"tracker::start_timer"`).
/// * `elapsed` - Duration the command execution took.
/// * `success` - Whether the command completed successfully.
/// * `error_type` - Stable error label for failures.
///
/// The helper keeps the command wrappers concise and the log shape
/// consistent. Callers must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(
    command: &str,
    elapsed: Duration,
    success: bool,
    error_type: Option<&'static str>,
) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, error_type, "command_execution_failure");
    }
}

/// Convert a `WorkLensError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &WorkLensError) -> &'static str {
    match error {
        WorkLensError::Config(_) => "config",
        WorkLensError::Platform(_) => "platform",
        WorkLensError::Network(_) => "network",
        WorkLensError::Auth(_) => "auth",
        WorkLensError::Conflict(_) => "conflict",
        WorkLensError::NotFound(_) => "not_found",
        WorkLensError::InvalidInput(_) => "invalid_input",
        WorkLensError::Internal(_) => "internal",
    }
}
