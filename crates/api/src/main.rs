//! WorkLens - desktop time-tracking agent
//!
//! Main entry point: logging first, then environment, configuration, the
//! application context, and startup recovery. The process then idles until
//! ctrl-c; the UI shell drives everything else through the command layer.

use std::process::ExitCode;

use tracing::{debug, error, info, warn};
use worklens_domain::Config;
use worklens_lib::{commands, AppContext};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "loaded environment from .env"),
        Err(err) => debug!(error = %err, "no .env file loaded"),
    }

    let config = worklens_infra::config::load().unwrap_or_else(|err| {
        info!(error = %err, "no configuration found; using defaults");
        Config::default()
    });

    let ctx = match AppContext::new(config).await {
        Ok(ctx) => ctx,
        Err(err) => {
            error!(error = %err, "failed to initialise application context");
            return ExitCode::FAILURE;
        }
    };

    match commands::restore_tracker(&ctx).await {
        Ok(state) if state.has_active_entry() => {
            info!(entry_id = ?state.time_entry_id, "restored an active time entry")
        }
        Ok(_) => info!("no active time entry to restore"),
        Err(err) => warn!(error = %err, "startup recovery failed"),
    }

    info!("worklens agent running; press ctrl-c to exit");
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
    }

    ctx.shutdown().await;
    ExitCode::SUCCESS
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
