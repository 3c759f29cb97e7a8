//! Authentication commands

use std::sync::Arc;
use std::time::Instant;

use tracing::info;
use worklens_domain::{Credentials, Registration, Result, User, WorkLensError};

use crate::utils::logging::{error_label, log_command_execution};
use crate::AppContext;

/// Sign in with email and password
pub async fn login(ctx: &Arc<AppContext>, credentials: Credentials) -> Result<User> {
    let command_name = "auth::login";
    let start = Instant::now();

    info!(command = command_name, "signing in");
    let result = async {
        let response = ctx.auth.login(&credentials).await.map_err(WorkLensError::from)?;
        ctx.session.set_user(response.user.clone());
        Ok(response.user)
    }
    .await;

    let error_type = result.as_ref().err().map(error_label);
    log_command_execution(command_name, start.elapsed(), result.is_ok(), error_type);
    result
}

/// Register a new account.
///
/// A duplicate email or company domain surfaces as a `Conflict` with its
/// own message so the UI can show it verbatim.
pub async fn register(ctx: &Arc<AppContext>, registration: Registration) -> Result<User> {
    let command_name = "auth::register";
    let start = Instant::now();

    info!(command = command_name, "registering account");
    let result = async {
        let response = ctx.auth.register(&registration).await.map_err(WorkLensError::from)?;
        ctx.session.set_user(response.user.clone());
        Ok(response.user)
    }
    .await;

    let error_type = result.as_ref().err().map(error_label);
    log_command_execution(command_name, start.elapsed(), result.is_ok(), error_type);
    result
}

/// End the session: tear down capture, clear the session (which resets the
/// tracker through its event subscription), and drop the stored tokens.
pub async fn logout(ctx: &Arc<AppContext>) -> Result<()> {
    let command_name = "auth::logout";
    let start = Instant::now();

    info!(command = command_name, "signing out");
    let result = async {
        ctx.dashboard.logout();
        ctx.auth.logout().map_err(WorkLensError::from)
    }
    .await;

    let error_type = result.as_ref().err().map(error_label);
    log_command_execution(command_name, start.elapsed(), result.is_ok(), error_type);
    result
}
