//! Project commands

use std::sync::Arc;
use std::time::Instant;

use tracing::info;
use worklens_domain::{NewProject, Project, Result};

use crate::utils::logging::{error_label, log_command_execution};
use crate::AppContext;

/// Fetch the project list; auto-selects the first project when nothing is
/// selected yet. An empty list tells the UI to show the creation form.
pub async fn list_projects(ctx: &Arc<AppContext>) -> Result<Vec<Project>> {
    let command_name = "projects::list_projects";
    let start = Instant::now();

    info!(command = command_name, "fetching projects");
    let result = ctx.catalog.load().await;

    // An auto-selected project becomes the tracker's booking target too
    if result.is_ok() {
        if let Some(project_id) = ctx.catalog.selected_id() {
            ctx.tracker.set_active_project(project_id);
        }
    }

    let error_type = result.as_ref().err().map(error_label);
    log_command_execution(command_name, start.elapsed(), result.is_ok(), error_type);
    result
}

/// Create a project and make it the active selection
pub async fn create_project(ctx: &Arc<AppContext>, project: NewProject) -> Result<Project> {
    let command_name = "projects::create_project";
    let start = Instant::now();

    info!(command = command_name, name = %project.name, "creating project");
    let result = async {
        let created = ctx.catalog.create(project).await?;
        ctx.tracker.set_active_project(created.id.clone());
        Ok(created)
    }
    .await;

    let error_type = result.as_ref().err().map(error_label);
    log_command_execution(command_name, start.elapsed(), result.is_ok(), error_type);
    result
}

/// Select an existing project for both the dashboard and the tracker
pub async fn select_project(ctx: &Arc<AppContext>, project_id: &str) -> Result<()> {
    let command_name = "projects::select_project";
    let start = Instant::now();

    info!(command = command_name, project_id, "selecting project");
    let result = ctx.dashboard.select_project(project_id);

    let error_type = result.as_ref().err().map(error_label);
    log_command_execution(command_name, start.elapsed(), result.is_ok(), error_type);
    result
}
