//! Port interface for the projects backend

use async_trait::async_trait;
use worklens_domain::{NewProject, Project, Result};

/// Trait for listing and creating projects
#[async_trait]
pub trait ProjectsGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<Project>>;

    async fn create(&self, project: NewProject) -> Result<Project>;
}
