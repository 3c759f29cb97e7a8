//! Projects client

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use worklens_core::projects::ProjectsGateway;
use worklens_domain::{NewProject, Project, ProjectStatus, Result};

use super::gateway::ApiGateway;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateProjectRequest<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<&'a str>,
    status: ProjectStatus,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectDto {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    client_name: Option<String>,
    #[serde(default)]
    budget: Option<f64>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default = "default_status")]
    status: ProjectStatus,
}

fn default_status() -> ProjectStatus {
    ProjectStatus::Active
}

impl ProjectDto {
    fn into_domain(self) -> Project {
        Project {
            id: self.id,
            name: self.name,
            description: self.description,
            client_name: self.client_name,
            budget: self.budget,
            color: self.color,
            status: self.status,
        }
    }
}

/// Backend client for `/projects`
pub struct ProjectsClient {
    gateway: Arc<ApiGateway>,
}

impl ProjectsClient {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl ProjectsGateway for ProjectsClient {
    async fn list(&self) -> Result<Vec<Project>> {
        let projects: Vec<ProjectDto> = self.gateway.get("/projects").await?;
        Ok(projects.into_iter().map(ProjectDto::into_domain).collect())
    }

    async fn create(&self, project: NewProject) -> Result<Project> {
        let request = CreateProjectRequest {
            name: &project.name,
            description: project.description.as_deref(),
            client_name: project.client_name.as_deref(),
            budget: project.budget,
            color: project.color.as_deref(),
            status: project.status,
        };
        let created: ProjectDto = self.gateway.post("/projects", &request).await?;
        Ok(created.into_domain())
    }
}
