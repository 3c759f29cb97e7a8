//! Project catalog - list, create, and select projects
//!
//! Selection here is the dashboard's "currently editing" choice, kept
//! separate from the tracker's active project (the tracker only learns
//! about a project when the orchestrator forwards the selection).

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;
use worklens_domain::{NewProject, Project, Result, WorkLensError};

use super::ports::ProjectsGateway;

#[derive(Default)]
struct CatalogState {
    projects: Vec<Project>,
    selected_id: Option<String>,
}

/// Cached project list with a current selection
pub struct ProjectCatalog {
    gateway: Arc<dyn ProjectsGateway>,
    state: Mutex<CatalogState>,
}

impl ProjectCatalog {
    pub fn new(gateway: Arc<dyn ProjectsGateway>) -> Self {
        Self { gateway, state: Mutex::new(CatalogState::default()) }
    }

    /// Fetch the project list; the first project is auto-selected when
    /// nothing is selected yet.
    pub async fn load(&self) -> Result<Vec<Project>> {
        let projects = self.gateway.list().await?;

        let mut state = self.state.lock();
        if state.selected_id.is_none() {
            if let Some(first) = projects.first() {
                info!(project_id = %first.id, "auto-selected first project");
                state.selected_id = Some(first.id.clone());
            }
        }
        state.projects = projects.clone();
        Ok(projects)
    }

    /// Create a project and select it
    pub async fn create(&self, project: NewProject) -> Result<Project> {
        if project.name.trim().is_empty() {
            return Err(WorkLensError::InvalidInput("project name is required".into()));
        }

        let created = self.gateway.create(project).await?;
        info!(project_id = %created.id, name = %created.name, "project created");

        let mut state = self.state.lock();
        state.selected_id = Some(created.id.clone());
        state.projects.push(created.clone());
        Ok(created)
    }

    /// Select a project from the cached list
    pub fn select(&self, project_id: impl Into<String>) -> Result<()> {
        let project_id = project_id.into();
        let mut state = self.state.lock();
        if !state.projects.iter().any(|p| p.id == project_id) {
            return Err(WorkLensError::NotFound(format!("unknown project: {project_id}")));
        }
        state.selected_id = Some(project_id);
        Ok(())
    }

    pub fn selected_id(&self) -> Option<String> {
        self.state.lock().selected_id.clone()
    }

    pub fn projects(&self) -> Vec<Project> {
        self.state.lock().projects.clone()
    }

    /// An empty catalog means the UI shows the creation form
    pub fn needs_creation(&self) -> bool {
        self.state.lock().projects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use worklens_domain::ProjectStatus;

    use super::*;

    #[derive(Default)]
    struct MockProjects {
        list_calls: AtomicUsize,
        create_calls: AtomicUsize,
        seeded: Mutex<Vec<Project>>,
    }

    fn project(id: &str, name: &str) -> Project {
        Project {
            id: id.into(),
            name: name.into(),
            description: None,
            client_name: None,
            budget: None,
            color: None,
            status: ProjectStatus::Active,
        }
    }

    #[async_trait]
    impl ProjectsGateway for MockProjects {
        async fn list(&self) -> Result<Vec<Project>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.seeded.lock().clone())
        }

        async fn create(&self, new: NewProject) -> Result<Project> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            Ok(project("p-new", &new.name))
        }
    }

    #[tokio::test]
    async fn empty_list_requires_creation() {
        let gateway = Arc::new(MockProjects::default());
        let catalog = ProjectCatalog::new(gateway.clone());

        let projects = catalog.load().await.unwrap();

        assert!(projects.is_empty());
        assert!(catalog.needs_creation());
        assert!(catalog.selected_id().is_none());
    }

    #[tokio::test]
    async fn creating_a_project_posts_once_and_selects_it() {
        let gateway = Arc::new(MockProjects::default());
        let catalog = ProjectCatalog::new(gateway.clone());
        catalog.load().await.unwrap();

        let created = catalog.create(NewProject::named("Acme")).await.unwrap();

        assert_eq!(gateway.create_calls.load(Ordering::SeqCst), 1);
        assert_eq!(created.name, "Acme");
        assert_eq!(catalog.selected_id().as_deref(), Some("p-new"));
        assert!(!catalog.needs_creation());
    }

    #[tokio::test]
    async fn blank_names_are_rejected_without_a_call() {
        let gateway = Arc::new(MockProjects::default());
        let catalog = ProjectCatalog::new(gateway.clone());

        let result = catalog.create(NewProject::named("   ")).await;

        assert!(matches!(result, Err(WorkLensError::InvalidInput(_))));
        assert_eq!(gateway.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn first_project_is_auto_selected() {
        let gateway = Arc::new(MockProjects::default());
        *gateway.seeded.lock() = vec![project("p1", "Alpha"), project("p2", "Beta")];
        let catalog = ProjectCatalog::new(gateway.clone());

        catalog.load().await.unwrap();

        assert_eq!(catalog.selected_id().as_deref(), Some("p1"));

        // An explicit selection survives a reload
        catalog.select("p2").unwrap();
        catalog.load().await.unwrap();
        assert_eq!(catalog.selected_id().as_deref(), Some("p2"));
    }

    #[tokio::test]
    async fn selecting_an_unknown_project_fails() {
        let gateway = Arc::new(MockProjects::default());
        let catalog = ProjectCatalog::new(gateway.clone());
        catalog.load().await.unwrap();

        assert!(matches!(catalog.select("ghost"), Err(WorkLensError::NotFound(_))));
    }
}
