//! Application context - dependency injection container

use std::sync::Arc;

use tracing::info;
use worklens_core::capture::{EntryTagSource, ScreenSource, ScreenshotSink};
use worklens_core::session::SessionEvent;
use worklens_core::tracker::{Clock, SystemClock};
use worklens_core::{
    CaptureCoordinator, DashboardService, ProjectCatalog, SessionService, TrackerService,
};
use worklens_domain::{Config, Result, WorkLensError};
use worklens_infra::api::{
    ApiGateway, ApiGatewayConfig, AuthClient, KeyringTokenStore, ProjectsClient, ScreenshotClient,
    StoredTokenProvider, TimeEntryClient, TokenStore,
};
use worklens_infra::platform::default_screen_source;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub session: Arc<SessionService>,
    pub tracker: Arc<TrackerService>,
    pub catalog: Arc<ProjectCatalog>,
    pub capture: Arc<CaptureCoordinator>,
    pub dashboard: Arc<DashboardService>,
    pub auth: Arc<AuthClient>,
    pub screenshots: Arc<ScreenshotClient>,
}

impl AppContext {
    /// Build the context with the platform screen source and keyring token
    /// storage.
    pub async fn new(config: Config) -> Result<Arc<Self>> {
        let token_store: Arc<dyn TokenStore> = Arc::new(KeyringTokenStore::new(
            config.auth.keyring_service.clone(),
            config.auth.keyring_account.clone(),
        ));
        Self::with_components(config, token_store, default_screen_source()).await
    }

    /// Build the context around injected infrastructure.
    ///
    /// Tests and alternative shells use this to swap in an in-memory token
    /// store or a fake screen source.
    pub async fn with_components(
        config: Config,
        token_store: Arc<dyn TokenStore>,
        screen_source: Arc<dyn ScreenSource>,
    ) -> Result<Arc<Self>> {
        let provider = Arc::new(StoredTokenProvider::new(Arc::clone(&token_store)));
        let gateway = Arc::new(
            ApiGateway::new(ApiGatewayConfig::from(&config.api), provider)
                .map_err(WorkLensError::from)?,
        );

        let auth = Arc::new(AuthClient::new(Arc::clone(&gateway), token_store));
        let screenshots = Arc::new(ScreenshotClient::new(Arc::clone(&gateway)));
        let time_entries = Arc::new(TimeEntryClient::new(Arc::clone(&gateway)));
        let projects = Arc::new(ProjectsClient::new(Arc::clone(&gateway)));

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let session = Arc::new(SessionService::new());
        let tracker =
            Arc::new(TrackerService::new(time_entries, Arc::clone(&clock), Arc::clone(&session)));
        let catalog = Arc::new(ProjectCatalog::new(projects));
        let capture = Arc::new(CaptureCoordinator::new(
            screen_source,
            Arc::clone(&screenshots) as Arc<dyn ScreenshotSink>,
            Arc::clone(&tracker) as Arc<dyn EntryTagSource>,
            clock,
            &config.capture,
        ));
        let dashboard = Arc::new(DashboardService::new(
            Arc::clone(&session),
            Arc::clone(&tracker),
            Arc::clone(&catalog),
            Arc::clone(&capture),
        ));

        // Reset the tracker whenever the session ends
        {
            let mut events = session.subscribe();
            let tracker = Arc::clone(&tracker);
            tokio::spawn(async move {
                while let Ok(event) = events.recv().await {
                    match event {
                        SessionEvent::LoggedOut => tracker.reset(),
                    }
                }
            });
        }

        // A capture revocation must also stop the backend timer
        let _ = Arc::clone(&dashboard).spawn_revocation_watcher();

        info!("application context initialised");
        Ok(Arc::new(Self {
            config,
            session,
            tracker,
            catalog,
            capture,
            dashboard,
            auth,
            screenshots,
        }))
    }

    /// Release the capture stream; background tasks end with the runtime
    pub async fn shutdown(&self) {
        self.capture.stop_tracking();
        info!("application context shut down");
    }
}
