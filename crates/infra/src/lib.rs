//! # WorkLens Infra
//!
//! Infrastructure adapters for WorkLens.
//!
//! This crate contains:
//! - HTTP client wrapper
//! - API gateway with bearer-token injection and the typed backend clients
//! - Token storage (OS keyring and in-memory)
//! - Configuration loader
//! - Platform screen-capture sources
//!
//! ## Architecture
//! - Implements the port traits defined in `worklens-core`
//! - Depends on `worklens-domain` and `worklens-core`

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod platform;

// Re-export for convenience
pub use api::{
    AccessTokenProvider, ApiError, ApiGateway, ApiGatewayConfig, AuthClient, InMemoryTokenStore,
    KeyringTokenStore, ProjectsClient, ScreenshotClient, StoredTokenProvider, TimeEntryClient,
    TokenStore,
};
pub use errors::InfraError;
pub use http::HttpClient;
pub use platform::default_screen_source;
