//! Backend API adapters

mod auth;
mod errors;
mod gateway;
mod projects;
mod screenshots;
mod time_entries;

pub use auth::{
    AccessTokenProvider, AuthClient, InMemoryTokenStore, KeyringTokenStore, StoredTokenProvider,
    TokenStore,
};
pub use errors::{ApiError, ApiErrorCategory};
pub use gateway::{ApiGateway, ApiGatewayConfig};
pub use projects::ProjectsClient;
pub use screenshots::ScreenshotClient;
pub use time_entries::TimeEntryClient;
