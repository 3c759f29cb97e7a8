//! Authentication: backend login/registration and token storage
//!
//! Tokens live in the OS keyring between runs, with the short access /
//! longer refresh expirations the backend issues them under. The gateway
//! reads the access token through [`AccessTokenProvider`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use worklens_domain::{AuthResponse, Credentials, Registration, Role, StoredTokens, User};

use super::errors::ApiError;
use super::gateway::ApiGateway;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid access token
    async fn access_token(&self) -> Result<String, ApiError>;
}

/// Trait for persisting auth tokens between runs
pub trait TokenStore: Send + Sync {
    fn save(&self, tokens: &StoredTokens) -> Result<(), ApiError>;
    fn load(&self) -> Result<Option<StoredTokens>, ApiError>;
    fn clear(&self) -> Result<(), ApiError>;
}

/// Token store backed by the OS keyring
pub struct KeyringTokenStore {
    service: String,
    account: String,
}

impl KeyringTokenStore {
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self { service: service.into(), account: account.into() }
    }

    fn entry(&self) -> Result<keyring::Entry, ApiError> {
        keyring::Entry::new(&self.service, &self.account)
            .map_err(|e| ApiError::Config(format!("keyring unavailable: {e}")))
    }
}

impl TokenStore for KeyringTokenStore {
    fn save(&self, tokens: &StoredTokens) -> Result<(), ApiError> {
        let payload = serde_json::to_string(tokens)
            .map_err(|e| ApiError::Config(format!("failed to serialize tokens: {e}")))?;
        self.entry()?
            .set_password(&payload)
            .map_err(|e| ApiError::Config(format!("failed to store tokens: {e}")))
    }

    fn load(&self) -> Result<Option<StoredTokens>, ApiError> {
        match self.entry()?.get_password() {
            Ok(payload) => serde_json::from_str(&payload)
                .map(Some)
                .map_err(|e| ApiError::Config(format!("stored tokens are corrupt: {e}"))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(ApiError::Config(format!("failed to read tokens: {e}"))),
        }
    }

    fn clear(&self) -> Result<(), ApiError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(ApiError::Config(format!("failed to clear tokens: {e}"))),
        }
    }
}

/// Process-local token store for tests and keyring-less environments
#[derive(Default)]
pub struct InMemoryTokenStore {
    inner: Mutex<Option<StoredTokens>>,
}

impl TokenStore for InMemoryTokenStore {
    fn save(&self, tokens: &StoredTokens) -> Result<(), ApiError> {
        *self.inner.lock() = Some(tokens.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<StoredTokens>, ApiError> {
        Ok(self.inner.lock().clone())
    }

    fn clear(&self) -> Result<(), ApiError> {
        *self.inner.lock() = None;
        Ok(())
    }
}

/// Serves the stored access token, refusing expired ones
pub struct StoredTokenProvider {
    store: Arc<dyn TokenStore>,
}

impl StoredTokenProvider {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AccessTokenProvider for StoredTokenProvider {
    async fn access_token(&self) -> Result<String, ApiError> {
        let tokens =
            self.store.load()?.ok_or_else(|| ApiError::Auth("no stored tokens".into()))?;
        if !tokens.access_valid(Utc::now()) {
            return Err(ApiError::Auth("access token expired".into()));
        }
        Ok(tokens.access_token)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    company_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    company_domain: Option<&'a str>,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthResponseDto {
    access_token: String,
    refresh_token: String,
    user: UserDto,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    id: String,
    name: String,
    email: String,
    role: Role,
    company_id: String,
}

impl AuthResponseDto {
    fn into_domain(self) -> AuthResponse {
        AuthResponse {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            user: User {
                id: self.user.id,
                name: self.user.name,
                email: self.user.email,
                role: self.user.role,
                company_id: self.user.company_id,
            },
        }
    }
}

/// Login and registration against the backend
pub struct AuthClient {
    gateway: Arc<ApiGateway>,
    store: Arc<dyn TokenStore>,
}

impl AuthClient {
    pub fn new(gateway: Arc<ApiGateway>, store: Arc<dyn TokenStore>) -> Self {
        Self { gateway, store }
    }

    /// Sign in and persist the issued tokens
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let response: AuthResponseDto = self.gateway.post("/auth/login", credentials).await?;
        let response = response.into_domain();
        self.persist(&response)?;
        info!(user_id = %response.user.id, "signed in");
        Ok(response)
    }

    /// Register a new account and persist the issued tokens.
    ///
    /// A backend 409 means the email or company domain is already taken and
    /// is surfaced with its own message.
    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        let request = RegisterRequest {
            name: &registration.name,
            email: &registration.email,
            company_name: &registration.company_name,
            company_domain: registration.company_domain.as_deref(),
            password: &registration.password,
        };

        let response: AuthResponseDto =
            self.gateway.post("/auth/register", &request).await.map_err(|err| match err {
                ApiError::Conflict(_) => {
                    ApiError::Conflict("email or company domain already in use".into())
                }
                other => other,
            })?;
        let response = response.into_domain();
        self.persist(&response)?;
        info!(user_id = %response.user.id, "account registered");
        Ok(response)
    }

    /// Drop the persisted tokens
    pub fn logout(&self) -> Result<(), ApiError> {
        debug!("clearing stored tokens");
        self.store.clear()
    }

    fn persist(&self, response: &AuthResponse) -> Result<(), ApiError> {
        let tokens = StoredTokens::issue(
            response.access_token.clone(),
            response.refresh_token.clone(),
            Utc::now(),
        );
        self.store.save(&tokens)
    }
}
