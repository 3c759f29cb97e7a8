//! API gateway
//!
//! Every backend call goes through here. The gateway joins the fixed
//! backend origin with the request path, forwards JSON bodies, and injects
//! `Authorization: Bearer <token>` from the token provider when the caller
//! has not supplied credentials of its own; when no token is stored the
//! request simply goes out anonymously (the auth endpoints rely on this).
//! Backend statuses are classified into [`ApiError`] variants with the
//! response body relayed into the message.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use worklens_domain::ApiConfig;

use super::auth::AccessTokenProvider;
use super::errors::ApiError;
use crate::http::HttpClient;

/// Configuration for the API gateway
#[derive(Debug, Clone)]
pub struct ApiGatewayConfig {
    /// Base URL for the backend, including the API prefix
    pub base_url: String,
    /// Timeout for API requests
    pub timeout: Duration,
}

impl Default for ApiGatewayConfig {
    fn default() -> Self {
        let api = ApiConfig::default();
        Self { base_url: api.origin, timeout: Duration::from_secs(api.timeout_seconds) }
    }
}

impl From<&ApiConfig> for ApiGatewayConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: config.origin.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

/// Token-injecting HTTP front door for the backend API
pub struct ApiGateway {
    http: HttpClient,
    auth: Arc<dyn AccessTokenProvider>,
    config: ApiGatewayConfig,
}

impl ApiGateway {
    pub fn new(
        config: ApiGatewayConfig,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self, ApiError> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HttpClient: {e}")))?;

        Ok(Self { http, auth, config })
    }

    /// Execute a GET request
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.execute(Method::GET, path, None).await
    }

    /// Execute a POST request with a JSON body
    pub async fn post<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::Client(format!("failed to serialize body: {e}")))?;
        self.execute(Method::POST, path, Some(body)).await
    }

    /// Execute a PUT request with a JSON body
    pub async fn put<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::Client(format!("failed to serialize body: {e}")))?;
        self.execute(Method::PUT, path, Some(body)).await
    }

    /// Execute a bodiless PUT, ignoring whatever the backend echoes back
    pub async fn put_empty(&self, path: &str) -> Result<(), ApiError> {
        let response = self.dispatch(Method::PUT, path, None).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, path, body));
        }
        Ok(())
    }

    async fn execute<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<R, ApiError> {
        let response = self.dispatch(method, path, body).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, path, body));
        }

        // 204/205 carry no body per RFC 9110
        if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
            return serde_json::from_value(serde_json::Value::Null).map_err(|_| {
                ApiError::Client(format!(
                    "no content response ({}), but the response type expects a body",
                    status.as_u16()
                ))
            });
        }

        response.json().await.map_err(|e| ApiError::Client(format!("failed to parse response: {e}")))
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.url(path);
        debug!(%method, url = %url, "api request");

        let mut request = self.http.request(method, &url).header("Accept", "application/json");

        match self.auth.access_token().await {
            Ok(token) => request = request.bearer_auth(token),
            Err(err) => debug!(error = %err, "no bearer token available; sending anonymously"),
        }

        if let Some(body) = &body {
            request = request.json(body);
        }

        match tokio::time::timeout(self.config.timeout, self.http.send(request)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(err)) => Err(ApiError::from(err)),
            Err(_) => Err(ApiError::Timeout(self.config.timeout)),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

fn map_status_error(status: StatusCode, path: &str, body: String) -> ApiError {
    let message = if body.is_empty() {
        format!("{path} returned status {status}")
    } else {
        format!("{path} returned status {status}: {body}")
    };

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        ApiError::Auth(message)
    } else if status == StatusCode::CONFLICT {
        ApiError::Conflict(message)
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        ApiError::RateLimit(message)
    } else if status.is_server_error() {
        ApiError::Server(message)
    } else if status.is_client_error() {
        ApiError::Client(message)
    } else {
        ApiError::Network(message)
    }
}
