//! Single-attempt HTTP transport shared by the API gateway.
//!
//! Nothing in this system retries automatically, so there is no retry or
//! backoff machinery here: one request goes out, and whatever comes back
//! (or fails) is surfaced to the caller as-is.

use std::time::{Duration, Instant};

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;
use worklens_domain::WorkLensError;

use crate::errors::InfraError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin wrapper around reqwest with timeout and request/response logging
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, WorkLensError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder, once.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, WorkLensError> {
        let request = builder.build().map_err(to_domain)?;
        let method = request.method().clone();
        let url = request.url().clone();

        let started = Instant::now();
        let outcome = self.client.execute(request).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(response) => {
                debug!(%method, %url, status = %response.status(), elapsed_ms, "http response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, elapsed_ms, error = %err, "http request failed");
                Err(to_domain(err))
            }
        }
    }
}

fn to_domain(err: reqwest::Error) -> WorkLensError {
    let infra: InfraError = err.into();
    infra.into()
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: String,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("worklens/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    pub fn build(self) -> Result<HttpClient, WorkLensError> {
        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .no_proxy()
            .build()
            .map_err(to_domain)?;

        Ok(HttpClient { client })
    }
}
