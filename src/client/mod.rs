//! HTTP client for the Zentra API
//!
//! Provides a thin client over `reqwest` with one method per backend endpoint the
//! smoke scenario touches. Methods return the raw [`ApiResponse`] (status plus body
//! text) so the caller decides what a step expects; decoding and status checks are
//! tagged with the [`Step`] they belong to.

pub mod models;

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, trace};
use url::Url;

use crate::errors::{Result, SmokeError};
use crate::scenario::Step;
use models::{
    AddReactionRequest, CreateChannelRequest, CreateCommunityRequest, Envelope, LoginRequest, RegisterRequest, SendMessageRequest, UpdateProfileRequest,
};

/// Versioned API root of a locally running backend
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Request timeout applied when nothing else is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the versioned API (e.g., "http://localhost:8080/api/v1")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Enable request/response body logging
    pub verbose: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), timeout: DEFAULT_TIMEOUT_SECS, verbose: false }
    }
}

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    body: String,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Fail unless the status is exactly the one `step` requires
    pub fn expect_status(self, step: Step) -> Result<Self> {
        let expected = step.expected_status();
        if self.status != expected {
            return Err(SmokeError::UnexpectedStatus {
                step,
                expected,
                actual: self.status,
                body: self.body,
            });
        }
        Ok(self)
    }

    /// Decode the whole body as `T`
    pub fn json<T: DeserializeOwned>(&self, step: Step) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|source| SmokeError::Decode {
            step,
            source,
            body: self.body.clone(),
        })
    }

    /// Decode the `data` member of the response envelope as `T`
    pub fn data<T: DeserializeOwned>(&self, step: Step) -> Result<T> {
        self.json::<Envelope<T>>(step).map(|envelope| envelope.data)
    }
}

/// HTTP client for the Zentra API, optionally carrying a bearer token
#[derive(Debug, Clone)]
pub struct ZentraClient {
    client: Client,
    config: ClientConfig,
    base: Url,
    health_url: Url,
    token: Option<String>,
}

impl ZentraClient {
    /// Create an unauthenticated client with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            SmokeError::config(format!("Invalid base URL '{}': {}", config.base_url, e))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(SmokeError::config(format!(
                "Unsupported base URL scheme '{}': use http or https",
                base.scheme()
            )));
        }

        // The health endpoint lives at the server root, outside the versioned API path.
        let health_url = base
            .join("/health")
            .map_err(|e| SmokeError::config(format!("Unable to derive health URL: {}", e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| SmokeError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config, base, health_url, token: None })
    }

    /// A view of this client that sends `Authorization: Bearer <token>`.
    ///
    /// Shares the underlying connection pool.
    pub fn authenticated(&self, token: &str) -> Self {
        Self { token: Some(token.to_string()), ..self.clone() }
    }

    #[cfg(test)]
    fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn health_url(&self) -> &Url {
        &self.health_url
    }

    /// Append `segments` to the base URL, percent-encoding each one.
    ///
    /// Ids taken from responses are single segments; a `/` or `?` inside one
    /// stays inside it.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Build a request, attaching the bearer token when one is held
    pub fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        debug!("{} {}", method, url);

        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub fn get(&self, segments: &[&str]) -> RequestBuilder {
        self.request(Method::GET, segments)
    }

    pub fn post(&self, segments: &[&str]) -> RequestBuilder {
        self.request(Method::POST, segments)
    }

    pub fn patch(&self, segments: &[&str]) -> RequestBuilder {
        self.request(Method::PATCH, segments)
    }

    pub fn delete(&self, segments: &[&str]) -> RequestBuilder {
        self.request(Method::DELETE, segments)
    }

    /// Send a request and read the full body, whatever the status
    async fn execute(&self, builder: RequestBuilder) -> reqwest::Result<ApiResponse> {
        let response = builder.send().await?;
        let status = response.status();
        debug!("Response status: {}", status);

        let body = response.text().await?;
        if self.config.verbose && !body.is_empty() {
            trace!("Response body:\n{}", body);
        }

        Ok(ApiResponse { status, body })
    }

    async fn execute_json<T: Serialize>(
        &self,
        builder: RequestBuilder,
        body: &T,
    ) -> reqwest::Result<ApiResponse> {
        if self.config.verbose {
            let body_json = serde_json::to_string_pretty(body)
                .unwrap_or_else(|_| "<unable to serialize>".to_string());
            trace!("Request body:\n{}", body_json);
        }

        self.execute(builder.json(body)).await
    }

    // === Health ===

    pub async fn health(&self) -> reqwest::Result<ApiResponse> {
        debug!("GET {}", self.health_url);
        self.execute(self.client.get(self.health_url.clone())).await
    }

    // === Auth ===

    pub async fn register(&self, request: &RegisterRequest) -> reqwest::Result<ApiResponse> {
        self.execute_json(self.post(&["auth", "register"]), request).await
    }

    pub async fn login(&self, request: &LoginRequest) -> reqwest::Result<ApiResponse> {
        self.execute_json(self.post(&["auth", "login"]), request).await
    }

    // === Users ===

    pub async fn current_user(&self) -> reqwest::Result<ApiResponse> {
        self.execute(self.get(&["users", "me"])).await
    }

    pub async fn update_current_user(
        &self,
        request: &UpdateProfileRequest,
    ) -> reqwest::Result<ApiResponse> {
        self.execute_json(self.patch(&["users", "me"]), request).await
    }

    // === Communities & channels ===

    pub async fn create_community(
        &self,
        request: &CreateCommunityRequest,
    ) -> reqwest::Result<ApiResponse> {
        self.execute_json(self.post(&["communities"]), request).await
    }

    pub async fn list_communities(&self) -> reqwest::Result<ApiResponse> {
        self.execute(self.get(&["communities"])).await
    }

    pub async fn create_channel(
        &self,
        community_id: &str,
        request: &CreateChannelRequest,
    ) -> reqwest::Result<ApiResponse> {
        let segments = ["channels", "communities", community_id, "channels"];
        self.execute_json(self.post(&segments), request).await
    }

    // === Messages ===

    pub async fn send_message(
        &self,
        channel_id: &str,
        request: &SendMessageRequest,
    ) -> reqwest::Result<ApiResponse> {
        let segments = ["messages", "channels", channel_id, "messages"];
        self.execute_json(self.post(&segments), request).await
    }

    pub async fn list_messages(&self, channel_id: &str) -> reqwest::Result<ApiResponse> {
        self.execute(self.get(&["messages", "channels", channel_id, "messages"])).await
    }

    pub async fn get_message(&self, message_id: &str) -> reqwest::Result<ApiResponse> {
        self.execute(self.get(&["messages", message_id])).await
    }

    pub async fn delete_message(&self, message_id: &str) -> reqwest::Result<ApiResponse> {
        self.execute(self.delete(&["messages", message_id])).await
    }

    pub async fn add_reaction(
        &self,
        message_id: &str,
        request: &AddReactionRequest,
    ) -> reqwest::Result<ApiResponse> {
        self.execute_json(self.post(&["messages", message_id, "reactions"]), request).await
    }
}
