//! Backend REST client.
//!
//! Every call is built fresh: the bearer token, when there is one, is passed
//! in by the caller for that single request and never stored on the client.

use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info_span, Instrument};
use url::Url;

pub use reqwest::Method;

use crate::error::{BackendError, BackendResult};
use crate::metrics::record_request;

/// Backend URL used when nothing is configured.
pub const DEFAULT_BACKEND_URL: &str = "https://localhost:3001";

// =============================================================================
// Configuration
// =============================================================================

/// Backend client configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the backend REST service
    pub base_url: Url,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl BackendConfig {
    /// Create a config for `base_url` with default timeouts.
    pub fn new(base_url: &str) -> BackendResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| BackendError::config(format!("invalid backend URL '{}': {}", base_url, e)))?;

        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            return Err(BackendError::config(format!(
                "backend URL must be http or https, got '{}'",
                base_url.scheme()
            )));
        }

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        })
    }

    /// Create config from environment variables.
    pub fn from_env() -> BackendResult<Self> {
        let base_url = std::env::var("BACKEND_URL")
            .or_else(|_| std::env::var("NEXT_PUBLIC_API_URL"))
            .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());

        let mut config = Self::new(&base_url)?;

        if let Some(secs) = std::env::var("BACKEND_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = std::env::var("BACKEND_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.connect_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

// =============================================================================
// Client
// =============================================================================

/// Backend REST client. Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new backend client.
    pub fn new(config: BackendConfig) -> BackendResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("jobmatch-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(BackendError::Network)?;

        let base_url = config.base_url.as_str().trim_end_matches('/').to_string();

        Ok(Self { http, base_url })
    }

    /// Create from environment variables.
    pub fn from_env() -> BackendResult<Self> {
        Self::new(BackendConfig::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Start building a call to `path` (relative to the base URL).
    pub fn request(&self, method: Method, path: impl Into<String>) -> BackendCall<'_> {
        BackendCall {
            client: self,
            method,
            path: path.into(),
            token: None,
            body: None,
            error: None,
            operation: "backend",
        }
    }

    pub fn get(&self, path: impl Into<String>) -> BackendCall<'_> {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: impl Into<String>) -> BackendCall<'_> {
        self.request(Method::POST, path)
    }

    pub fn patch(&self, path: impl Into<String>) -> BackendCall<'_> {
        self.request(Method::PATCH, path)
    }

    pub fn delete(&self, path: impl Into<String>) -> BackendCall<'_> {
        self.request(Method::DELETE, path)
    }

    /// Check that the backend answers HTTP at all. Any status counts.
    pub async fn ping(&self) -> BackendResult<u16> {
        let response = self.get("/").operation("ping").send().await?;
        Ok(response.status().as_u16())
    }
}

// =============================================================================
// Call builder
// =============================================================================

/// A single backend call under construction.
pub struct BackendCall<'a> {
    client: &'a BackendClient,
    method: Method,
    path: String,
    token: Option<String>,
    body: Option<Vec<u8>>,
    error: Option<BackendError>,
    operation: &'static str,
}

impl<'a> BackendCall<'a> {
    /// Attach `Authorization: Bearer <token>`.
    pub fn bearer(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        match serde_json::to_vec(body) {
            Ok(bytes) => self.body = Some(bytes),
            Err(e) => self.error = Some(BackendError::Json(e)),
        }
        self
    }

    /// Label used for metrics and tracing.
    pub fn operation(mut self, name: &'static str) -> Self {
        self.operation = name;
        self
    }

    /// Send the call. Non-2xx answers are returned as `Ok`; only transport
    /// failures are errors.
    pub async fn send(self) -> BackendResult<BackendResponse> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let url = self.client.url(&self.path);
        let span = info_span!(
            "backend_request",
            operation = %self.operation,
            method = %self.method,
            path = %self.path
        );

        let mut request = self
            .client
            .http
            .request(self.method, &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = self.body {
            request = request.body(body);
        }

        let start = Instant::now();
        let result = async {
            let response = request.send().await?;
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await?.to_vec();
            debug!(status = %status, bytes = body.len(), "Backend responded");
            Ok::<_, BackendError>(BackendResponse {
                status,
                headers,
                body,
            })
        }
        .instrument(span)
        .await;

        let status = match &result {
            Ok(response) => response.status.as_u16(),
            Err(_) => 0,
        };
        record_request(self.operation, status, start.elapsed().as_secs_f64());

        result
    }
}

// =============================================================================
// Response
// =============================================================================

/// Fully buffered backend response.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl BackendResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Bearer token from the `authorization` header, without the scheme.
    pub fn bearer_token(&self) -> Option<String> {
        let value = self.headers.get(AUTHORIZATION)?.to_str().ok()?;
        let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    /// Body as text (lossy).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the body as JSON. An empty body yields `null`.
    pub fn json_value(&self) -> BackendResult<Value> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Parse the body into a typed value.
    pub fn json<T: DeserializeOwned>(&self) -> BackendResult<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Turn a non-2xx answer into `BackendError::Status` carrying the body text.
    pub fn error_for_status(self) -> BackendResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(BackendError::from_http_status(self.status.as_u16(), self.text()))
        }
    }
}

/// Percent-encode a value for use as one path segment.
pub fn path_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
