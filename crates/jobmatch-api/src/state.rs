//! Application state.

use std::sync::Arc;

use jobmatch_backend::{BackendClient, BackendResult};

use crate::config::ApiConfig;
use crate::guard::GuardConfig;
use crate::session::CookiePolicy;

/// Shared application state. Immutable after startup; holds no per-user data.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub backend: BackendClient,
    pub guard: Arc<GuardConfig>,
    pub cookies: CookiePolicy,
}

impl AppState {
    /// Create application state, reading the backend settings from the environment.
    pub fn new(config: ApiConfig) -> BackendResult<Self> {
        let backend = BackendClient::from_env()?;
        Ok(Self::with_backend(config, backend))
    }

    /// Create application state around an existing backend client.
    pub fn with_backend(config: ApiConfig, backend: BackendClient) -> Self {
        let cookies = CookiePolicy::from_config(&config);
        Self {
            config,
            backend,
            guard: Arc::new(GuardConfig::default()),
            cookies,
        }
    }

    /// Replace the route guard table.
    pub fn with_guard(mut self, guard: GuardConfig) -> Self {
        self.guard = Arc::new(guard);
        self
    }
}
