//! API configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default text sent to the backend when a student applies to a posting.
pub const DEFAULT_APPLY_MESSAGE: &str = "学生からの応募がありました。";

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Rate limit requests per second (per IP)
    pub rate_limit_rps: u32,
    /// Rate limit for the login route (per IP)
    pub login_rate_limit_rps: u32,
    /// Key rate limits on `X-Forwarded-For`/`X-Real-IP` (only behind a proxy)
    pub trust_proxy_headers: bool,
    /// Max request body size
    pub max_body_size: usize,
    /// Per-request timeout for inbound requests
    pub request_timeout: Duration,
    /// Environment (development/production)
    pub environment: String,
    /// Lifetime of the session cookies
    pub session_max_age: Duration,
    /// Where unauthenticated page requests are redirected
    pub login_path: String,
    /// Optional directory holding the built client bundle
    pub static_dir: Option<PathBuf>,
    /// Notification text forwarded with job applications
    pub apply_message: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["http://localhost:3000".to_string()],
            rate_limit_rps: 20,
            login_rate_limit_rps: 5,
            trust_proxy_headers: false,
            max_body_size: 1024 * 1024, // 1MB
            request_timeout: Duration::from_secs(30),
            environment: "development".to_string(),
            session_max_age: Duration::from_secs(30 * 60),
            login_path: "/login".to_string(),
            static_dir: None,
            apply_message: DEFAULT_APPLY_MESSAGE.to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: parse_env("API_PORT").unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            rate_limit_rps: parse_env("RATE_LIMIT_RPS").unwrap_or(defaults.rate_limit_rps),
            login_rate_limit_rps: parse_env("LOGIN_RATE_LIMIT_RPS")
                .unwrap_or(defaults.login_rate_limit_rps),
            trust_proxy_headers: parse_env("TRUST_PROXY_HEADERS")
                .unwrap_or(defaults.trust_proxy_headers),
            max_body_size: parse_env("MAX_BODY_SIZE").unwrap_or(defaults.max_body_size),
            request_timeout: parse_env("REQUEST_TIMEOUT")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            session_max_age: parse_env("SESSION_MAX_AGE_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.session_max_age),
            login_path: std::env::var("LOGIN_PATH").unwrap_or(defaults.login_path),
            static_dir: std::env::var("STATIC_DIR")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            apply_message: std::env::var("APPLY_MESSAGE").unwrap_or(defaults.apply_message),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}
