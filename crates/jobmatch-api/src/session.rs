//! Cookie-backed session.
//!
//! Two cookies make up a session: `token` (opaque backend bearer token) and
//! `user` (JSON snapshot of the logged-in user). They are written and
//! cleared together with identical attributes. Nothing here is cached
//! across requests; every extractor re-reads the cookies of the request it
//! is handed.

use std::convert::Infallible;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jobmatch_models::SessionUser;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::ApiError;

/// Cookie holding the backend bearer token.
pub const TOKEN_COOKIE: &str = "token";

/// Cookie holding the JSON user snapshot.
pub const USER_COOKIE: &str = "user";

/// Attributes shared by both session cookies.
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    pub secure: bool,
    pub max_age: time::Duration,
}

impl CookiePolicy {
    pub fn from_config(config: &ApiConfig) -> Self {
        let secs = i64::try_from(config.session_max_age.as_secs()).unwrap_or(i64::MAX);
        Self {
            secure: config.is_production(),
            max_age: time::Duration::seconds(secs),
        }
    }

    fn cookie(&self, name: &'static str, value: String) -> Cookie<'static> {
        Cookie::build((name, value))
            .http_only(true)
            .secure(self.secure)
            .path("/")
            .same_site(SameSite::Lax)
            .max_age(self.max_age)
            .build()
    }
}

/// Write both session cookies.
pub fn start_session(
    jar: CookieJar,
    policy: &CookiePolicy,
    token: &str,
    user: &SessionUser,
) -> Result<CookieJar, serde_json::Error> {
    let snapshot = user.to_cookie_value()?;
    Ok(jar
        .add(policy.cookie(TOKEN_COOKIE, token.to_string()))
        .add(policy.cookie(USER_COOKIE, snapshot)))
}

/// Expire both session cookies.
///
/// Removal cookies are always emitted, even when the request did not carry
/// one of them, so the pair can never be left half-cleared.
pub fn end_session(jar: CookieJar, policy: &CookiePolicy) -> CookieJar {
    let mut token = policy.cookie(TOKEN_COOKIE, String::new());
    token.make_removal();
    let mut user = policy.cookie(USER_COOKIE, String::new());
    user.make_removal();
    jar.add(token).add(user)
}

// =============================================================================
// Extractors
// =============================================================================

/// Session state of the current request. Either part may be missing.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<SessionUser>,
}

impl Session {
    pub fn from_jar(jar: &CookieJar) -> Self {
        let token = jar
            .get(TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|t| !t.is_empty());

        let user = jar.get(USER_COOKIE).and_then(|c| {
            SessionUser::from_cookie_value(c.value())
                .map_err(|e| debug!("Ignoring unreadable user cookie: {}", e))
                .ok()
        });

        Self { token, user }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::from_jar(&CookieJar::from_headers(headers))
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Session::from_headers(&parts.headers))
    }
}

/// Bearer token of the current request. Rejects with 401 when absent.
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Session::from_headers(&parts.headers)
            .token
            .map(SessionToken)
            .ok_or_else(|| ApiError::unauthorized("Unauthorized"))
    }
}

/// Token plus user snapshot. Rejects with 401 unless both are present.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub token: String,
    pub user: SessionUser,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match Session::from_headers(&parts.headers) {
            Session {
                token: Some(token),
                user: Some(user),
            } => Ok(CurrentUser { token, user }),
            _ => Err(ApiError::unauthorized("Unauthorized")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;
    use jobmatch_models::Role;

    fn policy() -> CookiePolicy {
        CookiePolicy {
            secure: false,
            max_age: time::Duration::minutes(30),
        }
    }

    fn student() -> SessionUser {
        SessionUser {
            id: 1,
            email: None,
            role: Role::Student,
            company: None,
        }
    }

    #[test]
    fn test_policy_follows_environment() {
        let mut config = ApiConfig::default();
        assert!(!CookiePolicy::from_config(&config).secure);
        config.environment = "production".to_string();
        let policy = CookiePolicy::from_config(&config);
        assert!(policy.secure);
        assert_eq!(policy.max_age, time::Duration::minutes(30));
    }

    #[test]
    fn test_start_session_sets_matching_cookies() {
        let jar = start_session(CookieJar::new(), &policy(), "abc123", &student()).unwrap();

        let token = jar.get(TOKEN_COOKIE).unwrap();
        let user = jar.get(USER_COOKIE).unwrap();
        assert_eq!(token.value(), "abc123");
        assert_eq!(user.value(), r#"{"id":1,"role":"student"}"#);
        for cookie in [token, user] {
            assert_eq!(cookie.http_only(), Some(true));
            assert_eq!(cookie.path(), Some("/"));
            assert_eq!(cookie.max_age(), Some(time::Duration::minutes(30)));
        }
    }

    #[test]
    fn test_end_session_expires_both() {
        let jar = start_session(CookieJar::new(), &policy(), "abc123", &student()).unwrap();
        let jar = end_session(jar, &policy());
        for name in [TOKEN_COOKIE, USER_COOKIE] {
            let cookie = jar.get(name).unwrap();
            assert_eq!(cookie.value(), "");
            assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
        }
    }

    #[test]
    fn test_session_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            r#"token=t-1; user={"id":4,"role":"recruiter","company":2}"#.parse().unwrap(),
        );
        let session = Session::from_headers(&headers);
        assert_eq!(session.token.as_deref(), Some("t-1"));
        assert_eq!(session.user.unwrap().company, Some(2));
    }

    #[test]
    fn test_garbled_snapshot_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, "token=t-1; user=garbage".parse().unwrap());
        let session = Session::from_headers(&headers);
        assert!(session.is_authenticated());
        assert!(session.user.is_none());
    }

    #[test]
    fn test_empty_token_is_unauthenticated() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, "token=".parse().unwrap());
        assert!(!Session::from_headers(&headers).is_authenticated());
    }
}
