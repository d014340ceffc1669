//! Route guard.
//!
//! A table of path patterns, each mapped to the session state it needs and
//! to what happens when that state is missing. The guard runs before any
//! handler, so a rejected request never reaches the backend.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use jobmatch_models::Role;
use tracing::debug;

use crate::error::ApiError;
use crate::metrics;
use crate::session::Session;
use crate::state::AppState;

/// Session state required by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Public,
    Authenticated,
    /// Authenticated, with a snapshot of the given role. Recruiters may
    /// additionally be required to belong to a company.
    Role { role: Role, require_company: bool },
}

/// Response policy for rejected requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnReject {
    /// JSON envelope: 401 without a session, 403 with the wrong role.
    Unauthorized,
    /// 303 to the login page.
    RedirectToLogin,
}

/// Path pattern. A trailing `/*` makes it a segment-aware prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    Exact(String),
    Prefix(String),
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix("/*") {
            Some(prefix) => PathPattern::Prefix(prefix.to_string()),
            None => PathPattern::Exact(pattern.to_string()),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        let path = trim_trailing_slash(path);
        match self {
            PathPattern::Exact(p) => path == p,
            PathPattern::Prefix(p) => match path.strip_prefix(p.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
        }
    }

    /// Longer patterns are more specific. Exact beats prefix on ties.
    fn specificity(&self) -> (usize, bool) {
        match self {
            PathPattern::Exact(p) => (p.len(), true),
            PathPattern::Prefix(p) => (p.len(), false),
        }
    }
}

fn trim_trailing_slash(path: &str) -> &str {
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}

#[derive(Debug, Clone)]
pub struct GuardRule {
    pub pattern: PathPattern,
    pub requirement: Requirement,
    pub on_reject: OnReject,
}

impl GuardRule {
    pub fn new(pattern: &str, requirement: Requirement, on_reject: OnReject) -> Self {
        Self {
            pattern: PathPattern::parse(pattern),
            requirement,
            on_reject,
        }
    }
}

/// Why a request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No session token.
    Unauthenticated,
    /// Token present, but the snapshot does not satisfy the role rule.
    Forbidden,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Unauthenticated => "unauthenticated",
            RejectReason::Forbidden => "forbidden",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Reject { reason: RejectReason, on_reject: OnReject },
}

/// The guard table.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    rules: Vec<GuardRule>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        use OnReject::{RedirectToLogin, Unauthorized};
        use Requirement::Authenticated;

        let company_recruiter = Requirement::Role {
            role: Role::Recruiter,
            require_company: true,
        };

        Self::new(vec![
            // API namespace
            GuardRule::new("/api/v1/auth/*", Authenticated, Unauthorized),
            GuardRule::new("/api/v1/auth/profile/company", company_recruiter, Unauthorized),
            GuardRule::new("/api/v1/logout", Authenticated, Unauthorized),
            GuardRule::new("/api/v1/session", Authenticated, Unauthorized),
            // Views
            GuardRule::new("/profile/edit", Authenticated, RedirectToLogin),
            GuardRule::new("/messages", Authenticated, RedirectToLogin),
            GuardRule::new("/notifications", Authenticated, RedirectToLogin),
            GuardRule::new("/job-postings/*", Authenticated, RedirectToLogin),
            GuardRule::new("/company/profile", company_recruiter, RedirectToLogin),
            GuardRule::new("/company/profile/edit", company_recruiter, RedirectToLogin),
        ])
    }
}

impl GuardConfig {
    pub fn new(rules: Vec<GuardRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[GuardRule] {
        &self.rules
    }

    /// Most specific rule matching `path`, if any.
    pub fn rule_for(&self, path: &str) -> Option<&GuardRule> {
        self.rules
            .iter()
            .filter(|r| r.pattern.matches(path))
            .max_by_key(|r| r.pattern.specificity())
    }

    /// Decide whether `session` may access `path`.
    pub fn check(&self, path: &str, session: &Session) -> GuardDecision {
        let Some(rule) = self.rule_for(path) else {
            return GuardDecision::Allow;
        };

        let reason = match rule.requirement {
            Requirement::Public => None,
            Requirement::Authenticated => {
                (!session.is_authenticated()).then_some(RejectReason::Unauthenticated)
            }
            Requirement::Role {
                role,
                require_company,
            } => {
                if !session.is_authenticated() {
                    Some(RejectReason::Unauthenticated)
                } else {
                    let satisfied = session.user.as_ref().is_some_and(|u| {
                        u.has_role(role) && (!require_company || u.company.is_some())
                    });
                    (!satisfied).then_some(RejectReason::Forbidden)
                }
            }
        };

        match reason {
            None => GuardDecision::Allow,
            Some(reason) => GuardDecision::Reject {
                reason,
                on_reject: rule.on_reject,
            },
        }
    }
}

/// Guard middleware.
pub async fn route_guard(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let session = Session::from_headers(request.headers());
    let path = request.uri().path().to_string();

    match state.guard.check(&path, &session) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::Reject { reason, on_reject } => {
            debug!(path = %path, reason = reason.as_str(), "Route guard rejected request");
            metrics::record_guard_rejection(reason.as_str());

            match (on_reject, reason) {
                (OnReject::RedirectToLogin, _) => {
                    Redirect::to(&state.config.login_path).into_response()
                }
                (OnReject::Unauthorized, RejectReason::Unauthenticated) => {
                    ApiError::unauthorized("Unauthorized").into_response()
                }
                (OnReject::Unauthorized, RejectReason::Forbidden) => {
                    ApiError::forbidden("Forbidden").into_response()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobmatch_models::SessionUser;

    fn anonymous() -> Session {
        Session::default()
    }

    fn with_user(role: Role, company: Option<i64>) -> Session {
        Session {
            token: Some("tok".into()),
            user: Some(SessionUser {
                id: 1,
                email: None,
                role,
                company,
            }),
        }
    }

    fn token_only() -> Session {
        Session {
            token: Some("tok".into()),
            user: None,
        }
    }

    fn rejected(reason: RejectReason, on_reject: OnReject) -> GuardDecision {
        GuardDecision::Reject { reason, on_reject }
    }

    #[test]
    fn test_prefix_is_segment_aware() {
        let p = PathPattern::parse("/api/v1/auth/*");
        assert!(p.matches("/api/v1/auth"));
        assert!(p.matches("/api/v1/auth/message/3"));
        assert!(!p.matches("/api/v1/authx"));
        assert!(!p.matches("/api/v1"));
    }

    #[test]
    fn test_exact_ignores_trailing_slash() {
        let p = PathPattern::parse("/profile/edit");
        assert!(p.matches("/profile/edit"));
        assert!(p.matches("/profile/edit/"));
        assert!(!p.matches("/profile/edit/more"));
    }

    #[test]
    fn test_unprotected_paths_are_allowed() {
        let guard = GuardConfig::default();
        for path in ["/", "/api/v1/login", "/api/v1/skills", "/company/profile/12", "/health"] {
            assert_eq!(guard.check(path, &anonymous()), GuardDecision::Allow, "{}", path);
        }
    }

    #[test]
    fn test_api_paths_reject_with_401() {
        let guard = GuardConfig::default();
        for path in ["/api/v1/auth/notification", "/api/v1/logout", "/api/v1/session"] {
            assert_eq!(
                guard.check(path, &anonymous()),
                rejected(RejectReason::Unauthenticated, OnReject::Unauthorized)
            );
            assert_eq!(guard.check(path, &token_only()), GuardDecision::Allow);
        }
    }

    #[test]
    fn test_view_paths_redirect() {
        let guard = GuardConfig::default();
        for path in ["/profile/edit", "/job-postings", "/job-postings/edit/4", "/messages"] {
            assert_eq!(
                guard.check(path, &anonymous()),
                rejected(RejectReason::Unauthenticated, OnReject::RedirectToLogin)
            );
        }
    }

    #[test]
    fn test_company_profile_requires_recruiter_with_company() {
        let guard = GuardConfig::default();
        let path = "/api/v1/auth/profile/company";

        assert_eq!(
            guard.check(path, &anonymous()),
            rejected(RejectReason::Unauthenticated, OnReject::Unauthorized)
        );
        assert_eq!(
            guard.check(path, &with_user(Role::Student, None)),
            rejected(RejectReason::Forbidden, OnReject::Unauthorized)
        );
        assert_eq!(
            guard.check(path, &with_user(Role::Recruiter, None)),
            rejected(RejectReason::Forbidden, OnReject::Unauthorized)
        );
        assert_eq!(
            guard.check(path, &token_only()),
            rejected(RejectReason::Forbidden, OnReject::Unauthorized)
        );
        assert_eq!(
            guard.check(path, &with_user(Role::Recruiter, Some(3))),
            GuardDecision::Allow
        );
    }

    #[test]
    fn test_company_profile_view_redirects_students() {
        let guard = GuardConfig::default();
        assert_eq!(
            guard.check("/company/profile/edit", &with_user(Role::Student, None)),
            rejected(RejectReason::Forbidden, OnReject::RedirectToLogin)
        );
    }

    #[test]
    fn test_most_specific_rule_wins() {
        let guard = GuardConfig::new(vec![
            GuardRule::new("/docs/*", Requirement::Authenticated, OnReject::Unauthorized),
            GuardRule::new("/docs/public/*", Requirement::Public, OnReject::Unauthorized),
        ]);
        assert_eq!(guard.check("/docs/public/intro", &anonymous()), GuardDecision::Allow);
        assert_eq!(
            guard.check("/docs/private", &anonymous()),
            rejected(RejectReason::Unauthenticated, OnReject::Unauthorized)
        );
    }
}
