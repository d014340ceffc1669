//! Session user snapshot.
//!
//! A denormalized copy of the backend user taken at login time. It is kept
//! in the `user` cookie next to the token and is never refreshed until the
//! next login or logout, so it may be stale.

use serde::{Deserialize, Serialize};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Recruiter,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Recruiter => "recruiter",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of the logged-in user, as stored in the `user` cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Backend user ID.
    pub id: i64,
    /// Login email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Account role.
    pub role: Role,
    /// Company ID for recruiters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<i64>,
}

impl SessionUser {
    /// Parse a snapshot from its cookie value.
    pub fn from_cookie_value(value: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(value)
    }

    /// Serialize the snapshot into a cookie value.
    pub fn to_cookie_value(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Check whether this user has the given role.
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    /// True if this user is `target_id` acting in `required_role`.
    pub fn is_owner(&self, target_id: i64, required_role: Role) -> bool {
        self.role == required_role && self.id == target_id
    }

    /// True if this user is a recruiter attached to `company_id`.
    pub fn owns_company(&self, company_id: i64) -> bool {
        self.role == Role::Recruiter && self.company == Some(company_id)
    }
}

/// Ownership check that tolerates a missing session.
pub fn is_owner(user: Option<&SessionUser>, target_id: i64, required_role: Role) -> bool {
    user.is_some_and(|u| u.is_owner(target_id, required_role))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_serializes_without_optional_fields() {
        let user = SessionUser {
            id: 1,
            email: None,
            role: Role::Student,
            company: None,
        };
        assert_eq!(user.to_cookie_value().unwrap(), r#"{"id":1,"role":"student"}"#);
    }

    #[test]
    fn test_snapshot_parses_backend_user() {
        let user = SessionUser::from_cookie_value(
            r#"{"id":7,"email":"hr@example.com","role":"recruiter","company":3,"name":"ignored"}"#,
        )
        .unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.role, Role::Recruiter);
        assert_eq!(user.company, Some(3));
        assert!(user.owns_company(3));
        assert!(!user.owns_company(4));
    }

    #[test]
    fn test_snapshot_accepts_null_company() {
        let user =
            SessionUser::from_cookie_value(r#"{"id":2,"role":"recruiter","company":null}"#).unwrap();
        assert_eq!(user.company, None);
        assert!(!user.owns_company(0));
    }

    #[test]
    fn test_snapshot_rejects_unknown_role() {
        assert!(SessionUser::from_cookie_value(r#"{"id":1,"role":"admin"}"#).is_err());
        assert!(SessionUser::from_cookie_value("not json").is_err());
    }

    #[test]
    fn test_is_owner() {
        let student = SessionUser {
            id: 5,
            email: Some("s@example.com".into()),
            role: Role::Student,
            company: None,
        };
        assert!(is_owner(Some(&student), 5, Role::Student));
        assert!(!is_owner(Some(&student), 5, Role::Recruiter));
        assert!(!is_owner(Some(&student), 6, Role::Student));
        assert!(!is_owner(None, 5, Role::Student));
    }
}
