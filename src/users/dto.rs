use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::users::repo_types::{Role, User};

/// Request body for registration. Fields are optional at the serde level so
/// that missing ones are reported by name with a 400 instead of a decode
/// rejection; empty strings count as missing.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub id_number: Option<String>,
    #[serde(default)]
    pub birthdate: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl RegisterRequest {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.username.as_deref().unwrap_or("").is_empty() {
            missing.push("username");
        }
        if self.password.as_deref().unwrap_or("").is_empty() {
            missing.push("password");
        }
        if self.id_number.as_deref().unwrap_or("").is_empty() {
            missing.push("id_number");
        }
        if self.birthdate.as_deref().unwrap_or("").is_empty() {
            missing.push("birthdate");
        }
        missing
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Profile echoed back on registration; no id yet exposed beyond `user_id`.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub username: String,
    pub id_number: String,
    pub birthdate: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: String,
    pub user: PublicUser,
}

/// Profile returned on login and profile lookup, id included so the client
/// can address appointment routes.
#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub username: String,
    pub id_number: String,
    pub birthdate: String,
    pub user_id: String,
    pub role: Role,
}

impl From<User> for SessionUser {
    fn from(u: User) -> Self {
        Self {
            username: u.username,
            id_number: u.id_number,
            birthdate: u.birthdate,
            user_id: u.id,
            role: u.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: SessionUser,
}

#[derive(Debug, Serialize)]
pub struct ProfileUser {
    pub username: String,
    pub id_number: String,
    pub birthdate: String,
    pub user_id: String,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for ProfileUser {
    fn from(u: User) -> Self {
        Self {
            username: u.username,
            id_number: u.id_number,
            birthdate: u.birthdate,
            user_id: u.id,
            role: u.role,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub message: String,
    pub user: ProfileUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_reports_empty_and_absent_alike() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"username": "alice", "password": "", "birthdate": "2000-01-01"}"#,
        )
        .unwrap();
        assert_eq!(req.missing_fields(), vec!["password", "id_number"]);
    }

    #[test]
    fn complete_request_has_no_missing_fields() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"username": "alice", "password": "secret1", "id_number": "A1", "birthdate": "2000-01-01"}"#,
        )
        .unwrap();
        assert!(req.missing_fields().is_empty());
        assert_eq!(req.role, None);
    }

    #[test]
    fn session_user_serializes_role_and_user_id() {
        let json = serde_json::to_value(SessionUser {
            username: "alice".into(),
            id_number: "A1".into(),
            birthdate: "2000-01-01".into(),
            user_id: "u-1".into(),
            role: Role::Admin,
        })
        .unwrap();
        assert_eq!(json["role"], "admin");
        assert_eq!(json["user_id"], "u-1");
    }
}
