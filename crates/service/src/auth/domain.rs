use chrono::{DateTime, Utc};
use models::user::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public self-service registration input
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub newsletter: bool,
}

/// Admin-issued registration input; role defaults to staff
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Login input
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Profile update input; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Settings update input: phone and newsletter preference only
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSettingsInput {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub newsletter: Option<bool>,
}

/// Password change input
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
}

/// Domain user (business view, never carries password material)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub permissions: Vec<String>,
    pub is_active: bool,
    pub newsletter: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AuthUser {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Fields required to create a user record
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub permissions: Vec<String>,
    pub newsletter: bool,
}

/// Partial update applied to a user record
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub newsletter: Option<bool>,
    pub is_active: Option<bool>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Filters for the admin user listing
#[derive(Debug, Clone, Copy, Default)]
pub struct UserListFilter {
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

/// Domain credentials (hashed)
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: Uuid,
    pub password_hash: String,
    pub password_algorithm: String,
}

/// Login result (session)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
}

/// Split a full name on the first space: "John Doe Jr" -> ("John", "Doe Jr").
pub fn split_full_name(full: &str) -> (String, String) {
    let trimmed = full.trim();
    match trimmed.split_once(' ') {
        Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
        None => (trimmed.to_string(), String::new()),
    }
}
