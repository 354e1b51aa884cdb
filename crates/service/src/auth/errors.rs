use thiserror::Error;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("User with this email already exists")]
    DuplicateEmail,
    #[error("Email already taken")]
    EmailTaken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Account is deactivated")]
    AccountDeactivated,
    #[error("Current password is incorrect")]
    InvalidCurrentPassword,
    #[error("invalid or expired token: {0}")]
    InvalidToken(String),
    #[error("insufficient role")]
    Forbidden,
    #[error("User not found")]
    NotFound,
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::DuplicateEmail => 1002,
            AuthError::EmailTaken => 1003,
            AuthError::NotFound => 1004,
            AuthError::InvalidCredentials => 1005,
            AuthError::AccountDeactivated => 1006,
            AuthError::InvalidCurrentPassword => 1007,
            AuthError::InvalidToken(_) => 1008,
            AuthError::Forbidden => 1009,
            AuthError::HashError(_) => 1101,
            AuthError::TokenError(_) => 1102,
            AuthError::Repository(_) => 1200,
        }
    }
}

impl From<models::errors::ModelError> for AuthError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => AuthError::Validation(msg),
            models::errors::ModelError::Db(msg) => AuthError::Repository(msg),
        }
    }
}
