use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use service::{auth::errors::AuthError, errors::ServiceError};

/// HTTP-facing error. Every variant maps to a status code and the standard
/// `{success: false, message}` envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    /// Business rule violations reported as 400 (duplicate email, wrong
    /// current password, and similar).
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("Access denied")]
    Forbidden,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Internal details go to the log, not the client
        let body = match &self {
            ApiError::Internal(detail) => {
                error!(error = %detail, "internal server error");
                serde_json::json!({
                    "success": false,
                    "message": "Internal server error",
                    "error": detail,
                })
            }
            other => serde_json::json!({
                "success": false,
                "message": other.to_string(),
            }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(msg) => ApiError::Validation(msg),
            AuthError::DuplicateEmail
            | AuthError::EmailTaken
            | AuthError::InvalidCurrentPassword => ApiError::BadRequest(e.to_string()),
            AuthError::InvalidCredentials
            | AuthError::AccountDeactivated
            | AuthError::InvalidToken(_) => ApiError::Unauthorized(e.to_string()),
            AuthError::Forbidden => ApiError::Forbidden,
            AuthError::NotFound => ApiError::NotFound(e.to_string()),
            AuthError::HashError(msg) | AuthError::TokenError(msg) | AuthError::Repository(msg) => {
                ApiError::Internal(msg)
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => ApiError::Validation(msg),
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::Db(msg) => ApiError::Internal(msg),
            ServiceError::Model(m) => match m {
                models::errors::ModelError::Validation(msg) => ApiError::Validation(msg),
                models::errors::ModelError::Db(msg) => ApiError::Internal(msg),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_map_to_expected_status() {
        let cases = [
            (AuthError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (AuthError::DuplicateEmail, StatusCode::BAD_REQUEST),
            (AuthError::InvalidCurrentPassword, StatusCode::BAD_REQUEST),
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::AccountDeactivated, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidToken("expired".into()), StatusCode::UNAUTHORIZED),
            (AuthError::Forbidden, StatusCode::FORBIDDEN),
            (AuthError::NotFound, StatusCode::NOT_FOUND),
            (AuthError::Repository("db down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[test]
    fn internal_error_hides_detail_in_message() {
        let err = ApiError::Internal("connection refused".into());
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
