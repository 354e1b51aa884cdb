use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use common::{
    pagination::Pagination,
    types::{ApiResponse, ListResponse},
};
use models::user::Role;
use service::auth::{
    domain::{
        AdminRegisterInput, AuthUser, ChangePasswordInput, LoginInput, RegisterInput,
        UpdateProfileInput, UpdateSettingsInput, UserListFilter,
    },
    repo::seaorm::SeaOrmAuthRepository,
    service::{AuthService, AuthSettings},
};

use crate::errors::ApiError;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: AuthSettings,
}

/// Authenticated caller, inserted into request extensions by [`authenticate`].
#[derive(Clone)]
pub struct CurrentUser(pub AuthUser);

pub(crate) fn auth_service(state: &ServerState) -> AuthService<SeaOrmAuthRepository> {
    AuthService::new(
        Arc::new(SeaOrmAuthRepository { db: state.db.clone() }),
        state.auth.clone(),
    )
}

/// Token plus sanitized user, returned on login.
#[derive(Debug, Serialize)]
pub struct LoginOutput {
    pub token: String,
    pub user: AuthUser,
}

#[utoipa::path(post, path = "/api/auth/register", tag = "auth",
    request_body = crate::openapi::RegisterRequest,
    responses(
        (status = 201, description = "User registered"),
        (status = 400, description = "Validation failure or duplicate email")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<ApiResponse<AuthUser>>), ApiError> {
    let user = auth_service(&state).register(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message("User registered successfully", user)),
    ))
}

#[utoipa::path(post, path = "/api/auth/admin/register", tag = "auth",
    request_body = crate::openapi::AdminRegisterRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Staff user created"),
        (status = 400, description = "Validation failure or duplicate email/username"),
        (status = 403, description = "Caller is not an admin")))]
pub async fn admin_register(
    State(state): State<ServerState>,
    Json(input): Json<AdminRegisterInput>,
) -> Result<(StatusCode, Json<ApiResponse<AuthUser>>), ApiError> {
    let user = auth_service(&state).admin_register(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message("Staff user created successfully", user)),
    ))
}

#[utoipa::path(post, path = "/api/auth/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses(
        (status = 200, description = "Logged in, token in response body"),
        (status = 401, description = "Invalid credentials or deactivated account")))]
pub async fn login(
    State(state): State<ServerState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<ApiResponse<LoginOutput>>, ApiError> {
    let session = auth_service(&state).login(input).await?;
    let out = LoginOutput { token: session.token, user: session.user };
    Ok(Json(ApiResponse::ok_with_message("Login successful", out)))
}

#[utoipa::path(get, path = "/api/auth/profile", tag = "auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Caller profile"),
        (status = 401, description = "Missing or invalid token")))]
pub async fn get_profile(
    Extension(current): Extension<CurrentUser>,
) -> Json<ApiResponse<AuthUser>> {
    Json(ApiResponse::ok(current.0))
}

#[utoipa::path(put, path = "/api/auth/profile", tag = "auth",
    request_body = crate::openapi::UpdateProfileRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Profile updated"),
        (status = 400, description = "Validation failure or email already taken")))]
pub async fn update_profile(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(input): Json<UpdateProfileInput>,
) -> Result<Json<ApiResponse<AuthUser>>, ApiError> {
    let user = auth_service(&state).update_profile(current.0.id, input).await?;
    Ok(Json(ApiResponse::ok_with_message("Profile updated successfully", user)))
}

#[utoipa::path(put, path = "/api/auth/settings", tag = "auth",
    security(("bearer" = [])),
    responses((status = 200, description = "Settings updated")))]
pub async fn update_settings(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(input): Json<UpdateSettingsInput>,
) -> Result<Json<ApiResponse<AuthUser>>, ApiError> {
    let user = auth_service(&state).update_settings(current.0.id, input).await?;
    Ok(Json(ApiResponse::ok_with_message("Settings updated successfully", user)))
}

#[utoipa::path(put, path = "/api/auth/change-password", tag = "auth",
    request_body = crate::openapi::ChangePasswordRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Current password incorrect or new password invalid")))]
pub async fn change_password(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(input): Json<ChangePasswordInput>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    auth_service(&state).change_password(current.0.id, input).await?;
    Ok(Json(ApiResponse::message_only("Password changed successfully")))
}

#[utoipa::path(delete, path = "/api/auth/delete-account", tag = "auth",
    security(("bearer" = [])),
    responses((status = 200, description = "Account deleted")))]
pub async fn delete_account(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    auth_service(&state).delete_account(current.0.id).await?;
    Ok(Json(ApiResponse::message_only("Account deleted successfully")))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[utoipa::path(get, path = "/api/auth/users", tag = "auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Paginated user listing, newest first"),
        (status = 403, description = "Caller is not an admin")))]
pub async fn list_users(
    State(state): State<ServerState>,
    Query(q): Query<UserListQuery>,
) -> Result<Json<ListResponse<AuthUser>>, ApiError> {
    let role = match q.role.as_deref() {
        Some(raw) => Some(raw.parse::<Role>().map_err(|e| ApiError::Validation(e.to_string()))?),
        None => None,
    };
    let filter = UserListFilter { role, is_active: q.is_active };
    let page = Pagination {
        page: q.page.unwrap_or(1),
        per_page: q.limit.unwrap_or(10),
    };
    let (users, total) = auth_service(&state).list_users(filter, page).await?;
    Ok(Json(ListResponse::new(users, page.page_info(total))))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusInput {
    pub is_active: bool,
}

#[utoipa::path(put, path = "/api/auth/users/{id}/status", tag = "auth",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = crate::openapi::UserStatusRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Activation flag updated"),
        (status = 404, description = "No such user")))]
pub async fn update_user_status(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UserStatusInput>,
) -> Result<Json<ApiResponse<AuthUser>>, ApiError> {
    let user = auth_service(&state).set_active(id, input.is_active).await?;
    Ok(Json(ApiResponse::ok_with_message("User status updated successfully", user)))
}

/// Resolve `Authorization: Bearer <token>` and load the caller.
///
/// The user record is re-read on every request, so tokens for deleted or
/// deactivated accounts stop working immediately instead of at expiry.
pub async fn authenticate(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| {
            warn!(path = %req.uri().path(), "missing bearer token");
            ApiError::Unauthorized("Authentication required".into())
        })?
        .to_string();

    let user = auth_service(&state).authenticate(&token).await?;
    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

fn check_role(req: &Request, allowed: &[Role]) -> Result<(), ApiError> {
    let current = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".into()))?;
    if allowed.contains(&current.0.role) {
        Ok(())
    } else {
        warn!(user_id = %current.0.id, role = %current.0.role, "role check failed");
        Err(ApiError::Forbidden)
    }
}

/// Admin-only gate; runs after [`authenticate`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    check_role(&req, &[Role::Admin])?;
    Ok(next.run(req).await)
}

/// Staff-or-admin gate; runs after [`authenticate`].
pub async fn require_staff(req: Request, next: Next) -> Result<Response, ApiError> {
    check_role(&req, &[Role::Staff, Role::Admin])?;
    Ok(next.run(req).await)
}
