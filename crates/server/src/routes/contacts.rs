use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use common::{
    pagination::Pagination,
    types::{ApiResponse, ListResponse},
};
use models::contact_message;
use service::db::contact_service::{
    self, ContactFilter, ContactStats, CreateContactInput, UpdateContactInput,
};

use crate::errors::ApiError;
use crate::routes::auth::{CurrentUser, ServerState};

#[utoipa::path(post, path = "/api/contact", tag = "contact",
    request_body = crate::openapi::ContactRequest,
    responses(
        (status = 201, description = "Message recorded"),
        (status = 400, description = "Validation failure")))]
pub async fn create_contact(
    State(state): State<ServerState>,
    Json(input): Json<CreateContactInput>,
) -> Result<(StatusCode, Json<ApiResponse<contact_message::Model>>), ApiError> {
    let message = contact_service::create_contact(&state.db, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            "Message sent successfully! We will get back to you soon.",
            message,
        )),
    ))
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactListQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

#[utoipa::path(get, path = "/api/contact", tag = "contact",
    security(("bearer" = [])),
    responses((status = 200, description = "Paginated messages, newest first")))]
pub async fn list_contacts(
    State(state): State<ServerState>,
    Query(q): Query<ContactListQuery>,
) -> Result<Json<ListResponse<contact_message::Model>>, ApiError> {
    let filter = ContactFilter {
        status: q.status.as_deref(),
        priority: q.priority.as_deref(),
    };
    let page = Pagination {
        page: q.page.unwrap_or(1),
        per_page: q.limit.unwrap_or(10),
    };
    let (rows, total) = contact_service::list_contacts(&state.db, filter, page).await?;
    Ok(Json(ListResponse::new(rows, page.page_info(total))))
}

#[utoipa::path(get, path = "/api/contact/{id}", tag = "contact",
    params(("id" = Uuid, Path, description = "Message id")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Message detail"),
        (status = 404, description = "No such message")))]
pub async fn get_contact(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<contact_message::Model>>, ApiError> {
    let message = contact_service::get_contact(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Contact message not found".into()))?;
    Ok(Json(ApiResponse::ok(message)))
}

#[utoipa::path(put, path = "/api/contact/{id}/status", tag = "contact",
    params(("id" = Uuid, Path, description = "Message id")),
    request_body = crate::openapi::ContactUpdateRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Message updated; responses are stamped with the responder"),
        (status = 404, description = "No such message")))]
pub async fn update_contact(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Extension(current): Extension<CurrentUser>,
    Json(input): Json<UpdateContactInput>,
) -> Result<Json<ApiResponse<contact_message::Model>>, ApiError> {
    let responder = current.0.full_name();
    let message = contact_service::update_contact(&state.db, id, input, &responder)
        .await?
        .ok_or_else(|| ApiError::NotFound("Contact message not found".into()))?;
    Ok(Json(ApiResponse::ok_with_message("Contact message updated successfully", message)))
}

#[utoipa::path(get, path = "/api/contact/stats/overview", tag = "contact",
    security(("bearer" = [])),
    responses((status = 200, description = "Counts per status")))]
pub async fn stats(
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<ContactStats>>, ApiError> {
    let stats = contact_service::contact_stats(&state.db).await?;
    Ok(Json(ApiResponse::ok(stats)))
}
