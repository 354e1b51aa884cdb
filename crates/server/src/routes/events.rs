use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use common::{
    pagination::Pagination,
    types::{ApiResponse, ListResponse},
};
use models::event_booking;
use service::db::event_service::{
    self, BookingFilter, CreateBookingInput, EventStats,
};

use crate::errors::ApiError;
use crate::routes::auth::ServerState;

#[utoipa::path(post, path = "/api/events", tag = "events",
    request_body = crate::openapi::BookingRequest,
    responses(
        (status = 201, description = "Booking recorded with pending status"),
        (status = 400, description = "Validation failure")))]
pub async fn create_booking(
    State(state): State<ServerState>,
    Json(input): Json<CreateBookingInput>,
) -> Result<(StatusCode, Json<ApiResponse<event_booking::Model>>), ApiError> {
    let booking = event_service::create_booking(&state.db, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            "Booking submitted successfully! We will contact you soon.",
            booking,
        )),
    ))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
}

#[utoipa::path(get, path = "/api/events", tag = "events",
    security(("bearer" = [])),
    responses((status = 200, description = "Paginated bookings, newest first")))]
pub async fn list_bookings(
    State(state): State<ServerState>,
    Query(q): Query<BookingListQuery>,
) -> Result<Json<ListResponse<event_booking::Model>>, ApiError> {
    let filter = BookingFilter {
        status: q.status.as_deref(),
        event_type: q.event_type.as_deref(),
    };
    let page = Pagination {
        page: q.page.unwrap_or(1),
        per_page: q.limit.unwrap_or(10),
    };
    let (rows, total) = event_service::list_bookings(&state.db, filter, page).await?;
    Ok(Json(ListResponse::new(rows, page.page_info(total))))
}

#[utoipa::path(get, path = "/api/events/{id}", tag = "events",
    params(("id" = Uuid, Path, description = "Booking id")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Booking detail"),
        (status = 404, description = "No such booking")))]
pub async fn get_booking(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<event_booking::Model>>, ApiError> {
    let booking = event_service::get_booking(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event booking not found".into()))?;
    Ok(Json(ApiResponse::ok(booking)))
}

#[derive(Debug, Deserialize)]
pub struct BookingStatusInput {
    pub status: String,
}

#[utoipa::path(put, path = "/api/events/{id}/status", tag = "events",
    params(("id" = Uuid, Path, description = "Booking id")),
    request_body = crate::openapi::StatusRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Status outside the allowed set"),
        (status = 404, description = "No such booking")))]
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<BookingStatusInput>,
) -> Result<Json<ApiResponse<event_booking::Model>>, ApiError> {
    let booking = event_service::update_booking_status(&state.db, id, &input.status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event booking not found".into()))?;
    Ok(Json(ApiResponse::ok_with_message("Booking status updated successfully", booking)))
}

#[utoipa::path(get, path = "/api/events/stats/overview", tag = "events",
    security(("bearer" = [])),
    responses((status = 200, description = "Counts per status")))]
pub async fn stats(
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<EventStats>>, ApiError> {
    let stats = event_service::booking_stats(&state.db).await?;
    Ok(Json(ApiResponse::ok(stats)))
}
