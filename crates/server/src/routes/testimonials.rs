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
use models::testimonial;
use service::db::testimonial_service::{
    self, CreateTestimonialInput, TestimonialStats, TestimonialStatusInput,
};

use crate::errors::ApiError;
use crate::routes::auth::ServerState;

#[utoipa::path(get, path = "/api/testimonials/featured", tag = "testimonials",
    responses((status = 200, description = "Approved and featured testimonials")))]
pub async fn featured(
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<testimonial::Model>>>, ApiError> {
    let rows = testimonial_service::featured_testimonials(&state.db).await?;
    Ok(Json(ApiResponse::ok(rows)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialListQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub is_approved: Option<bool>,
}

#[utoipa::path(get, path = "/api/testimonials", tag = "testimonials",
    security(("bearer" = [])),
    responses((status = 200, description = "Paginated testimonials, newest first")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<TestimonialListQuery>,
) -> Result<Json<ListResponse<testimonial::Model>>, ApiError> {
    let page = Pagination {
        page: q.page.unwrap_or(1),
        per_page: q.limit.unwrap_or(10),
    };
    let (rows, total) =
        testimonial_service::list_testimonials(&state.db, q.is_approved, page).await?;
    Ok(Json(ListResponse::new(rows, page.page_info(total))))
}

#[utoipa::path(post, path = "/api/testimonials", tag = "testimonials",
    request_body = crate::openapi::TestimonialRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Testimonial created, unapproved"),
        (status = 400, description = "Validation failure")))]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<CreateTestimonialInput>,
) -> Result<(StatusCode, Json<ApiResponse<testimonial::Model>>), ApiError> {
    let created = testimonial_service::create_testimonial(&state.db, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message("Testimonial created successfully", created)),
    ))
}

#[utoipa::path(put, path = "/api/testimonials/{id}/status", tag = "testimonials",
    params(("id" = Uuid, Path, description = "Testimonial id")),
    request_body = crate::openapi::TestimonialStatusRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Approval/feature flags updated"),
        (status = 404, description = "No such testimonial")))]
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<TestimonialStatusInput>,
) -> Result<Json<ApiResponse<testimonial::Model>>, ApiError> {
    let updated = testimonial_service::set_testimonial_status(&state.db, id, input)
        .await?
        .ok_or_else(|| ApiError::NotFound("Testimonial not found".into()))?;
    Ok(Json(ApiResponse::ok_with_message("Testimonial status updated successfully", updated)))
}

#[utoipa::path(get, path = "/api/testimonials/stats/overview", tag = "testimonials",
    security(("bearer" = [])),
    responses((status = 200, description = "Totals and approval counts")))]
pub async fn stats(
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<TestimonialStats>>, ApiError> {
    let stats = testimonial_service::testimonial_stats(&state.db).await?;
    Ok(Json(ApiResponse::ok(stats)))
}
