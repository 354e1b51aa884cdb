use axum::{
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

pub mod auth;
pub mod contacts;
pub mod events;
pub mod testimonials;

pub use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health",
    responses((status = 200, description = "Service healthy")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: static site, public forms, account
/// routes, staff dashboards and admin user management.
pub fn build_router(cors: CorsLayer, state: ServerState, static_dir: &str) -> Router {
    let index = format!("{}/index.html", static_dir);
    let site = ServeDir::new(static_dir).fallback(ServeFile::new(index));

    // Public: no token required
    let public = Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/events", post(events::create_booking))
        .route("/api/contact", post(contacts::create_contact))
        .route("/api/testimonials/featured", get(testimonials::featured));

    // Any authenticated user manages their own account
    let account = Router::new()
        .route("/api/auth/profile", get(auth::get_profile).put(auth::update_profile))
        .route("/api/auth/settings", put(auth::update_settings))
        .route("/api/auth/change-password", put(auth::change_password))
        .route("/api/auth/delete-account", delete(auth::delete_account));

    // Staff and admins run the dashboards
    let staff = Router::new()
        .route("/api/events", get(events::list_bookings))
        .route("/api/events/stats/overview", get(events::stats))
        .route("/api/events/:id", get(events::get_booking))
        .route("/api/events/:id/status", put(events::update_status))
        .route("/api/contact", get(contacts::list_contacts))
        .route("/api/contact/stats/overview", get(contacts::stats))
        .route("/api/contact/:id", get(contacts::get_contact))
        .route("/api/contact/:id/status", put(contacts::update_contact))
        .route("/api/testimonials", get(testimonials::list).post(testimonials::create))
        .route("/api/testimonials/stats/overview", get(testimonials::stats))
        .route("/api/testimonials/:id/status", put(testimonials::update_status))
        .route_layer(middleware::from_fn(auth::require_staff));

    // Admin-only user management
    let admin = Router::new()
        .route("/api/auth/admin/register", post(auth::admin_register))
        .route("/api/auth/users", get(auth::list_users))
        .route("/api/auth/users/:id/status", put(auth::update_user_status))
        .route_layer(middleware::from_fn(auth::require_admin));

    // authenticate is added last so it wraps the role gates and runs first
    let protected = account
        .merge(staff)
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::authenticate));

    public
        .merge(protected)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi()))
        .fallback_service(site)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
