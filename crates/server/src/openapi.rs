use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

/// Registers the bearer scheme referenced by the protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub newsletter: Option<bool>,
}

#[derive(ToSchema)]
pub struct AdminRegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub permissions: Option<Vec<String>>,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(ToSchema)]
pub struct UserStatusRequest {
    pub is_active: bool,
}

#[derive(ToSchema)]
pub struct BookingRequest {
    pub name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub event_type: String,
    pub event_date: String,
    pub venue: Option<String>,
    pub guest_count: Option<String>,
    pub budget: Option<String>,
    pub additional_info: Option<String>,
}

#[derive(ToSchema)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

#[derive(ToSchema)]
pub struct ContactUpdateRequest {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub response: Option<String>,
}

#[derive(ToSchema)]
pub struct TestimonialRequest {
    pub name: String,
    pub event_type: String,
    pub rating: i32,
    pub testimonial: String,
}

#[derive(ToSchema)]
pub struct TestimonialStatusRequest {
    pub is_approved: Option<bool>,
    pub is_featured: Option<bool>,
}

#[derive(ToSchema)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::admin_register,
        crate::routes::auth::login,
        crate::routes::auth::get_profile,
        crate::routes::auth::update_profile,
        crate::routes::auth::update_settings,
        crate::routes::auth::change_password,
        crate::routes::auth::delete_account,
        crate::routes::auth::list_users,
        crate::routes::auth::update_user_status,
        crate::routes::events::create_booking,
        crate::routes::events::list_bookings,
        crate::routes::events::get_booking,
        crate::routes::events::update_status,
        crate::routes::events::stats,
        crate::routes::contacts::create_contact,
        crate::routes::contacts::list_contacts,
        crate::routes::contacts::get_contact,
        crate::routes::contacts::update_contact,
        crate::routes::contacts::stats,
        crate::routes::testimonials::featured,
        crate::routes::testimonials::list,
        crate::routes::testimonials::create,
        crate::routes::testimonials::update_status,
        crate::routes::testimonials::stats,
    ),
    components(
        schemas(
            RegisterRequest,
            AdminRegisterRequest,
            LoginRequest,
            UpdateProfileRequest,
            ChangePasswordRequest,
            UserStatusRequest,
            BookingRequest,
            ContactRequest,
            ContactUpdateRequest,
            TestimonialRequest,
            TestimonialStatusRequest,
            StatusRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "events"),
        (name = "contact"),
        (name = "testimonials")
    )
)]
pub struct ApiDoc;
