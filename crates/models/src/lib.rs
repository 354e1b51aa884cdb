pub mod contact_message;
pub mod db;
pub mod errors;
pub mod event_booking;
pub mod testimonial;
pub mod user;
pub mod user_credentials;
