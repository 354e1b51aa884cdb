//! Resource services operating directly on the database connection.

pub mod contact_service;
pub mod event_service;
pub mod testimonial_service;
