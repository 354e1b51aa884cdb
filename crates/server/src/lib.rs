//! HTTP layer: router assembly, request handlers, middleware and startup.

pub mod errors;
pub mod openapi;
pub mod routes;
pub mod startup;

pub use startup::run;
