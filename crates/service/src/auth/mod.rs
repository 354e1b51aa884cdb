//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login, token issuance/verification, profile lifecycle and
//! admin user management all live here, independent of the web framework.

pub mod domain;
pub mod errors;
pub mod repo;
pub mod repository;
pub mod service;
pub mod token;

pub use service::AuthService;
