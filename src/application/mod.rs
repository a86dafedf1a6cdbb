//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::LinkRepository`] trait
//! through an injected handle and expose the operations used by the HTTP and
//! CLI collaborators.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Code allocation, creation, listing and updates
//! - [`services::redirect_service::RedirectService`] - Code resolution and click scheduling

pub mod services;
