//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage contract for short links.
///
/// `create` is the authoritative uniqueness check: implementations must reject
/// a duplicate `code` atomically, so concurrent writers cannot both succeed
/// with the same code even when both passed an earlier [`exists`] check.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - in-process store
/// - Test mocks available with `cfg(test)`
///
/// [`exists`]: LinkRepository::exists
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link with zero clicks and `created_at = now`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code is already taken.
    /// Returns [`AppError::Storage`] on any other database error.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link by its surrogate id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError>;

    /// Lists the most recently created links, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn list_recent(&self, limit: i64) -> Result<Vec<Link>, AppError>;

    /// Checks whether a short code is already allocated.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors. A failed read is never
    /// reported as "does not exist".
    async fn exists(&self, code: &str) -> Result<bool, AppError>;

    /// Atomically adds one to the click counter.
    ///
    /// Returns `Ok(false)` when no link has this code; that case is a no-op,
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn increment_clicks(&self, code: &str) -> Result<bool, AppError>;

    /// Replaces the target URL of an existing link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches `code`.
    /// Returns [`AppError::Storage`] on database errors.
    async fn update_long_url(&self, code: &str, long_url: &str) -> Result<Link, AppError>;

    /// Cheap connectivity probe used by health checks.
    async fn ping(&self) -> Result<(), AppError>;
}
