//! Business logic services for the application layer.

pub mod link_service;
pub mod redirect_service;

pub use link_service::{AllocationPolicy, LinkService};
pub use redirect_service::RedirectService;

use std::future::Future;
use std::time::Duration;

use crate::error::AppError;

/// Default deadline applied to each individual store call.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs a store call under a deadline.
///
/// An elapsed deadline drops the call and is reported as [`AppError::Storage`].
pub(crate) async fn with_deadline<T, F>(deadline: Duration, operation: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    tokio::time::timeout(deadline, operation).await?
}
