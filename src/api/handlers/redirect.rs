//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Headers that keep browsers and proxies from caching a redirect, so every
/// visit reaches the service and is counted.
const NO_CACHE_HEADERS: [(header::HeaderName, &str); 3] = [
    (
        header::CACHE_CONTROL,
        "no-cache, no-store, must-revalidate, max-age=0",
    ),
    (header::PRAGMA, "no-cache"),
    (header::EXPIRES, "Thu, 01 Jan 1970 00:00:00 GMT"),
];

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Click Tracking
///
/// The click is queued for the background worker. A full queue drops the
/// click; the redirect is still served.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 500 Internal Server Error if the stored target cannot be sent as a
/// header.
/// Returns 503 Service Unavailable if the store cannot be read.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let long_url = state.redirect_service.resolve(&code).await?;

    let location = HeaderValue::from_str(&long_url).map_err(|_| {
        AppError::internal(
            "Stored target is not a valid Location header",
            json!({ "code": code }),
        )
    })?;

    debug!(%code, "Redirecting");

    Ok((
        StatusCode::FOUND,
        NO_CACHE_HEADERS,
        [(header::LOCATION, location)],
    ))
}
