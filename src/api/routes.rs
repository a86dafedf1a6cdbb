//! API route configuration.

use crate::api::handlers::{
    create_link_handler, get_link_handler, link_exists_handler, list_links_handler,
    update_link_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Link management routes, mounted under `/api`.
///
/// # Endpoints
///
/// - `POST  /links`               - Shorten a URL
/// - `GET   /links`               - List recent links
/// - `GET   /links/{code}`        - Fetch one link
/// - `PATCH /links/{code}`        - Change the target URL
/// - `GET   /links/{code}/exists` - Existence check
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(create_link_handler).get(list_links_handler))
        .route(
            "/links/{code}",
            get(get_link_handler).patch(update_link_handler),
        )
        .route("/links/{code}/exists", get(link_exists_handler))
}
