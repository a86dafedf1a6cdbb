//! Handlers for link management endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::links::{
    CreateLinkRequest, ExistsResponse, LinkListResponse, LinkResponse, ListLinksQuery,
    UpdateLinkRequest,
};
use crate::error::AppError;
use crate::state::AppState;

/// Shortens a URL.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "id": 1,
///   "code": "Qx3_aZ",
///   "short_url": "http://localhost:8080/Qx3_aZ",
///   "long_url": "https://example.com/some/long/path",
///   "clicks": 0,
///   "created_at": "2026-01-01T00:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for an invalid URL.
/// Returns 503 Service Unavailable if no free code could be allocated.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state.link_service.create_link(&payload.url).await?;
    let short_url = state.short_url(&link.code);

    Ok((
        StatusCode::CREATED,
        Json(LinkResponse::from_link(link, short_url)),
    ))
}

/// Lists the most recent links.
///
/// # Endpoint
///
/// `GET /api/links?limit=100`
///
/// `limit` defaults to 100 and is clamped to 1-1000.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Query(query): Query<ListLinksQuery>,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state.link_service.list_recent(query.limit).await?;

    let items: Vec<LinkResponse> = links
        .into_iter()
        .map(|link| {
            let short_url = state.short_url(&link.code);
            LinkResponse::from_link(link, short_url)
        })
        .collect();

    Ok(Json(LinkListResponse {
        count: items.len(),
        items,
    }))
}

/// Returns one link.
///
/// # Endpoint
///
/// `GET /api/links/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the code is not allocated.
pub async fn get_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_link(&code).await?;
    let short_url = state.short_url(&link.code);

    Ok(Json(LinkResponse::from_link(link, short_url)))
}

/// Changes the target of a link.
///
/// # Endpoint
///
/// `PATCH /api/links/{code}`
///
/// ```json
/// { "url": "https://new-destination.com" }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the code is not allocated.
/// Returns 400 Bad Request for an invalid URL or code.
pub async fn update_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .update_link_target(&code, &payload.url)
        .await?;
    let short_url = state.short_url(&link.code);

    Ok(Json(LinkResponse::from_link(link, short_url)))
}

/// Reports whether a code is allocated.
///
/// # Endpoint
///
/// `GET /api/links/{code}/exists`
pub async fn link_exists_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ExistsResponse>, AppError> {
    let exists = state.link_service.link_exists(&code).await?;

    Ok(Json(ExistsResponse { code, exists }))
}
