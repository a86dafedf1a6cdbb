//! DTOs for link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;

/// Request to shorten a URL.
///
/// `url` may omit the scheme; `https://` is assumed.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,
}

/// Request to point an existing code at a new target.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,
}

/// Query parameters of the listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListLinksQuery {
    pub limit: Option<i64>,
}

/// JSON representation of a link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub code: String,
    pub short_url: String,
    pub long_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn from_link(link: Link, short_url: String) -> Self {
        Self {
            id: link.id,
            code: link.code,
            short_url,
            long_url: link.long_url,
            clicks: link.clicks,
            created_at: link.created_at,
        }
    }
}

/// Listing response.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub items: Vec<LinkResponse>,
    pub count: usize,
}

/// Result of an existence check.
#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    pub code: String,
    pub exists: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_rejects_empty_url() {
        let request = CreateLinkRequest { url: String::new() };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_oversized_url() {
        let request = CreateLinkRequest {
            url: format!("https://example.com/{}", "a".repeat(2048)),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_request_accepts_bare_host() {
        let request = UpdateLinkRequest {
            url: "example.com".to_string(),
        };
        assert!(request.validate().is_ok());
    }
}
