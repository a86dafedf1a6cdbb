//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{LinkService, RedirectService};

/// Handles shared by all requests.
///
/// Cloning is cheap: every field is reference-counted or a short string.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub redirect_service: Arc<RedirectService>,
    /// Public prefix of short URLs, without a trailing slash.
    pub base_url: String,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService>,
        redirect_service: Arc<RedirectService>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            link_service,
            redirect_service,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }
}
