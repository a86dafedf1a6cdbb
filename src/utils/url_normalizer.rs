//! Target URL normalization and validation.
//!
//! Targets are only completed, never rewritten: a missing scheme gets
//! `https://`, and the result must parse as an absolute HTTP(S) URL. The stored
//! value is the completed input itself, so a link resolves to exactly what was
//! submitted.

use url::Url;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

/// Scheme prepended to targets submitted without one.
const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// Normalizes a submitted target URL.
///
/// # Rules
///
/// 1. Surrounding whitespace is trimmed
/// 2. Inputs without an `http://` or `https://` prefix get `https://`
/// 3. Embedded ASCII control characters are rejected
/// 4. The result must parse with an `http`/`https` scheme and a host
///
/// # Errors
///
/// Returns [`UrlNormalizationError::Empty`] for blank input,
/// [`UrlNormalizationError::InvalidFormat`] for unparsable URLs,
/// [`UrlNormalizationError::UnsupportedProtocol`] for other schemes such as
/// `javascript:` and [`UrlNormalizationError::MissingHost`] when no host is
/// present.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_url("example.com/a").unwrap(), "https://example.com/a");
/// assert_eq!(normalize_url("http://example.com").unwrap(), "http://example.com");
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }

    // The URL parser strips tabs and newlines, but the stored string must
    // stay a valid `Location` header value.
    if trimmed.chars().any(|c| c.is_ascii_control()) {
        return Err(UrlNormalizationError::InvalidFormat(
            "URL contains control characters".to_string(),
        ));
    }

    let candidate = if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else if trimmed.contains("://") {
        return Err(UrlNormalizationError::UnsupportedProtocol);
    } else {
        format!("{DEFAULT_SCHEME_PREFIX}{trimmed}")
    };

    let url =
        Url::parse(&candidate).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlNormalizationError::MissingHost);
    }

    Ok(candidate)
}

fn has_http_scheme(input: &str) -> bool {
    let lower = input
        .get(..DEFAULT_SCHEME_PREFIX.len())
        .unwrap_or(input)
        .to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
