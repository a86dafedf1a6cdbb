//! Short code generation and validation utilities.
//!
//! Candidates are drawn from the operating system CSPRNG and encoded as
//! URL-safe base64 without padding. Uniqueness is not this module's concern;
//! see [`crate::application::services::LinkService`] for the allocation loop.

use crate::error::AppError;
use base64::Engine as _;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Default length of a generated short code.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Longest code accepted from callers.
pub const MAX_CODE_LENGTH: usize = 64;

/// Top-level path segments served by fixed routes. A link under one of these
/// codes could never be resolved.
pub const RESERVED_CODES: &[&str] = &["api", "health"];

/// Characters a short code may contain: the base64url alphabet.
static CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+$").expect("code pattern is a valid regex")
});

/// Source of candidate short codes.
///
/// Implementations are pure generators that never touch storage. Tests
/// substitute scripted generators to force collisions.
pub trait CodeGenerator: Send + Sync {
    /// Produces a candidate of exactly `length` characters.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RandomSource`] if the entropy source fails.
    fn generate(&self, length: usize) -> Result<String, AppError>;
}

/// Cryptographically secure generator backed by `getrandom`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodeGenerator;

impl RandomCodeGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self, length: usize) -> Result<String, AppError> {
        generate_code(length)
    }
}

/// Generates a random short code of exactly `length` characters.
///
/// Draws `length` random bytes and encodes them as base64url without padding.
/// The encoding of `n` bytes is always at least `n` characters long, so the
/// result is simply truncated.
///
/// # Errors
///
/// Returns [`AppError::Validation`] for a zero length and
/// [`AppError::RandomSource`] if the OS random source is unavailable.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6)?;
/// assert_eq!(code.len(), 6);
/// ```
pub fn generate_code(length: usize) -> Result<String, AppError> {
    if length == 0 {
        return Err(AppError::bad_request(
            "Code length must be at least 1",
            json!({ "length": length }),
        ));
    }

    let mut buffer = vec![0u8; length];
    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::random_source(
            "Failed to read from the system random source",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(encode_code(&buffer, length))
}

/// Encodes random bytes into a URL-safe code of at most `length` characters.
pub fn encode_code(bytes: &[u8], length: usize) -> String {
    let mut encoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes);
    encoded.truncate(length);
    encoded
}

/// Returns `true` when `code` has an allowed length and alphabet.
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty() && code.len() <= MAX_CODE_LENGTH && CODE_REGEX.is_match(code)
}

/// Returns `true` if `code` shadows a fixed route.
pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Validates a short code supplied by a caller.
///
/// # Errors
///
/// Returns [`AppError::Validation`] when the code is empty, longer than
/// [`MAX_CODE_LENGTH`], or contains characters outside `[A-Za-z0-9_-]`.
pub fn validate_code(code: &str) -> Result<(), AppError> {
    if is_valid_code(code) {
        Ok(())
    } else {
        Err(AppError::bad_request(
            "Short code must be 1-64 characters of letters, digits, '-' or '_'",
            json!({ "code": code }),
        ))
    }
}
