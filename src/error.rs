//! Application error type shared by every layer.
//!
//! Each variant carries a human-readable message plus structured JSON details.
//! Repository and service code returns [`AppError`] directly; the HTTP layer
//! turns it into a response through [`IntoResponse`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload used in JSON responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors produced by link allocation, storage and resolution.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed input (URL, short code, limit).
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// The requested link does not exist.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// A uniqueness constraint was violated on insert.
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// Every default-length attempt and every escalated length collided.
    #[error("{message}")]
    AllocationExhausted { message: String, details: Value },

    /// The operating system entropy source failed.
    #[error("{message}")]
    RandomSource { message: String, details: Value },

    /// A read or write against the link store failed or timed out.
    #[error("{message}")]
    Storage { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::AllocationExhausted {
            message: message.into(),
            details,
        }
    }

    pub fn random_source(message: impl Into<String>, details: Value) -> Self {
        Self::RandomSource {
            message: message.into(),
            details,
        }
    }

    pub fn storage(message: impl Into<String>, details: Value) -> Self {
        Self::Storage {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Returns `true` for a uniqueness violation reported by the store.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    fn parts(&self) -> (StatusCode, &'static str, &str, &Value) {
        match self {
            Self::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                details,
            ),
            Self::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message, details)
            }
            Self::Conflict { message, details } => {
                (StatusCode::CONFLICT, "conflict", message, details)
            }
            Self::AllocationExhausted { message, details } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "allocation_exhausted",
                message,
                details,
            ),
            Self::RandomSource { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "random_source_failure",
                message,
                details,
            ),
            Self::Storage { message, details } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "storage_failure",
                message,
                details,
            ),
            Self::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
            ),
        }
    }

    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        self.parts().0
    }

    /// Builds the serializable payload without consuming the error.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (_, code, message, details) = self.parts();
        ErrorInfo {
            code,
            message: message.to_string(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(
            self,
            Self::Storage { .. } | Self::RandomSource { .. } | Self::Internal { .. }
        ) {
            tracing::error!(error = %self, details = %self.to_error_info().details, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        AppError::storage("Database error", json!({ "reason": e.to_string() }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::bad_request("Request validation failed", json!(e))
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        AppError::storage(
            "Storage operation timed out",
            json!({ "reason": "deadline_elapsed" }),
        )
    }
}
