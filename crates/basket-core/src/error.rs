//! Unified error types for all layers of the basket service.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for the basket service.
///
/// Storage failures (`StoreUnavailable`) are fatal to the operation that hit
/// them. Deferred-action failures (`SchedulingFailure`) are recovered inside
/// the cart coordinator and only reach callers of the scheduler directly.
#[derive(Error, Debug)]
pub enum BasketError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    // ============ Infrastructure Errors ============
    /// Key-value store unreachable or write rejected
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Deferred action could not be scheduled or cancelled
    #[error("Scheduling failure: {0}")]
    SchedulingFailure(String),

    /// Stored payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BasketError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::StoreUnavailable(_) => 503,
            Self::SchedulingFailure(_)
            | Self::Serialization(_)
            | Self::Configuration(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::SchedulingFailure(_) => "SCHEDULING_FAILURE",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a store unavailable error.
    #[must_use]
    pub fn store_unavailable<T: Into<String>>(message: T) -> Self {
        Self::StoreUnavailable(message.into())
    }

    /// Creates a scheduling failure.
    #[must_use]
    pub fn scheduling<T: Into<String>>(message: T) -> Self {
        Self::SchedulingFailure(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }
}

impl From<serde_json::Error> for BasketError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Request trace ID for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response from a `BasketError`.
    #[must_use]
    pub fn from_error(error: &BasketError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            trace_id: None,
        }
    }

    /// Sets the trace ID.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

impl From<&BasketError> for ErrorResponse {
    fn from(error: &BasketError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(BasketError::not_found("Cart", "alice").status_code(), 404);
        assert_eq!(BasketError::validation("empty username").status_code(), 400);
        assert_eq!(BasketError::store_unavailable("connection refused").status_code(), 503);
        assert_eq!(BasketError::scheduling("queue down").status_code(), 500);
        assert_eq!(BasketError::internal("oops").status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(BasketError::not_found("Cart", "bob").error_code(), "NOT_FOUND");
        assert_eq!(
            BasketError::store_unavailable("down").error_code(),
            "STORE_UNAVAILABLE"
        );
        assert_eq!(
            BasketError::scheduling("down").error_code(),
            "SCHEDULING_FAILURE"
        );
        assert_eq!(
            BasketError::Configuration("missing url".to_string()).error_code(),
            "CONFIGURATION_ERROR"
        );
    }

    #[test]
    fn test_json_error_maps_to_serialization() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let basket_err = BasketError::from(err);
        assert_eq!(basket_err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_error_response_from_error() {
        let err = BasketError::store_unavailable("redis down");
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.code, "STORE_UNAVAILABLE");
        assert!(response.message.contains("redis down"));
        assert!(response.trace_id.is_none());
    }

    #[test]
    fn test_error_response_with_trace_id() {
        let err = BasketError::not_found("Cart", "carol");
        let response = ErrorResponse::from(&err).with_trace_id("trace-123");
        assert_eq!(response.trace_id, Some("trace-123".to_string()));
    }
}
