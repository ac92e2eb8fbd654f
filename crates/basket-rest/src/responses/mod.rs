//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use crate::middleware::current_request_id;
use basket_core::{BasketError, ErrorResponse};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Envelope for responses that are not a cart body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    /// Creates a successful response.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Creates an error response.
    pub fn error(error: ErrorResponse) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError(pub BasketError);

impl From<BasketError> for AppError {
    fn from(err: BasketError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let request_id = current_request_id();

        if status.is_server_error() {
            error!(
                error = %self.0,
                code = self.0.error_code(),
                request_id = request_id.as_deref().unwrap_or("-"),
                "Request failed"
            );
        }

        let mut error_response = ErrorResponse::from_error(&self.0);
        if let Some(request_id) = request_id {
            error_response = error_response.with_trace_id(request_id);
        }
        let body = Json(ApiResponse::<()>::error(error_response));

        (status, body).into_response()
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Helper to create a success response with a bare body.
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_unavailable_maps_to_503() {
        let response = AppError(BasketError::store_unavailable("down")).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = AppError(BasketError::not_found("Cart", "alice")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_error_envelope_shape() {
        let body = ApiResponse::<()>::error(ErrorResponse::from_error(&BasketError::validation("bad")));
        let value = serde_json::to_value(body).unwrap();

        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["code"], "VALIDATION_ERROR");
        assert!(value.get("data").is_none());
    }
}
