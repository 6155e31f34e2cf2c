//! # V1 API Response & Error Contract
//!
//! Successful responses serialize their payload at the top level. Errors
//! use a flat two-field shape:
//!
//! ```json
//! { "error": "Error processing image", "message": "Failed loading language 'fra'" }
//! ```
//!
//! `error` is a short, stable title; `message` carries the detail. The
//! HTTP status comes from the [`ErrorCode`] the error was built with.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::LectorError;

pub const INVALID_IMAGE: &str = "Invalid image";
pub const PROCESSING_FAILED: &str = "Error processing image";

/// Error classification. Each variant maps to a fixed HTTP status via
/// [`ErrorCode::status`]; the code itself is not sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Missing or malformed input. HTTP 400.
    InvalidRequest,
    /// OCR or filesystem failure. HTTP 500.
    InternalError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApiError {
    /// Short error title.
    pub error: String,
    /// Human-readable detail.
    pub message: String,
}

/// Response returned by every v1 handler.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    body: std::result::Result<T, ApiError>,
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// Success response with data (HTTP 200).
    pub fn success(data: T) -> Self {
        Self {
            body: Ok(data),
            status: StatusCode::OK,
        }
    }

    /// Error response. HTTP status is derived from the [`ErrorCode`].
    pub fn error(code: ErrorCode, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            body: Err(ApiError {
                error: error.into(),
                message: message.into(),
            }),
            status: code.status(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn data(&self) -> Option<&T> {
        self.body.as_ref().ok()
    }

    pub fn api_error(&self) -> Option<&ApiError> {
        self.body.as_ref().err()
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match self.body {
            Ok(data) => (self.status, Json(data)).into_response(),
            Err(error) => (self.status, Json(error)).into_response(),
        }
    }
}

impl<T: Serialize> From<LectorError> for ApiResponse<T> {
    /// Convert a [`LectorError`] into an error response.
    ///
    /// Server-side failures are logged here; their detail (e.g. tesseract's
    /// own error output) is still returned in `message`.
    fn from(err: LectorError) -> Self {
        match err {
            LectorError::InvalidInput(msg) => {
                ApiResponse::error(ErrorCode::InvalidRequest, INVALID_IMAGE, msg)
            }
            internal @ (LectorError::OcrExecution(_)
            | LectorError::HealthCheck(_)
            | LectorError::Io(_)) => {
                tracing::error!(error = %internal, "OCR request failed");
                ApiResponse::error(ErrorCode::InternalError, PROCESSING_FAILED, internal.detail())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn success_serializes_payload_at_top_level() {
        let response = ApiResponse::success(serde_json::json!({ "success": true })).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn error_serializes_error_and_message() {
        let response = ApiResponse::<()>::error(ErrorCode::InvalidRequest, "Invalid image", "bad")
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Invalid image");
        assert_eq!(json["message"], "bad");
        assert!(json.get("success").is_none());
    }

    #[test]
    fn error_code_status_mapping() {
        assert_eq!(ErrorCode::InvalidRequest.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::InternalError.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn invalid_input_maps_to_bad_request() {
        let resp: ApiResponse<()> = LectorError::InvalidInput("not base64".into()).into();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let err = resp.api_error().expect("error");
        assert_eq!(err.error, INVALID_IMAGE);
        assert_eq!(err.message, "not base64");
    }

    #[test]
    fn ocr_failure_keeps_captured_output() {
        let resp: ApiResponse<()> =
            LectorError::OcrExecution("Error opening data file".into()).into();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let err = resp.api_error().expect("error");
        assert_eq!(err.error, PROCESSING_FAILED);
        assert_eq!(err.message, "Error opening data file");
        assert!(resp.data().is_none());
    }
}
