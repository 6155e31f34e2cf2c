use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LectorError {
    /// Missing, malformed or unsupported image payload.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Tesseract could not be launched, timed out or exited non-zero.
    #[error("OCR execution error: {0}")]
    OcrExecution(String),

    /// A health probe failed to run. Rendered inline by the health
    /// endpoint, never as an HTTP error.
    #[error("Health check error: {0}")]
    HealthCheck(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LectorError {
    pub fn status(&self) -> StatusCode {
        match self {
            LectorError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            LectorError::OcrExecution(_)
            | LectorError::HealthCheck(_)
            | LectorError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The bare message, without the variant prefix added by `Display`.
    pub fn detail(&self) -> String {
        match self {
            LectorError::InvalidInput(msg)
            | LectorError::OcrExecution(msg)
            | LectorError::HealthCheck(msg) => msg.clone(),
            LectorError::Io(e) => e.to_string(),
        }
    }
}

impl IntoResponse for LectorError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.to_string(),
            "message": self.detail(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, LectorError>;
