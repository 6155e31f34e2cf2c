//! OCR DTOs for the v1 API.

use serde::{Deserialize, Serialize};

/// JSON body for `POST /api/v1/ocr/extract_text`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct ExtractTextRequest {
    /// Base64 image data, optionally prefixed with `data:image/<format>;base64,`.
    #[schema(value_type = Option<String>)]
    pub image: Option<serde_json::Value>,
}

/// Multipart form accepted by `POST /api/v1/ocr/extract_text`.
///
/// The `image` part is either a file or a base64 text value.
#[derive(Debug, utoipa::ToSchema)]
pub struct ExtractTextUpload {
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

/// URL-encoded form body; `image` holds base64 text.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractTextForm {
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ExtractTextResponse {
    pub success: bool,
    /// Recognized text, or a fixed notice when none was found.
    pub text: String,
    pub message: String,
}
