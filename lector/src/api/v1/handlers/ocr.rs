//! v1 OCR handler.
//!
//! Intake → tesseract → response. The temp file lives only inside
//! [`run_ocr`] and is removed before it returns, on every path.

use axum::extract::State;
use tracing::info;

use crate::api::v1::dto::{ExtractTextRequest, ExtractTextResponse, ExtractTextUpload};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::{AppState, ImagePayload};
use crate::error::{LectorError, Result};
use crate::intake::ImageSource;
use crate::ocr::OcrResult;

pub const MISSING_IMAGE_ERROR: &str = "No image provided";
pub const MISSING_IMAGE_MESSAGE: &str =
    "An image is required, sent as base64 or as a file upload";
const SUCCESS_MESSAGE: &str = "Text extracted successfully";

/// `POST /api/v1/ocr/extract_text`
///
/// Accepts `{ "image": "<base64>" }` as JSON, or a multipart form whose
/// `image` part is a file or base64 text.
#[utoipa::path(
    post,
    path = "/api/v1/ocr/extract_text",
    tag = "ocr",
    operation_id = "ocr.extractText",
    request_body(
        content(
            (ExtractTextRequest = "application/json"),
            (ExtractTextUpload = "multipart/form-data")
        )
    ),
    responses(
        (status = 200, description = "Text extracted", body = ExtractTextResponse),
        (status = 400, description = "Image missing or malformed", body = ApiError),
        (status = 500, description = "Tesseract failed", body = ApiError),
    )
)]
pub async fn extract_text(
    State(state): State<AppState>,
    payload: std::result::Result<ImagePayload, LectorError>,
) -> ApiResponse<ExtractTextResponse> {
    let source = match payload {
        Ok(ImagePayload(Some(source))) => source,
        Ok(ImagePayload(None)) => {
            return ApiResponse::error(
                ErrorCode::InvalidRequest,
                MISSING_IMAGE_ERROR,
                MISSING_IMAGE_MESSAGE,
            );
        }
        Err(e) => return e.into(),
    };

    match run_ocr(&state, source).await {
        Ok(result) => ApiResponse::success(ExtractTextResponse {
            success: true,
            text: result.text,
            message: SUCCESS_MESSAGE.to_string(),
        }),
        Err(e) => e.into(),
    }
}

async fn run_ocr(state: &AppState, source: ImageSource) -> Result<OcrResult> {
    let image = state.intake.materialize(source).await?;
    let result = state.ocr.extract_text(image.path()).await;
    image.remove().await;
    let result = result?;
    info!(
        text_found = result.text_found,
        chars = result.text.len(),
        "OCR request completed"
    );
    Ok(result)
}
