use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;
use crate::health;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lector API",
        version = "1.0.0",
        description = "Extracts text from images with Tesseract OCR.",
    ),
    paths(
        handlers::health::health_check,
        handlers::ocr::extract_text,
    ),
    components(schemas(
        // Errors
        response::ApiError,
        // OCR
        dto::ocr::ExtractTextRequest,
        dto::ocr::ExtractTextUpload,
        dto::ocr::ExtractTextResponse,
        // Health
        health::HealthStatus,
        health::HealthReport,
        health::Services,
        health::TesseractStatus,
        health::LanguageConfig,
        health::LanguageInventory,
        health::ConcurrentConfigStatus,
        health::ConcurrentSettings,
        health::ConcurrencySummary,
    )),
    tags(
        (name = "health", description = "Tesseract availability and configuration"),
        (name = "ocr", description = "Text extraction from images"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
