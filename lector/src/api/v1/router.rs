use axum::{
    routing::{get, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;

pub fn v1_router() -> Router<AppState> {
    let ocr = Router::new().route("/extract_text", post(handlers::ocr::extract_text));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/health/check", get(handlers::health_check))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .merge(super::openapi::redoc_router())
        .nest("/ocr", ocr)
}
