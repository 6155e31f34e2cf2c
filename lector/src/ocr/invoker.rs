use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error};

use crate::config::OcrConfig;
use crate::error::{LectorError, Result};

use super::runner::CommandRunner;

/// Returned instead of an empty string when tesseract finds no text.
pub const NO_TEXT_DETECTED: &str = "No text detected in the image";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrResult {
    pub text: String,
    /// `false` when `text` is the [`NO_TEXT_DETECTED`] sentinel.
    pub text_found: bool,
}

/// Runs tesseract on a single image file.
#[derive(Clone)]
pub struct OcrInvoker {
    runner: Arc<dyn CommandRunner>,
    language: String,
    engine_mode: u8,
    page_segmentation_mode: u8,
}

impl OcrInvoker {
    pub fn new(runner: Arc<dyn CommandRunner>, config: &OcrConfig) -> Self {
        Self {
            runner,
            language: config.language.clone(),
            engine_mode: config.engine_mode,
            page_segmentation_mode: config.page_segmentation_mode,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// `<image> stdout -l <lang> --oem <n> --psm <n>`
    pub fn build_args(&self, image_path: &Path) -> Vec<String> {
        vec![
            image_path.to_string_lossy().into_owned(),
            "stdout".to_string(),
            "-l".to_string(),
            self.language.clone(),
            "--oem".to_string(),
            self.engine_mode.to_string(),
            "--psm".to_string(),
            self.page_segmentation_mode.to_string(),
        ]
    }

    pub async fn extract_text(&self, image_path: &Path) -> Result<OcrResult> {
        let args = self.build_args(image_path);
        let output = self.runner.run(&args).await?;

        if !output.success() {
            let captured = output.combined();
            error!(exit_code = ?output.exit_code, output = %captured, "Tesseract failed");
            return Err(LectorError::OcrExecution(captured));
        }

        let text = output.combined();
        debug!(chars = text.len(), "Tesseract finished");

        if text.is_empty() {
            Ok(OcrResult {
                text: NO_TEXT_DETECTED.to_string(),
                text_found: false,
            })
        } else {
            Ok(OcrResult {
                text,
                text_found: true,
            })
        }
    }
}
