//! OCR (Optical Character Recognition) Module
//!
//! Text extraction is delegated to the `tesseract` command-line tool, run
//! once per request as a subprocess.
//!
//! # Architecture
//!
//! - `CommandRunner` trait is the only place a process is spawned
//! - `ProcessRunner` implements it with `tokio::process` and a timeout
//! - `OcrInvoker` builds the tesseract arguments and interprets the result
//! - `testing::ScriptedRunner` replays canned outputs in tests
//!
//! # Configuration
//!
//! Invocation is controlled via `OcrConfig` (see `config.rs`):
//! - `binary`: executable name or path (`TESSERACT_BIN`)
//! - `language`: `+`-joined language codes (`TESSERACT_LANGUAGE`)
//! - `engine_mode` / `page_segmentation_mode`: `--oem` / `--psm` values
//! - `timeout_secs`: upper bound for a single run (`OCR_TIMEOUT`)
//!
//! # Usage
//!
//! ```rust,ignore
//! let runner = Arc::new(ProcessRunner::new("tesseract", Duration::from_secs(30)));
//! let ocr = OcrInvoker::new(runner, &config.ocr);
//! let result = ocr.extract_text(temp_file.path()).await?;
//! ```

mod invoker;
mod runner;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use invoker::{OcrInvoker, OcrResult, NO_TEXT_DETECTED};
pub use runner::{CommandOutput, CommandRunner, ProcessRunner};
