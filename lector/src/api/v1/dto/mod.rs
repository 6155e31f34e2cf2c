pub mod ocr;

pub use ocr::{ExtractTextRequest, ExtractTextResponse, ExtractTextUpload};
