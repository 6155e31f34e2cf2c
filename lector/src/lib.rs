pub mod api;
pub mod config;
pub mod error;
pub mod health;
pub mod intake;
pub mod ocr;
