// Common test utilities for integration tests
#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};

use lector::api::AppState;
use lector::config::{ConcurrencyConfig, Config, OcrConfig, ServerConfig};
use lector::error::Result;
use lector::ocr::{CommandOutput, CommandRunner};

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

pub fn test_config(temp_dir: &Path) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_upload_bytes: 1024 * 1024,
        },
        ocr: OcrConfig {
            temp_dir: temp_dir.to_path_buf(),
            ..OcrConfig::default()
        },
        concurrency: ConcurrencyConfig::default(),
    }
}

pub fn test_state(temp_dir: &Path, runner: Arc<dyn CommandRunner>) -> AppState {
    init_test_logger();
    AppState::new(test_config(temp_dir), runner)
}

/// Reads the image tesseract would have been given and prints it back as
/// text, recording each path it saw.
#[derive(Default)]
pub struct EchoRunner {
    pub seen: Mutex<Vec<String>>,
}

#[async_trait]
impl CommandRunner for EchoRunner {
    async fn run(&self, args: &[String]) -> Result<CommandOutput> {
        let path = args[0].clone();
        let bytes = tokio::fs::read(&path).await?;
        self.seen.lock().unwrap().push(path);
        Ok(CommandOutput {
            exit_code: Some(0),
            stdout: String::from_utf8_lossy(&bytes).into_owned(),
            stderr: String::new(),
        })
    }
}

pub fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub const BOUNDARY: &str = "lector-test-boundary";

/// Single-part multipart body carrying `image`.
pub fn multipart_request(
    uri: &str,
    file_name: Option<&str>,
    content_type: Option<&str>,
    content: &[u8],
) -> Request<Body> {
    let mut disposition = "Content-Disposition: form-data; name=\"image\"".to_string();
    if let Some(name) = file_name {
        disposition.push_str(&format!("; filename=\"{name}\""));
    }

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n{disposition}\r\n").as_bytes());
    if let Some(ct) = content_type {
        body.extend_from_slice(format!("Content-Type: {ct}\r\n").as_bytes());
    }
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}
