use serde::Deserialize;
use std::env;
use std::path::PathBuf;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.trim().parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn env_non_empty(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
    pub concurrency: ConcurrencyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on request bodies, uploads included.
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Path or name of the tesseract executable.
    pub binary: String,
    /// Tesseract language code, possibly several joined with `+` (e.g. `spa+eng`).
    pub language: String,
    pub engine_mode: u8,
    pub page_segmentation_mode: u8,
    pub timeout_secs: u64,
    pub max_concurrent_requests: u32,
    pub temp_dir: PathBuf,
}

/// Process-level settings that are reported by the health endpoint but
/// not enforced by the service itself.
#[derive(Debug, Clone, Deserialize)]
pub struct ConcurrencyConfig {
    pub workers: u32,
    pub threads: u32,
}

pub const DEFAULT_LANGUAGE: &str = "spa";

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            binary: "tesseract".to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            engine_mode: 3,
            page_segmentation_mode: 6,
            timeout_secs: 30,
            max_concurrent_requests: 10,
            temp_dir: env::temp_dir().join("ocr"),
        }
    }
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            threads: 8,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let ocr_defaults = OcrConfig::default();
        let concurrency_defaults = ConcurrencyConfig::default();

        Self {
            server: ServerConfig {
                host: env::var("LECTOR_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("PORT", 3000),
                max_upload_bytes: parse_env_or("OCR_MAX_UPLOAD_BYTES", 25 * 1024 * 1024),
            },
            ocr: OcrConfig {
                binary: env_non_empty("TESSERACT_BIN").unwrap_or(ocr_defaults.binary),
                language: env_non_empty("TESSERACT_LANGUAGE").unwrap_or(ocr_defaults.language),
                engine_mode: parse_env_or("TESSERACT_OEM", ocr_defaults.engine_mode),
                page_segmentation_mode: parse_env_or(
                    "TESSERACT_PSM",
                    ocr_defaults.page_segmentation_mode,
                ),
                timeout_secs: parse_env_or("OCR_TIMEOUT", ocr_defaults.timeout_secs),
                max_concurrent_requests: parse_env_or(
                    "OCR_MAX_CONCURRENT",
                    ocr_defaults.max_concurrent_requests,
                ),
                temp_dir: env_non_empty("OCR_TEMP_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(ocr_defaults.temp_dir),
            },
            concurrency: ConcurrencyConfig {
                workers: parse_env_or("WEB_CONCURRENCY", concurrency_defaults.workers),
                threads: parse_env_or("RAILS_MAX_THREADS", concurrency_defaults.threads),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const OCR_VARS: &[&str] = &[
        "TESSERACT_BIN",
        "TESSERACT_LANGUAGE",
        "TESSERACT_OEM",
        "TESSERACT_PSM",
        "OCR_TIMEOUT",
        "OCR_MAX_CONCURRENT",
        "OCR_TEMP_DIR",
        "WEB_CONCURRENCY",
        "RAILS_MAX_THREADS",
    ];

    fn clear_ocr_vars() {
        for var in OCR_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_ocr_config_defaults() {
        clear_ocr_vars();

        let config = Config::default();
        assert_eq!(config.ocr.binary, "tesseract");
        assert_eq!(config.ocr.language, "spa");
        assert_eq!(config.ocr.engine_mode, 3);
        assert_eq!(config.ocr.page_segmentation_mode, 6);
        assert_eq!(config.ocr.timeout_secs, 30);
        assert_eq!(config.ocr.max_concurrent_requests, 10);
        assert!(config.ocr.temp_dir.ends_with("ocr"));
        assert_eq!(config.concurrency.workers, 2);
        assert_eq!(config.concurrency.threads, 8);
    }

    #[test]
    #[serial]
    fn test_ocr_config_from_env() {
        clear_ocr_vars();
        std::env::set_var("TESSERACT_LANGUAGE", "spa+eng");
        std::env::set_var("OCR_TIMEOUT", "45");
        std::env::set_var("OCR_MAX_CONCURRENT", "4");
        std::env::set_var("OCR_TEMP_DIR", "/var/tmp/lector");
        std::env::set_var("WEB_CONCURRENCY", "3");
        std::env::set_var("RAILS_MAX_THREADS", "16");

        let config = Config::default();
        assert_eq!(config.ocr.language, "spa+eng");
        assert_eq!(config.ocr.timeout_secs, 45);
        assert_eq!(config.ocr.max_concurrent_requests, 4);
        assert_eq!(config.ocr.temp_dir, PathBuf::from("/var/tmp/lector"));
        assert_eq!(config.concurrency.workers, 3);
        assert_eq!(config.concurrency.threads, 16);

        clear_ocr_vars();
    }

    #[test]
    #[serial]
    fn test_invalid_number_falls_back_to_default() {
        clear_ocr_vars();
        std::env::set_var("OCR_TIMEOUT", "soon");

        let config = Config::default();
        assert_eq!(config.ocr.timeout_secs, 30);

        clear_ocr_vars();
    }

    #[test]
    #[serial]
    fn test_blank_language_uses_default() {
        clear_ocr_vars();
        std::env::set_var("TESSERACT_LANGUAGE", "  ");

        let config = Config::default();
        assert_eq!(config.ocr.language, "spa");

        clear_ocr_vars();
    }
}
