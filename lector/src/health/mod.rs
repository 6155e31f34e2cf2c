//! Health probing.
//!
//! Runs `tesseract --version` and `tesseract --list-langs` through the
//! shared [`CommandRunner`], compares the installed languages with the
//! configured ones and reports the static concurrency settings. Probing
//! never fails as a whole: problems show up as `warning`/`error`
//! sub-statuses and a `degraded` overall status.

mod parse;

pub use parse::{listing_text, missing_languages, parse_language_list, parse_version};

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{ConcurrencyConfig, OcrConfig};
use crate::error::{LectorError, Result};
use crate::ocr::CommandRunner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Warning,
    Degraded,
    Error,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthReport {
    pub status: HealthStatus,
    /// ISO-8601 UTC, second precision.
    pub timestamp: String,
    pub services: Services,
    pub concurrency: ConcurrencySummary,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct Services {
    pub tesseract_ocr: TesseractStatus,
    pub concurrent_config: ConcurrentConfigStatus,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct TesseractStatus {
    pub status: HealthStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_config: Option<LanguageConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<LanguageInventory>,
    /// Captured output when `--version` exited non-zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct LanguageConfig {
    pub configured: String,
    pub status: HealthStatus,
    pub missing: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct LanguageInventory {
    pub available: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ConcurrentConfigStatus {
    pub status: HealthStatus,
    pub message: String,
    pub config: ConcurrentSettings,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ConcurrentSettings {
    pub max_concurrent: u32,
    /// Seconds.
    pub timeout: u64,
    pub temp_dir: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ConcurrencySummary {
    pub max_threads: u32,
    #[serde(rename = "puma_workers")]
    pub workers: u32,
    #[serde(rename = "puma_threads")]
    pub threads: u32,
}

/// `ok` only if every sub-check is `ok`.
pub fn aggregate(statuses: &[HealthStatus]) -> HealthStatus {
    if statuses.iter().all(|s| *s == HealthStatus::Ok) {
        HealthStatus::Ok
    } else {
        HealthStatus::Degraded
    }
}

/// Compare the configured language string against what is installed.
pub fn language_config(configured: &str, available: &[String]) -> LanguageConfig {
    let requested: Vec<&str> = configured
        .split('+')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .collect();
    let missing = missing_languages(&requested, available);

    let (status, message) = if missing.is_empty() {
        (
            HealthStatus::Ok,
            format!("Configured language(s): {configured}"),
        )
    } else {
        (
            HealthStatus::Warning,
            format!("Missing languages: {}", missing.join(", ")),
        )
    };

    LanguageConfig {
        configured: configured.to_string(),
        status,
        missing,
        message,
    }
}

/// Outcome of the startup language check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageCheck {
    /// The installed languages could not be listed.
    Unverified,
    Installed,
    Missing {
        missing: Vec<String>,
        available: Vec<String>,
    },
}

pub fn startup_language_check(configured: &str, available: Vec<String>) -> LanguageCheck {
    if available.is_empty() {
        return LanguageCheck::Unverified;
    }

    let missing = language_config(configured, &available).missing;
    if missing.is_empty() {
        LanguageCheck::Installed
    } else {
        LanguageCheck::Missing { missing, available }
    }
}

#[derive(Clone)]
pub struct HealthProber {
    runner: Arc<dyn CommandRunner>,
    ocr: OcrConfig,
    concurrency: ConcurrencyConfig,
}

impl HealthProber {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        ocr: &OcrConfig,
        concurrency: &ConcurrencyConfig,
    ) -> Self {
        Self {
            runner,
            ocr: ocr.clone(),
            concurrency: concurrency.clone(),
        }
    }

    pub async fn check(&self) -> HealthReport {
        let tesseract_ocr = self.check_tesseract().await;
        let concurrent_config = self.check_concurrent_config();
        let status = aggregate(&[tesseract_ocr.status, concurrent_config.status]);

        HealthReport {
            status,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            services: Services {
                tesseract_ocr,
                concurrent_config,
            },
            concurrency: ConcurrencySummary {
                max_threads: self.ocr.max_concurrent_requests,
                workers: self.concurrency.workers,
                threads: self.concurrency.threads,
            },
        }
    }

    pub async fn check_tesseract(&self) -> TesseractStatus {
        let output = match self.run(&["--version"]).await {
            Ok(output) => output,
            Err(e) => {
                warn!(error = %e, "Tesseract health probe failed");
                return TesseractStatus {
                    status: HealthStatus::Error,
                    message: format!("Error checking Tesseract: {}", e.detail()),
                    version: None,
                    language_config: None,
                    languages: None,
                    details: None,
                };
            }
        };

        if !output.success() {
            return TesseractStatus {
                status: HealthStatus::Error,
                message: "Tesseract OCR not available".to_string(),
                version: None,
                language_config: None,
                languages: None,
                details: Some(output.combined()),
            };
        }

        let available = self.available_languages().await;
        let language_config = language_config(&self.ocr.language, &available);

        TesseractStatus {
            status: language_config.status,
            message: "Tesseract OCR available".to_string(),
            version: parse_version(&output.combined()),
            language_config: Some(language_config),
            languages: Some(LanguageInventory {
                total: available.len(),
                available,
            }),
            details: None,
        }
    }

    /// Installed language codes, or empty when they cannot be listed.
    pub async fn available_languages(&self) -> Vec<String> {
        match self.run(&["--list-langs"]).await {
            Ok(output) if output.success() => parse_language_list(listing_text(&output)),
            Ok(output) => {
                warn!(exit_code = ?output.exit_code, "tesseract --list-langs failed");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "tesseract --list-langs could not run");
                Vec::new()
            }
        }
    }

    pub fn check_concurrent_config(&self) -> ConcurrentConfigStatus {
        ConcurrentConfigStatus {
            status: HealthStatus::Ok,
            message: "Concurrency configuration loaded".to_string(),
            config: ConcurrentSettings {
                max_concurrent: self.ocr.max_concurrent_requests,
                timeout: self.ocr.timeout_secs,
                temp_dir: self.ocr.temp_dir.display().to_string(),
            },
        }
    }

    /// Startup check: log whether the configured languages are installed.
    pub async fn log_language_check(&self) -> LanguageCheck {
        let available = self.available_languages().await;
        let check = startup_language_check(&self.ocr.language, available);

        match &check {
            LanguageCheck::Unverified => {
                warn!("Could not verify installed Tesseract languages");
            }
            LanguageCheck::Installed => {
                info!(language = %self.ocr.language, "Tesseract configured");
            }
            LanguageCheck::Missing { missing, available } => {
                warn!(
                    missing = %missing.join(", "),
                    available = %available.join(", "),
                    "Configured Tesseract languages are not installed"
                );
            }
        }
        check
    }

    async fn run(&self, args: &[&str]) -> Result<crate::ocr::CommandOutput> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.runner
            .run(&args)
            .await
            .map_err(|e| LectorError::HealthCheck(e.detail()))
    }
}
