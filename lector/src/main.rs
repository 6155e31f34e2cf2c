use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lector::api::{create_router, AppState};
use lector::config::Config;
use lector::health::HealthStatus;
use lector::ocr::{CommandRunner, ProcessRunner};

#[derive(Parser)]
#[command(name = "lector")]
#[command(about = "HTTP service that extracts text from images with Tesseract OCR")]
struct Args {
    /// Run the health probe once, print the report and exit
    #[arg(long)]
    check: bool,

    /// Do not delete stale files from the OCR scratch directory at startup
    #[arg(long)]
    no_sweep: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lector=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    let runner: Arc<dyn CommandRunner> = Arc::new(ProcessRunner::new(
        config.ocr.binary.clone(),
        Duration::from_secs(config.ocr.timeout_secs),
    ));
    let state = AppState::new(config.clone(), runner);

    if args.check {
        let report = state.health.check().await;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(if report.status == HealthStatus::Ok {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    tracing::info!(
        "Preparing OCR scratch directory {}...",
        config.ocr.temp_dir.display()
    );
    state.intake.ensure_temp_dir().await?;
    if !args.no_sweep {
        match state.intake.sweep().await {
            Ok(0) => {}
            Ok(removed) => tracing::info!("Removed {} stale temporary files", removed),
            Err(e) => tracing::warn!("Could not sweep OCR scratch directory: {}", e),
        }
    }

    tracing::info!(
        "Using {} (language={}, oem={}, psm={}, timeout={}s)",
        config.ocr.binary,
        config.ocr.language,
        config.ocr.engine_mode,
        config.ocr.page_segmentation_mode,
        config.ocr.timeout_secs
    );
    state.health.log_language_check().await;

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Lector starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/v1/health", addr);
    tracing::info!("  OCR endpoint: http://{}/api/v1/ocr/extract_text", addr);
    tracing::info!("  API docs:     http://{}/api/v1/docs", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(ExitCode::SUCCESS)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining in-flight requests...");
}
