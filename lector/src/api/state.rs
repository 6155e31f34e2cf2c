use std::sync::Arc;

use crate::config::Config;
use crate::health::HealthProber;
use crate::intake::ImageIntake;
use crate::ocr::{CommandRunner, OcrInvoker};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub intake: ImageIntake,
    pub ocr: OcrInvoker,
    pub health: HealthProber,
}

impl AppState {
    /// Wire the request components around a single command runner.
    pub fn new(config: Config, runner: Arc<dyn CommandRunner>) -> Self {
        let config = Arc::new(config);
        let intake = ImageIntake::new(config.ocr.temp_dir.clone());
        let ocr = OcrInvoker::new(runner.clone(), &config.ocr);
        let health = HealthProber::new(runner, &config.ocr, &config.concurrency);

        Self {
            config,
            intake,
            ocr,
            health,
        }
    }
}
