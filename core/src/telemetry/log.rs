use log::info;

/// Logger scoped to one analysis stage.
pub struct StageLogger {
    stage: &'static str,
}

impl StageLogger {
    pub fn new(stage: &'static str) -> Self {
        Self { stage }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.stage, message);
    }
}
