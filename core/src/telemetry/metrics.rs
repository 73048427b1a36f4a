use std::sync::Mutex;

/// Counts stage executions and failures across one runner's lifetime.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

struct Metrics {
    stages_run: usize,
    failures: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics {
                stages_run: 0,
                failures: 0,
            }),
        }
    }

    pub fn record_stage(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.stages_run += 1;
        }
    }

    pub fn record_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.failures += 1;
        }
    }

    pub fn snapshot(&self) -> (usize, usize) {
        if let Ok(metrics) = self.inner.lock() {
            (metrics.stages_run, metrics.failures)
        } else {
            (0, 0)
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
