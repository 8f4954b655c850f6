// file: src/utils/telemetry.rs
// description: Operation timing and throughput reporting for pipeline runs
// reference: tracing based run summaries

use std::fmt;
use std::time::{Duration, Instant};
use tracing::info;

/// Times one pipeline run and logs its throughput when finished.
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        info!("Starting operation: {}", operation);
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish_with_count(self, items: usize) -> RunMetrics {
        let metrics = RunMetrics {
            operation: self.operation,
            items,
            elapsed: self.start.elapsed(),
        };
        info!("Completed operation: {}", metrics);
        metrics
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunMetrics {
    pub operation: String,
    pub items: usize,
    pub elapsed: Duration,
}

impl RunMetrics {
    pub fn items_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 { self.items as f64 / secs } else { 0.0 }
    }
}

impl fmt::Display for RunMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} items in {:.2}s ({:.2} items/sec)",
            self.operation,
            self.items,
            self.elapsed.as_secs_f64(),
            self.items_per_second()
        )
    }
}
