use crate::workflows::ScanOutcome;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Scan outcome counters
#[derive(Debug, Default)]
pub struct ScanMetrics {
    pub found: AtomicU64,
    pub not_found: AtomicU64,
    pub successes: AtomicU64,
    pub mismatches: AtomicU64,
    pub ignored: AtomicU64,
    pub resets: AtomicU64,
}

impl ScanMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, outcome: &ScanOutcome) {
        let counter = match outcome {
            ScanOutcome::Found { .. } => &self.found,
            ScanOutcome::NotFound { .. } => &self.not_found,
            ScanOutcome::Success { .. } => &self.successes,
            ScanOutcome::Mismatch { .. } => &self.mismatches,
            ScanOutcome::Ignored => &self.ignored,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reset(&self) {
        self.resets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> ScanStats {
        ScanStats {
            found: self.found.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            mismatches: self.mismatches.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            resets: self.resets.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Scan metrics: found={}, not_found={}, successes={}, mismatches={}, ignored={}, resets={}",
            stats.found,
            stats.not_found,
            stats.successes,
            stats.mismatches,
            stats.ignored,
            stats.resets
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub found: u64,
    pub not_found: u64,
    pub successes: u64,
    pub mismatches: u64,
    pub ignored: u64,
    pub resets: u64,
}

/// Global metrics instance
static SCAN_METRICS: std::sync::LazyLock<ScanMetrics> =
    std::sync::LazyLock::new(ScanMetrics::new);

pub fn scan_metrics() -> &'static ScanMetrics {
    &SCAN_METRICS
}

/// Time an operation and log its duration when finished
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn finish(self) {
        let duration = self.start.elapsed();
        info!(
            operation = %self.operation,
            duration_ms = duration.as_millis() as u64,
            "Operation completed"
        );
    }
}
