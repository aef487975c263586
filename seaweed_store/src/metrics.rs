//! Metrics for seaweed operations.

use std::time::Instant;

use opentelemetry::{
    metrics::{Counter, Histogram, Meter},
    KeyValue,
};

/// Instruments recorded for every client operation.
#[derive(Clone)]
pub struct TransferMetrics {
    /// Histogram for operation latencies.
    pub operations: Histogram<f64>,

    /// Counter for failed operations.
    pub errors: Counter<u64>,
}

impl TransferMetrics {
    pub fn new(meter: &Meter) -> Self {
        let operations = meter
            .f64_histogram("seaweed_operation_duration_seconds")
            .with_description("Duration of seaweed operations in seconds")
            .build();

        let errors = meter
            .u64_counter("seaweed_errors_total")
            .with_description("Total number of failed seaweed operations")
            .build();

        Self { operations, errors }
    }

    pub fn record_error(&self, operation: &'static str) {
        self.errors.add(1, &[KeyValue::new("operation", operation)]);
    }
}

/// Records elapsed time into a histogram when dropped.
pub struct Timer {
    start: Instant,
    histogram: Histogram<f64>,
    labels: Vec<KeyValue>,
}

impl Timer {
    pub fn start(metrics: &TransferMetrics, operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            histogram: metrics.operations.clone(),
            labels: vec![KeyValue::new("operation", operation)],
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.record(duration, &self.labels);
    }
}
