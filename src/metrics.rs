use log::info;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Global metrics instance
pub static METRICS: Lazy<Mutex<Metrics>> = Lazy::new(|| Mutex::new(Metrics::new()));

/// Report run metrics tracker
#[derive(Debug, Default)]
pub struct Metrics {
    pub total_lines_read: u64,
    pub total_readings_parsed: u64,
    pub total_placeholders_skipped: u64,
    pub total_bytes_processed: u64,
    pub total_buckets: u64,
    pub total_buckets_gated: u64,
    pub total_artifacts_written: u64,
    // Insertion order is the order the phases ran in.
    pub processing_times: Vec<(String, Duration)>,
    pub start_time: Option<Instant>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    pub fn record_lines(&mut self, count: u64) {
        self.total_lines_read += count;
    }

    pub fn record_readings(&mut self, count: u64) {
        self.total_readings_parsed += count;
    }

    pub fn record_placeholders(&mut self, count: u64) {
        self.total_placeholders_skipped += count;
    }

    pub fn record_bytes_processed(&mut self, bytes: u64) {
        self.total_bytes_processed += bytes;
    }

    pub fn record_buckets(&mut self, total: u64, gated: u64) {
        self.total_buckets += total;
        self.total_buckets_gated += gated;
    }

    pub fn record_artifacts(&mut self, count: u64) {
        self.total_artifacts_written += count;
    }

    pub fn record_processing_time(&mut self, operation: String, duration: Duration) {
        self.processing_times.push((operation, duration));
    }

    pub fn get_total_duration(&self) -> Duration {
        self.start_time
            .map(|start| start.elapsed())
            .unwrap_or_default()
    }

    pub fn get_throughput(&self) -> f64 {
        let duration_secs = self.get_total_duration().as_secs_f64();
        if duration_secs > 0.0 {
            self.total_readings_parsed as f64 / duration_secs
        } else {
            0.0
        }
    }

    pub fn log_summary(&self) {
        info!("========== Report Metrics Summary ==========");
        info!("Total Duration: {:.2?}", self.get_total_duration());
        info!("Lines Read: {}", self.total_lines_read);
        info!("Readings Parsed: {}", self.total_readings_parsed);
        info!("Placeholder Lines Skipped: {}", self.total_placeholders_skipped);
        info!(
            "Bytes Processed: {:.2} MB",
            self.total_bytes_processed as f64 / 1_048_576.0
        );
        info!(
            "Days: {} ({} below minimum sample size)",
            self.total_buckets, self.total_buckets_gated
        );
        info!("Artifacts Written: {}", self.total_artifacts_written);
        info!("Throughput: {:.2} readings/sec", self.get_throughput());

        for (op, duration) in &self.processing_times {
            info!("  {}: {:.2?}", op, duration);
        }
    }
}

/// Helper macro to time an operation
#[macro_export]
macro_rules! time_operation {
    ($name:expr, $op:expr) => {{
        let start = std::time::Instant::now();
        let result = $op;
        let duration = start.elapsed();
        $crate::metrics::METRICS
            .lock()
            .record_processing_time($name.to_string(), duration);
        result
    }};
}
