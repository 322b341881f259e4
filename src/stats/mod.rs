use chrono::{DateTime, Duration, Utc};
use log::info;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct RunStats {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub rows_seen: usize,
    pub rows_dropped: usize,
    pub reports_extracted: usize,
    pub records_persisted: usize,
    pub fetch_time_ms: i64,
    pub failed: bool,
}

#[derive(Debug, Clone)]
pub struct StatsTracker {
    stats: Arc<RwLock<RunStats>>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(RwLock::new(RunStats {
                start_time: Utc::now(),
                end_time: None,
                rows_seen: 0,
                rows_dropped: 0,
                reports_extracted: 0,
                records_persisted: 0,
                fetch_time_ms: 0,
                failed: false,
            })),
        }
    }

    pub fn record_fetch(&self, duration: Duration) {
        self.stats.write().fetch_time_ms = duration.num_milliseconds();
    }

    pub fn record_extraction(&self, rows_seen: usize, rows_dropped: usize, extracted: usize) {
        let mut stats = self.stats.write();
        stats.rows_seen = rows_seen;
        stats.rows_dropped = rows_dropped;
        stats.reports_extracted = extracted;
    }

    pub fn record_persisted(&self, count: usize) {
        self.stats.write().records_persisted = count;
    }

    pub fn record_failure(&self) {
        self.stats.write().failed = true;
    }

    pub fn finish(&self) {
        self.stats.write().end_time = Some(Utc::now());
    }

    pub fn get_stats(&self) -> RunStats {
        self.stats.read().clone()
    }

    pub fn log_summary(&self) {
        let stats = self.stats.read();
        let duration = stats
            .end_time
            .unwrap_or_else(Utc::now)
            .signed_duration_since(stats.start_time);

        info!(
            "Run finished in {}ms (fetch {}ms): rows={} dropped={} extracted={} persisted={} failed={}",
            duration.num_milliseconds(),
            stats.fetch_time_ms,
            stats.rows_seen,
            stats.rows_dropped,
            stats.reports_extracted,
            stats.records_persisted,
            stats.failed
        );
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}
