use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing store mutations and summary outcomes.
#[derive(Default)]
pub struct RosterMetrics {
    records_created: AtomicU64,
    records_updated: AtomicU64,
    records_deleted: AtomicU64,
    summaries_generated: AtomicU64,
    summary_failures: AtomicU64,
}

impl RosterMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful create.
    pub fn record_created(&self) {
        self.records_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful update.
    pub fn record_updated(&self) {
        self.records_updated.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful delete.
    pub fn record_deleted(&self) {
        self.records_deleted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of a provider call.
    pub fn record_summary(&self, succeeded: bool) {
        let counter = if succeeded {
            &self.summaries_generated
        } else {
            &self.summary_failures
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_created: self.records_created.load(Ordering::Relaxed),
            records_updated: self.records_updated.load(Ordering::Relaxed),
            records_deleted: self.records_deleted.load(Ordering::Relaxed),
            summaries_generated: self.summaries_generated.load(Ordering::Relaxed),
            summary_failures: self.summary_failures.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of the counters used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Records created since startup.
    pub records_created: u64,
    /// Successful updates since startup.
    pub records_updated: u64,
    /// Records deleted since startup.
    pub records_deleted: u64,
    /// Summaries returned by the provider.
    pub summaries_generated: u64,
    /// Provider calls that ended in an error.
    pub summary_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_each_event_kind() {
        let metrics = RosterMetrics::new();
        metrics.record_created();
        metrics.record_created();
        metrics.record_updated();
        metrics.record_deleted();
        metrics.record_summary(true);
        metrics.record_summary(false);
        metrics.record_summary(false);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.records_created, 2);
        assert_eq!(snapshot.records_updated, 1);
        assert_eq!(snapshot.records_deleted, 1);
        assert_eq!(snapshot.summaries_generated, 1);
        assert_eq!(snapshot.summary_failures, 2);
    }

    #[test]
    fn snapshot_starts_at_zero() {
        let snapshot = RosterMetrics::new().snapshot();
        assert_eq!(snapshot.records_created, 0);
        assert_eq!(snapshot.summary_failures, 0);
    }
}
