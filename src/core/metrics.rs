//! Pipeline metrics for observability
//!
//! Counters shared between the producer facade, the event queue, and the
//! dispatcher. Overflow is reported here instead of being logged recursively.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters tracking pipeline health
///
/// # Example
///
/// ```
/// use logpipe::PipelineMetrics;
///
/// let metrics = PipelineMetrics::new();
/// metrics.record_delivered();
/// metrics.record_dropped();
///
/// assert_eq!(metrics.records_delivered(), 1);
/// assert_eq!(metrics.records_dropped(), 1);
/// ```
#[derive(Debug)]
pub struct PipelineMetrics {
    /// Records fully processed by the dispatcher
    records_delivered: AtomicU64,

    /// Records dropped on enqueue because the queue was full
    records_dropped: AtomicU64,

    /// Individual per-sink write failures
    sink_write_errors: AtomicU64,
}

impl PipelineMetrics {
    pub const fn new() -> Self {
        Self {
            records_delivered: AtomicU64::new(0),
            records_dropped: AtomicU64::new(0),
            sink_write_errors: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_delivered(&self) -> u64 {
        self.records_delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_dropped(&self) -> u64 {
        self.records_dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_write_errors(&self) -> u64 {
        self.sink_write_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.records_delivered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.records_dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_error(&self) -> u64 {
        self.sink_write_errors.fetch_add(1, Ordering::Relaxed)
    }

    /// Drop rate as a percentage (0.0 - 100.0); 0.0 when nothing was logged
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.records_dropped() as f64;
        let total = self.records_delivered() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.records_delivered.store(0, Ordering::Relaxed);
        self.records_dropped.store(0, Ordering::Relaxed);
        self.sink_write_errors.store(0, Ordering::Relaxed);
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for PipelineMetrics {
    /// Create a snapshot of the current counter values
    fn clone(&self) -> Self {
        Self {
            records_delivered: AtomicU64::new(self.records_delivered()),
            records_dropped: AtomicU64::new(self.records_dropped()),
            sink_write_errors: AtomicU64::new(self.sink_write_errors()),
        }
    }
}
