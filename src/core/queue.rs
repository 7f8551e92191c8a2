//! Bounded event queue between producers and the dispatcher
//!
//! The sole hand-off point in the pipeline. Enqueue never blocks the caller
//! beyond the channel's internal critical section: when the queue is full the
//! record is dropped and the overflow counter increments. Overflow is never
//! surfaced to the caller as an error and never logged recursively.
//!
//! Constructors return the consumer handle separately; the dispatcher thread
//! holds the only `Receiver`, so once it exits the channel disconnects and
//! later enqueues are discarded rather than accumulating undeliverable
//! records.

use super::metrics::PipelineMetrics;
use super::record::Record;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::Arc;

pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

pub struct EventQueue {
    sender: Sender<Record>,
    capacity: usize,
    metrics: Arc<PipelineMetrics>,
}

impl EventQueue {
    pub fn new(capacity: usize) -> (Self, Receiver<Record>) {
        Self::with_metrics(capacity, Arc::new(PipelineMetrics::new()))
    }

    pub fn with_metrics(
        capacity: usize,
        metrics: Arc<PipelineMetrics>,
    ) -> (Self, Receiver<Record>) {
        let (sender, receiver) = bounded(capacity);
        (
            Self {
                sender,
                capacity,
                metrics,
            },
            receiver,
        )
    }

    /// Append a record without blocking
    ///
    /// Returns `true` if the record was queued. On a full queue the record is
    /// discarded and counted; on a disconnected channel (dispatcher already
    /// stopped) the record is discarded without touching the overflow counter.
    pub fn enqueue(&self, record: Record) -> bool {
        match self.sender.try_send(record) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                self.metrics.record_dropped();
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Records dropped because the queue was full
    pub fn overflow_count(&self) -> u64 {
        self.metrics.records_dropped()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.sender.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sender.is_empty()
    }
}
