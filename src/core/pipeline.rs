//! Pipeline facade: the process-wide entry point for producers
//!
//! A `Pipeline` is explicitly constructed and explicitly passed (or wrapped in
//! an `Arc`) rather than hidden behind a global; the intended usage is one
//! pipeline per process, created at startup and shut down before exit.
//! Producers only construct records and enqueue them; rendering and sink I/O
//! happen on the dispatcher thread.

use super::config::{PipelineConfig, SinkConfig, SinkKind};
use super::dispatcher::{Dispatcher, DispatcherState};
use super::error::{PipelineError, Result};
use super::filter::SeverityFilter;
use super::metrics::PipelineMetrics;
use super::queue::{EventQueue, DEFAULT_QUEUE_CAPACITY};
use super::record::Record;
use super::renderer::JsonRenderer;
use super::severity::Severity;
use super::RecordContext;
use crate::sinks::{ConsoleSink, RotatingFileSink, Sink};
use std::sync::Arc;

pub struct Pipeline {
    dispatcher: Dispatcher,
    queue: EventQueue,
    metrics: Arc<PipelineMetrics>,
    min_severity: Severity,
}

impl Pipeline {
    /// Create a builder for assembling a pipeline in code
    ///
    /// # Example
    /// ```
    /// use logpipe::prelude::*;
    /// use logpipe::sinks::ConsoleSink;
    ///
    /// let pipeline = Pipeline::builder()
    ///     .sink(ConsoleSink::stdout(), SeverityFilter::Band(Severity::Info))
    ///     .sink(ConsoleSink::stderr(), SeverityFilter::Threshold(Severity::Warning))
    ///     .queue_capacity(2048)
    ///     .build();
    ///
    /// pipeline.info("pipeline up");
    /// pipeline.shutdown();
    /// ```
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Construct a pipeline from a parsed configuration object
    ///
    /// Fails fast: invalid descriptors and unopenable sink targets surface
    /// here, never on the first log call.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Pipeline::builder()
            .field_name_map(config.field_name_map.clone())
            .queue_capacity(config.queue_capacity)
            .min_severity(config.min_severity);

        for sink_config in &config.sinks {
            let (sink, filter) = build_sink(sink_config)?;
            builder.sinks.push((sink, filter));
        }

        Ok(builder.build())
    }

    /// Construct a record and enqueue it without blocking
    pub fn log(&self, severity: Severity, message: impl Into<String>) {
        if severity < self.min_severity {
            return;
        }
        self.submit(Record::new(severity, message));
    }

    /// Log with caller-supplied context fields
    pub fn log_with_context(
        &self,
        severity: Severity,
        message: impl Into<String>,
        context: RecordContext,
    ) {
        if severity < self.min_severity {
            return;
        }
        self.submit(Record::new(severity, message).with_context(context));
    }

    /// Enqueue a pre-built record (error payloads, stack snippets, location)
    ///
    /// Returns `false` when the record was discarded: below the severity
    /// floor, queue overflow (which increments the dropped counter and is
    /// never an error), or a pipeline that has already shut down (discarded
    /// without counting).
    pub fn submit(&self, record: Record) -> bool {
        if record.severity < self.min_severity {
            return false;
        }
        self.queue.enqueue(record)
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(Severity::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(Severity::Info, message);
    }

    #[inline]
    pub fn warning(&self, message: impl Into<String>) {
        self.log(Severity::Warning, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(Severity::Error, message);
    }

    #[inline]
    pub fn critical(&self, message: impl Into<String>) {
        self.log(Severity::Critical, message);
    }

    /// Helper for structured info logging
    pub fn info_with_context(&self, message: impl Into<String>, context: RecordContext) {
        self.log_with_context(Severity::Info, message, context);
    }

    /// Helper for structured error logging
    pub fn error_with_context(&self, message: impl Into<String>, context: RecordContext) {
        self.log_with_context(Severity::Error, message, context);
    }

    /// Drain the queue, flush and close every sink, and return once done
    ///
    /// The host process must invoke this before terminating; omission risks
    /// losing buffered records (`Drop` also invokes it as a best effort).
    /// Idempotent.
    pub fn shutdown(&self) {
        self.dispatcher.stop();
    }

    pub fn state(&self) -> DispatcherState {
        self.dispatcher.state()
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    /// Records dropped on enqueue because the queue was full
    pub fn overflow_count(&self) -> u64 {
        self.queue.overflow_count()
    }

    pub fn min_severity(&self) -> Severity {
        self.min_severity
    }
}

fn build_sink(config: &SinkConfig) -> Result<(Box<dyn Sink>, SeverityFilter)> {
    let filter = config.filter.to_filter();
    let sink: Box<dyn Sink> = match config.kind {
        SinkKind::ConsoleStdout => Box::new(ConsoleSink::stdout()),
        SinkKind::ConsoleStderr => Box::new(ConsoleSink::stderr()),
        SinkKind::RotatingFile => {
            let path = config
                .path
                .as_ref()
                .ok_or_else(|| {
                    PipelineError::config("rotating-file", "sink requires a path")
                })?;
            let mut sink = RotatingFileSink::new(
                path,
                config.max_bytes.unwrap_or(super::config::DEFAULT_MAX_BYTES),
                config
                    .backup_count
                    .unwrap_or(super::config::DEFAULT_BACKUP_COUNT),
            )?;
            sink = sink.with_compression(config.compress);
            Box::new(sink)
        }
    };
    Ok((sink, filter))
}

/// Builder for assembling a `Pipeline` with a fluent API
pub struct PipelineBuilder {
    sinks: Vec<(Box<dyn Sink>, SeverityFilter)>,
    field_name_map: Vec<(String, String)>,
    queue_capacity: usize,
    min_severity: Severity,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            sinks: Vec::new(),
            field_name_map: Vec::new(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            min_severity: Severity::Debug,
        }
    }

    /// Add a sink with its severity filter
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S, filter: SeverityFilter) -> Self {
        self.sinks.push((Box::new(sink), filter));
        self
    }

    /// Set the output field-name map (output_key -> source_attribute)
    #[must_use = "builder methods return a new value"]
    pub fn field_name_map(mut self, map: Vec<(String, String)>) -> Self {
        self.field_name_map = map;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    /// Build the pipeline and start its dispatcher thread
    pub fn build(self) -> Pipeline {
        let metrics = Arc::new(PipelineMetrics::new());
        let (queue, records) = EventQueue::with_metrics(self.queue_capacity, Arc::clone(&metrics));
        let dispatcher = Dispatcher::spawn(
            records,
            self.sinks,
            JsonRenderer::new(self.field_name_map),
            Arc::clone(&metrics),
        );

        Pipeline {
            dispatcher,
            queue,
            metrics,
            min_severity: self.min_severity,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
