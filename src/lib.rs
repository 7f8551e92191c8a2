//! # Logpipe
//!
//! An asynchronous structured logging pipeline: callers emit leveled log
//! events carrying a message, severity, timestamp, and arbitrary key/value
//! context; the pipeline renders each event to a canonical single-line JSON
//! record and delivers it to one or more sinks without blocking the caller.
//!
//! ## Features
//!
//! - **Non-blocking producers**: bounded queue with drop-and-count overflow
//! - **Single dispatcher**: one background thread owns rendering and all sinks
//! - **Canonical JSON**: stable field precedence and collision rules
//! - **Severity routing**: threshold and band filters per sink
//! - **Guaranteed flush**: shutdown drains the queue before returning

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        Dispatcher, DispatcherState, ErrorInfo, EventQueue, FieldValue, FilterConfig, FilterMode,
        JsonRenderer, Pipeline, PipelineBuilder, PipelineConfig, PipelineError, PipelineMetrics,
        Record, RecordContext, Result, Severity, SeverityFilter, SinkConfig, SinkKind,
        DEFAULT_QUEUE_CAPACITY,
    };
    pub use crate::sinks::{ConsoleSink, RotatingFileSink, Sink};
}

pub use crate::core::{
    Dispatcher, DispatcherState, ErrorInfo, EventQueue, FieldValue, FilterConfig, FilterMode,
    JsonRenderer, Pipeline, PipelineBuilder, PipelineConfig, PipelineError, PipelineMetrics,
    Record, RecordContext, Result, Severity, SeverityFilter, SinkConfig, SinkKind,
    DEFAULT_QUEUE_CAPACITY,
};
pub use crate::sinks::{ConsoleSink, RotatingFileSink, Sink};
