//! Core pipeline types: records, rendering, queueing, and dispatch

pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod pipeline;
pub mod queue;
pub mod record;
pub mod renderer;
pub mod severity;

pub use config::{FilterConfig, FilterMode, PipelineConfig, SinkConfig, SinkKind};
pub use context::{FieldValue, RecordContext};
pub use dispatcher::{Dispatcher, DispatcherState};
pub use error::{PipelineError, Result};
pub use filter::SeverityFilter;
pub use metrics::PipelineMetrics;
pub use pipeline::{Pipeline, PipelineBuilder};
pub use queue::{EventQueue, DEFAULT_QUEUE_CAPACITY};
pub use record::{ErrorInfo, Record};
pub use renderer::JsonRenderer;
pub use severity::Severity;
