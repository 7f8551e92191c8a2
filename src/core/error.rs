//! Error types for the logging pipeline
//!
//! Render failures never appear here: the renderer degrades unserializable
//! values to their string form instead of failing, and queue overflow is a
//! counter rather than an error, so neither can propagate to producer threads.

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Invalid configuration, surfaced at pipeline construction
    #[error("Invalid configuration for {component}: {message}")]
    Config { component: String, message: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A single sink failed to write; isolated per sink by the dispatcher
    #[error("Sink '{sink}' write failed: {message}")]
    SinkWrite { sink: String, message: String },

    /// File rotation failure
    #[error("Rotation failed for '{path}': {message}")]
    Rotation { path: String, message: String },
}

impl PipelineError {
    /// Create a configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        PipelineError::Config {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a sink write error
    pub fn sink_write(sink: impl Into<String>, message: impl Into<String>) -> Self {
        PipelineError::SinkWrite {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create a rotation error
    pub fn rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        PipelineError::Rotation {
            path: path.into(),
            message: message.into(),
        }
    }
}
