//! Log record structure

use super::context::RecordContext;
use super::severity::Severity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

// Thread-local cache for the producing thread's label, computed once per thread
thread_local! {
    static THREAD_LABEL_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Get the cached thread label: the thread name when set, its id otherwise
fn get_thread_label() -> String {
    THREAD_LABEL_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if cache.is_none() {
            let current = std::thread::current();
            let label = current
                .name()
                .map(String::from)
                .unwrap_or_else(|| format!("{:?}", current.id()));
            *cache = Some(label);
        }
        cache
            .as_ref()
            .expect("thread label cache initialized in previous line")
            .clone()
    })
}

/// Structured exception payload attached to a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error type name, e.g. `io::Error`
    pub kind: String,
    pub message: String,
    /// Formatted backtrace or cause chain, if captured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl ErrorInfo {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            trace: None,
        }
    }

    #[must_use]
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    /// Capture kind and message from any std error
    pub fn from_error<E: std::error::Error>(error: &E) -> Self {
        Self {
            kind: std::any::type_name::<E>().to_string(),
            message: error.to_string(),
            trace: None,
        }
    }
}

/// One structured log event
///
/// Constructed once per log call and never mutated afterwards; the timestamp
/// is captured at construction (enqueue) time, not at render time, so ordering
/// and wall-clock accuracy reflect when the event occurred.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub thread: String,
    pub module: Option<String>,
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "RecordContext::is_empty")]
    pub context: RecordContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_info: Option<ErrorInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_info: Option<String>,
}

impl Record {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            timestamp: Utc::now(),
            thread: get_thread_label(),
            module: None,
            line: None,
            context: RecordContext::new(),
            error_info: None,
            stack_info: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: RecordContext) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn with_location(mut self, module: &str, line: u32) -> Self {
        self.module = Some(module.to_string());
        self.line = Some(line);
        self
    }

    #[must_use]
    pub fn with_error_info(mut self, error_info: ErrorInfo) -> Self {
        self.error_info = Some(error_info);
        self
    }

    #[must_use]
    pub fn with_stack_info(mut self, stack_info: impl Into<String>) -> Self {
        self.stack_info = Some(stack_info.into());
        self
    }
}
