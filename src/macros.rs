//! Logging macros for ergonomic message formatting
//!
//! Format arguments are resolved at the call site, before the record is
//! enqueued, so the dispatcher never sees deferred templates.
//!
//! # Examples
//!
//! ```
//! use logpipe::prelude::*;
//! use logpipe::info;
//!
//! let pipeline = Pipeline::builder().build();
//!
//! info!(pipeline, "server started");
//!
//! let port = 8080;
//! info!(pipeline, "listening on port {}", port);
//! # pipeline.shutdown();
//! ```

/// Log a message at an explicit severity with automatic formatting.
///
/// ```
/// # use logpipe::prelude::*;
/// # let pipeline = Pipeline::builder().build();
/// use logpipe::log;
/// log!(pipeline, Severity::Info, "simple message");
/// log!(pipeline, Severity::Error, "error code: {}", 500);
/// # pipeline.shutdown();
/// ```
#[macro_export]
macro_rules! log {
    ($pipeline:expr, $severity:expr, $($arg:tt)+) => {
        $pipeline.log($severity, format!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($pipeline:expr, $($arg:tt)+) => {
        $crate::log!($pipeline, $crate::Severity::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($pipeline:expr, $($arg:tt)+) => {
        $crate::log!($pipeline, $crate::Severity::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($pipeline:expr, $($arg:tt)+) => {
        $crate::log!($pipeline, $crate::Severity::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($pipeline:expr, $($arg:tt)+) => {
        $crate::log!($pipeline, $crate::Severity::Error, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($pipeline:expr, $($arg:tt)+) => {
        $crate::log!($pipeline, $crate::Severity::Critical, $($arg)+)
    };
}
