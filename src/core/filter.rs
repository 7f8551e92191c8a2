//! Per-sink severity filters
//!
//! Each sink is configured with exactly one filter; filters are evaluated
//! independently per sink per record, so a record may be written to zero, one,
//! or many sinks.

use super::severity::Severity;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityFilter {
    /// Accept records at or above the level ("warnings and above")
    Threshold(Severity),

    /// Accept records at or below the level ("informational chatter only",
    /// typically routed to stdout while errors go to stderr)
    Band(Severity),
}

impl SeverityFilter {
    pub fn accepts(&self, severity: Severity) -> bool {
        match self {
            SeverityFilter::Threshold(level) => severity >= *level,
            SeverityFilter::Band(level) => severity <= *level,
        }
    }
}

impl fmt::Display for SeverityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeverityFilter::Threshold(level) => write!(f, ">={}", level),
            SeverityFilter::Band(level) => write!(f, "<={}", level),
        }
    }
}
