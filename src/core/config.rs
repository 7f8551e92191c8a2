//! Pipeline configuration object
//!
//! Consumed fully parsed: loading from disk is the host's concern. The types
//! derive `Deserialize` so an external loader only has to hand the result to
//! `Pipeline::from_config`. Validation happens once, at construction, so a
//! misconfigured pipeline fails fast instead of on the first log call.

use super::error::{PipelineError, Result};
use super::filter::SeverityFilter;
use super::queue::DEFAULT_QUEUE_CAPACITY;
use super::severity::Severity;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_BACKUP_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SinkKind {
    #[serde(rename = "console-stdout")]
    ConsoleStdout,
    #[serde(rename = "console-stderr")]
    ConsoleStderr,
    #[serde(rename = "rotating-file")]
    RotatingFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Accept severity >= level
    Threshold,
    /// Accept severity <= level
    Band,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub mode: FilterMode,
    pub level: Severity,
}

impl FilterConfig {
    pub fn to_filter(self) -> SeverityFilter {
        match self.mode {
            FilterMode::Threshold => SeverityFilter::Threshold(self.level),
            FilterMode::Band => SeverityFilter::Band(self.level),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    pub kind: SinkKind,
    pub filter: FilterConfig,
    /// Target path; required for rotating-file sinks
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub max_bytes: Option<u64>,
    #[serde(default)]
    pub backup_count: Option<usize>,
    /// Gzip rotated backups
    #[serde(default)]
    pub compress: bool,
}

impl SinkConfig {
    pub fn console_stdout(filter: FilterConfig) -> Self {
        Self {
            kind: SinkKind::ConsoleStdout,
            filter,
            path: None,
            max_bytes: None,
            backup_count: None,
            compress: false,
        }
    }

    pub fn console_stderr(filter: FilterConfig) -> Self {
        Self {
            kind: SinkKind::ConsoleStderr,
            filter,
            path: None,
            max_bytes: None,
            backup_count: None,
            compress: false,
        }
    }

    pub fn rotating_file(filter: FilterConfig, path: impl Into<PathBuf>) -> Self {
        Self {
            kind: SinkKind::RotatingFile,
            filter,
            path: Some(path.into()),
            max_bytes: None,
            backup_count: None,
            compress: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub sinks: Vec<SinkConfig>,

    /// output_key -> source_attribute pairs, applied in order during rendering
    #[serde(default)]
    pub field_name_map: Vec<(String, String)>,

    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Records below this severity are discarded at the facade
    #[serde(default)]
    pub min_severity: Severity,
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

impl PipelineConfig {
    pub fn new(sinks: Vec<SinkConfig>) -> Self {
        Self {
            sinks,
            field_name_map: Vec::new(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            min_severity: Severity::Debug,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(PipelineError::config(
                "queue",
                "capacity must be at least 1",
            ));
        }

        for (idx, sink) in self.sinks.iter().enumerate() {
            if sink.kind == SinkKind::RotatingFile && sink.path.is_none() {
                return Err(PipelineError::config(
                    format!("sinks[{}]", idx),
                    "rotating-file sink requires a path",
                ));
            }
            if sink.max_bytes == Some(0) {
                return Err(PipelineError::config(
                    format!("sinks[{}]", idx),
                    "max_bytes must be at least 1",
                ));
            }
            if sink.backup_count == Some(0) {
                return Err(PipelineError::config(
                    format!("sinks[{}]", idx),
                    "backup_count must be at least 1",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn threshold(level: Severity) -> FilterConfig {
        FilterConfig {
            mode: FilterMode::Threshold,
            level,
        }
    }

    #[test]
    fn test_filter_config_conversion() {
        let filter = FilterConfig {
            mode: FilterMode::Band,
            level: Severity::Info,
        }
        .to_filter();
        assert_eq!(filter, SeverityFilter::Band(Severity::Info));

        let filter = threshold(Severity::Warning).to_filter();
        assert_eq!(filter, SeverityFilter::Threshold(Severity::Warning));
    }

    #[test]
    fn test_validate_rejects_rotating_file_without_path() {
        let mut sink = SinkConfig::console_stdout(threshold(Severity::Debug));
        sink.kind = SinkKind::RotatingFile;
        let config = PipelineConfig::new(vec![sink]);

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("requires a path"));
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut config =
            PipelineConfig::new(vec![SinkConfig::console_stdout(threshold(Severity::Debug))]);
        config.queue_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_backup_count() {
        let mut sink =
            SinkConfig::rotating_file(threshold(Severity::Debug), "/tmp/app.log");
        sink.backup_count = Some(0);
        let config = PipelineConfig::new(vec![sink]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_from_json() {
        let raw = r#"{
            "sinks": [
                {"kind": "console-stdout", "filter": {"mode": "band", "level": "info"}},
                {"kind": "console-stderr", "filter": {"mode": "threshold", "level": "warning"}},
                {"kind": "rotating-file", "filter": {"mode": "threshold", "level": "debug"},
                 "path": "logs/app.log.jsonl", "max_bytes": 1048576, "backup_count": 3}
            ],
            "field_name_map": [["level", "severity"], ["msg", "message"]],
            "queue_capacity": 512
        }"#;

        let config: PipelineConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.sinks.len(), 3);
        assert_eq!(config.sinks[0].kind, SinkKind::ConsoleStdout);
        assert_eq!(config.sinks[2].max_bytes, Some(1048576));
        assert_eq!(config.queue_capacity, 512);
        assert_eq!(config.min_severity, Severity::Debug);
        assert_eq!(config.field_name_map[1].0, "msg");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_applied() {
        let raw = r#"{"sinks": []}"#;
        let config: PipelineConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.queue_capacity, DEFAULT_QUEUE_CAPACITY);
        assert!(config.field_name_map.is_empty());
    }
}
