//! Canonical JSON rendering
//!
//! `JsonRenderer` is a pure function from a `Record` to a single-line JSON
//! object. No I/O, no shared state; newline framing is applied at the
//! sink-write boundary, not here.
//!
//! Field precedence:
//! 1. Mapped fields, in field-name-map order. A source name matching an
//!    always-present field (`message`, `timestamp`, `error_info`,
//!    `stack_info`) consumes it; otherwise the record built-in of that name
//!    is used, and unknown names render as JSON null.
//! 2. Always-present fields not consumed by the map.
//! 3. Context fields, verbatim. A context key colliding with any field placed
//!    above replaces it: the caller-supplied value wins and the output never
//!    contains a duplicate key.

use super::record::{ErrorInfo, Record};
use chrono::SecondsFormat;
use serde_json::{Map, Value};

/// Source attribute names that resolve to always-present derived fields
const ALWAYS_MESSAGE: &str = "message";
const ALWAYS_TIMESTAMP: &str = "timestamp";
const ALWAYS_ERROR_INFO: &str = "error_info";
const ALWAYS_STACK_INFO: &str = "stack_info";

#[derive(Debug, Clone, Default)]
pub struct JsonRenderer {
    /// output_key -> source_attribute pairs, applied in order
    field_map: Vec<(String, String)>,
}

impl JsonRenderer {
    pub fn new(field_map: Vec<(String, String)>) -> Self {
        Self { field_map }
    }

    pub fn field_map(&self) -> &[(String, String)] {
        &self.field_map
    }

    /// Render a record to a single-line JSON object (no trailing newline)
    pub fn render(&self, record: &Record) -> String {
        // Always-present derived fields, with consumption tracked per slot
        let mut always: Vec<(&'static str, Option<Value>)> = vec![
            (ALWAYS_MESSAGE, Some(Value::String(record.message.clone()))),
            (
                ALWAYS_TIMESTAMP,
                Some(Value::String(
                    record
                        .timestamp
                        .to_rfc3339_opts(SecondsFormat::Micros, false),
                )),
            ),
        ];
        if let Some(ref info) = record.error_info {
            always.push((ALWAYS_ERROR_INFO, Some(error_info_value(info))));
        }
        if let Some(ref stack) = record.stack_info {
            always.push((ALWAYS_STACK_INFO, Some(Value::String(stack.clone()))));
        }

        let mut out = Map::new();

        // (a) mapped fields, consuming always-present slots when they match
        for (output_key, source) in &self.field_map {
            let value = take_always(&mut always, source)
                .unwrap_or_else(|| builtin_value(record, source));
            out.insert(output_key.clone(), value);
        }

        // (b) unconsumed always-present fields
        for (name, slot) in always {
            if let Some(value) = slot {
                out.insert(name.to_string(), value);
            }
        }

        // (c) context fields; insert replaces, so the caller value wins on
        // collision with a canonical field and no key appears twice
        for (key, value) in record.context.iter() {
            out.insert(key.to_string(), value.to_json_value());
        }

        Value::Object(out).to_string()
    }
}

/// Consume an always-present field by source name, if present and unconsumed
fn take_always(always: &mut [(&'static str, Option<Value>)], source: &str) -> Option<Value> {
    always
        .iter_mut()
        .find(|(name, slot)| *name == source && slot.is_some())
        .and_then(|(_, slot)| slot.take())
}

/// Resolve a record built-in attribute by source name
///
/// Unknown names render as null rather than failing: a misconfigured field
/// map must not crash the dispatcher.
fn builtin_value(record: &Record, source: &str) -> Value {
    match source {
        "severity" | "level" => Value::String(record.severity.to_str().to_string()),
        "thread" => Value::String(record.thread.clone()),
        "module" => record
            .module
            .as_ref()
            .map(|m| Value::String(m.clone()))
            .unwrap_or(Value::Null),
        "line" => record
            .line
            .map(|l| Value::Number(l.into()))
            .unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

fn error_info_value(info: &ErrorInfo) -> Value {
    let mut obj = Map::new();
    obj.insert("type".to_string(), Value::String(info.kind.clone()));
    obj.insert("message".to_string(), Value::String(info.message.clone()));
    if let Some(ref trace) = info.trace {
        obj.insert("trace".to_string(), Value::String(trace.clone()));
    }
    Value::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::RecordContext;
    use crate::core::severity::Severity;

    fn parse(line: &str) -> serde_json::Value {
        serde_json::from_str(line).expect("rendered output must be valid JSON")
    }

    #[test]
    fn test_render_default_fields() {
        let renderer = JsonRenderer::default();
        let record = Record::new(Severity::Info, "hello world");
        let line = renderer.render(&record);

        let parsed = parse(&line);
        assert_eq!(parsed["message"], "hello world");
        assert!(parsed["timestamp"].is_string());
        // ISO-8601 with explicit UTC offset
        assert!(parsed["timestamp"].as_str().unwrap().ends_with("+00:00"));
    }

    #[test]
    fn test_render_is_single_line() {
        let renderer = JsonRenderer::default();
        let record = Record::new(Severity::Info, "line one\nline two");
        let line = renderer.render(&record);
        assert!(!line.contains('\n'));
        assert_eq!(parse(&line)["message"], "line one\nline two");
    }

    #[test]
    fn test_field_map_renames_and_consumes() {
        let renderer = JsonRenderer::new(vec![
            ("msg".to_string(), "message".to_string()),
            ("level".to_string(), "severity".to_string()),
        ]);
        let record = Record::new(Severity::Warning, "renamed");
        let line = renderer.render(&record);

        let parsed = parse(&line);
        assert_eq!(parsed["msg"], "renamed");
        assert_eq!(parsed["level"], "WARNING");
        // consumed by the map: no leftover "message" key
        assert!(parsed.get("message").is_none());
        // timestamp was not mapped, so it is appended unchanged
        assert!(parsed["timestamp"].is_string());
    }

    #[test]
    fn test_field_map_key_order() {
        let renderer = JsonRenderer::new(vec![
            ("level".to_string(), "severity".to_string()),
            ("msg".to_string(), "message".to_string()),
        ]);
        let record = Record::new(Severity::Info, "ordered").with_context(
            RecordContext::new().with_field("extra", 1),
        );
        let line = renderer.render(&record);

        // mapped fields first, then unmapped always-present, then context
        let keys: Vec<String> = parse(&line)
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["level", "msg", "timestamp", "extra"]);
    }

    #[test]
    fn test_unknown_source_renders_null() {
        let renderer = JsonRenderer::new(vec![("task".to_string(), "task_name".to_string())]);
        let record = Record::new(Severity::Info, "x");
        let parsed = parse(&renderer.render(&record));
        assert!(parsed["task"].is_null());
    }

    #[test]
    fn test_context_key_collision_caller_wins() {
        let renderer = JsonRenderer::default();
        let record = Record::new(Severity::Info, "canonical").with_context(
            RecordContext::new().with_field("message", "caller value"),
        );
        let line = renderer.render(&record);

        // exactly one "message" key, holding the caller-supplied value
        assert_eq!(line.matches("\"message\"").count(), 1);
        assert_eq!(parse(&line)["message"], "caller value");
    }

    #[test]
    fn test_error_and_stack_info_rendered() {
        let renderer = JsonRenderer::default();
        let record = Record::new(Severity::Error, "failed")
            .with_error_info(ErrorInfo::new("io::Error", "disk full").with_trace("frame 0"))
            .with_stack_info("stack snippet");
        let parsed = parse(&renderer.render(&record));

        assert_eq!(parsed["error_info"]["type"], "io::Error");
        assert_eq!(parsed["error_info"]["message"], "disk full");
        assert_eq!(parsed["error_info"]["trace"], "frame 0");
        assert_eq!(parsed["stack_info"], "stack snippet");
    }

    #[test]
    fn test_error_info_is_remappable() {
        let renderer = JsonRenderer::new(vec![("exc".to_string(), "error_info".to_string())]);
        let record = Record::new(Severity::Error, "failed")
            .with_error_info(ErrorInfo::new("ValueError", "bad input"));
        let parsed = parse(&renderer.render(&record));

        assert_eq!(parsed["exc"]["type"], "ValueError");
        assert!(parsed.get("error_info").is_none());
    }

    #[test]
    fn test_builtin_thread_and_location() {
        let renderer = JsonRenderer::new(vec![
            ("thread".to_string(), "thread".to_string()),
            ("module".to_string(), "module".to_string()),
            ("line".to_string(), "line".to_string()),
        ]);
        let record = Record::new(Severity::Debug, "x").with_location("app::api", 7);
        let parsed = parse(&renderer.render(&record));

        assert!(parsed["thread"].is_string());
        assert_eq!(parsed["module"], "app::api");
        assert_eq!(parsed["line"], 7);
    }
}
