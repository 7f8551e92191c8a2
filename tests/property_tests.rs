//! Property-based tests for rendering, filtering, and queue behavior

use logpipe::prelude::*;
use proptest::prelude::*;

fn severity_strategy() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Debug),
        Just(Severity::Info),
        Just(Severity::Warning),
        Just(Severity::Error),
        Just(Severity::Critical),
    ]
}

proptest! {
    /// Any rendered record is a single line of valid JSON carrying the message
    #[test]
    fn prop_render_single_line_valid_json(
        // (?s) lets `.` produce newlines, which must come out escaped
        message in "(?s).{0,64}",
        severity in severity_strategy(),
    ) {
        let renderer = JsonRenderer::default();
        let record = Record::new(severity, message.clone());
        let line = renderer.render(&record);

        prop_assert!(!line.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        prop_assert_eq!(parsed["message"].as_str().unwrap(), message.as_str());
        prop_assert!(parsed["timestamp"].is_string());
    }

    /// A context key colliding with a canonical field yields exactly one key,
    /// holding the caller-supplied value
    #[test]
    fn prop_context_collision_caller_wins(
        canonical in ".*",
        caller_value in ".*",
    ) {
        let renderer = JsonRenderer::default();
        let record = Record::new(Severity::Info, canonical).with_context(
            RecordContext::new().with_field("message", caller_value.clone()),
        );
        let line = renderer.render(&record);

        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        prop_assert_eq!(parsed["message"].as_str().unwrap(), caller_value.as_str());
        // Re-serializing the parsed object keeps length stable only when no
        // key appeared twice in the original text
        let object = parsed.as_object().unwrap();
        prop_assert_eq!(
            serde_json::to_string(object).unwrap().len(),
            line.len()
        );
    }

    /// Context values of every primitive shape survive rendering
    #[test]
    fn prop_context_values_round_trip(
        key in "[a-z][a-z0-9_]{0,15}",
        int_value in any::<i64>(),
        flag in any::<bool>(),
    ) {
        // Avoid the canonical names; collisions are covered elsewhere
        prop_assume!(key != "message" && key != "timestamp");

        let renderer = JsonRenderer::default();
        let record = Record::new(Severity::Debug, "values").with_context(
            RecordContext::new()
                .with_field(format!("{}_int", key), int_value)
                .with_field(format!("{}_flag", key), flag),
        );
        let parsed: serde_json::Value =
            serde_json::from_str(&renderer.render(&record)).unwrap();

        prop_assert_eq!(parsed[format!("{}_int", key)].as_i64().unwrap(), int_value);
        prop_assert_eq!(parsed[format!("{}_flag", key)].as_bool().unwrap(), flag);
    }

    /// Threshold accepts exactly severity >= level; band exactly severity <= level
    #[test]
    fn prop_filter_semantics(
        severity in severity_strategy(),
        level in severity_strategy(),
    ) {
        prop_assert_eq!(
            SeverityFilter::Threshold(level).accepts(severity),
            severity >= level
        );
        prop_assert_eq!(
            SeverityFilter::Band(level).accepts(severity),
            severity <= level
        );
    }

    /// The queue keeps enqueue order for survivors and counts exact overflow
    #[test]
    fn prop_queue_fifo_and_overflow_count(
        messages in prop::collection::vec("[a-z]{1,8}", 0..40),
        capacity in 1usize..16,
    ) {
        let (queue, receiver) = EventQueue::new(capacity);
        for message in &messages {
            queue.enqueue(Record::new(Severity::Info, message.clone()));
        }

        let expected_kept = messages.len().min(capacity);
        let expected_dropped = (messages.len() - expected_kept) as u64;
        prop_assert_eq!(queue.len(), expected_kept);
        prop_assert_eq!(queue.overflow_count(), expected_dropped);

        for expected in messages.iter().take(expected_kept) {
            prop_assert_eq!(&receiver.try_recv().unwrap().message, expected);
        }
    }
}
