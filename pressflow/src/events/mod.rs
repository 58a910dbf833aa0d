//! Event sink system for operator-facing messages.
//!
//! Every unit of work in a run (each title, each article, each batch start,
//! each publish) emits an event carrying a human-readable `message`. The
//! operator surface decides how to show them.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink, RunEvent};

/// Builds event data carrying a `message` plus extra fields.
///
/// `extra` must be a JSON object; other values are ignored.
#[must_use]
pub fn message_data(message: impl Into<String>, extra: serde_json::Value) -> serde_json::Value {
    let mut data = serde_json::Map::new();
    data.insert("message".to_string(), serde_json::Value::String(message.into()));
    if let serde_json::Value::Object(fields) = extra {
        data.extend(fields);
    }
    serde_json::Value::Object(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_data_merges_fields() {
        let data = message_data("Article 1 published successfully!", serde_json::json!({"index": 0}));
        assert_eq!(
            data,
            serde_json::json!({"message": "Article 1 published successfully!", "index": 0})
        );
    }

    #[test]
    fn test_message_data_ignores_non_object_extra() {
        let data = message_data("hello", serde_json::Value::Null);
        assert_eq!(data, serde_json::json!({"message": "hello"}));
    }
}
