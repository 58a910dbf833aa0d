//! Event sinks for operator-facing run messages.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn, Level};

/// Receives the events of a run.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Records one event.
    ///
    /// * `event_type` - dotted name such as `publish.article_succeeded`
    /// * `data` - a JSON object, normally carrying a `message`
    ///
    /// Sinks must not fail; a sink that cannot deliver drops the event.
    async fn emit(&self, event_type: &str, data: Option<Value>);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event_type: &str, _data: Option<Value>) {}
}

/// Writes events to `tracing`, using the `message` field as the log line.
///
/// Failure events (`auth.failed`, `publish.article_failed`, ...) always go to
/// WARN; everything else goes to the configured level.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Creates a sink logging at `level`. Only INFO and DEBUG are distinguished.
    #[must_use]
    pub const fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level sink.
    #[must_use]
    pub const fn debug() -> Self {
        Self::new(Level::DEBUG)
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn emit(&self, event_type: &str, data: Option<Value>) {
        let message = message_of(data.as_ref()).unwrap_or(event_type);

        if event_type.ends_with("failed") {
            warn!(event_type, "{message}");
        } else if self.level == Level::DEBUG {
            debug!(event_type, "{message}");
        } else {
            info!(event_type, "{message}");
        }
    }
}

/// One event captured by [`CollectingEventSink`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunEvent {
    /// Dotted event name.
    pub event_type: String,
    /// Event payload.
    pub data: Option<Value>,
}

impl RunEvent {
    /// The `message` field of the payload, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        message_of(self.data.as_ref())
    }
}

/// Keeps every event in memory, in emission order.
///
/// Used by tests and by surfaces that render a whole run at the end.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: RwLock<Vec<RunEvent>>,
}

impl CollectingEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All events so far.
    #[must_use]
    pub fn events(&self) -> Vec<RunEvent> {
        self.events.read().clone()
    }

    /// Number of events so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// True if nothing was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Events whose type starts with `prefix`.
    #[must_use]
    pub fn events_of_type(&self, prefix: &str) -> Vec<RunEvent> {
        self.events
            .read()
            .iter()
            .filter(|event| event.event_type.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// The `message` of every event that has one, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.events
            .read()
            .iter()
            .filter_map(|event| event.message().map(ToString::to_string))
            .collect()
    }
}

#[async_trait]
impl EventSink for CollectingEventSink {
    async fn emit(&self, event_type: &str, data: Option<Value>) {
        self.events.write().push(RunEvent {
            event_type: event_type.to_string(),
            data,
        });
    }
}

fn message_of(data: Option<&Value>) -> Option<&str> {
    data?.get("message")?.as_str()
}
