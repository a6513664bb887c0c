use std::sync::Mutex;

use serde::Serialize;
use serde_json::Value;

pub const BRAND_CHANGED_EVENT: &str = "brand_changed";
pub const PRESETS_UPDATED_EVENT: &str = "presets_updated";

pub trait EventSink: Send + Sync {
    fn emit(&self, event: &str, payload: Value);
}

/// Writes events to the log instead of delivering them
pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn emit(&self, event: &str, payload: Value) {
        log::debug!("[{event}] {payload}");
    }
}

/// Keeps every emitted event, for hosts that poll and for tests
#[derive(Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<(String, Value)>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<(String, Value)> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: &str, payload: Value) {
        if let Ok(mut events) = self.events.lock() {
            events.push((event.to_string(), payload));
        }
    }
}

pub fn emit_event<T: Serialize>(sink: &dyn EventSink, event: &str, payload: &T) {
    if let Ok(value) = serde_json::to_value(payload) {
        sink.emit(event, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recording_sink_drains_events() {
        let sink = RecordingEventSink::new();
        emit_event(&sink, BRAND_CHANGED_EVENT, &json!({ "brand": "hm" }));

        let events = sink.take();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, BRAND_CHANGED_EVENT);
        assert_eq!(events[0].1["brand"], "hm");
        assert!(sink.take().is_empty());
    }
}
