//! Rendering events and the bounded event log.

use std::collections::VecDeque;

use serde::Serialize;

use crate::error::now_ms;

/// Kind of an externally visible transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    InitializationStarted,
    InitializationCompleted,
    InitializationFailed,
    PageChanged,
    PageRendered,
    PageRenderFailed,
    CacheCleared,
    WebsiteReset,
}

/// Event emitted by the website orchestrator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderingEvent {
    pub kind: EventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
}

impl RenderingEvent {
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            page_id: None,
            message: None,
            timestamp_ms: now_ms(),
        }
    }

    #[must_use]
    pub fn with_page(mut self, page_id: impl Into<String>) -> Self {
        self.page_id = Some(page_id.into());
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Ring buffer holding the most recent events.
#[derive(Debug)]
pub(crate) struct EventLog {
    capacity: usize,
    events: VecDeque<RenderingEvent>,
}

impl EventLog {
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            events: VecDeque::with_capacity(capacity),
        }
    }

    /// Append an event, dropping the oldest one when full.
    pub(crate) fn push(&mut self, event: RenderingEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Events oldest first.
    pub(crate) fn snapshot(&self) -> Vec<RenderingEvent> {
        self.events.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_keeps_most_recent() {
        let mut log = EventLog::new(3);
        for i in 0..5 {
            log.push(RenderingEvent::new(EventKind::PageChanged).with_page(format!("p{i}")));
        }
        let pages: Vec<_> = log
            .snapshot()
            .into_iter()
            .filter_map(|event| event.page_id)
            .collect();
        assert_eq!(pages, vec!["p2", "p3", "p4"]);
    }

    #[test]
    fn test_event_kind_wire_names() {
        let json = serde_json::to_value(RenderingEvent::new(EventKind::InitializationCompleted)).unwrap();
        assert_eq!(json["kind"], "initialization-completed");
        assert!(json.get("pageId").is_none());
    }
}
