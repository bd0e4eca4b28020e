//! Analytics events and the fire-and-forget sink they go to.
//!
//! The engine never lets the sink fail a UI update: availability is checked
//! before every call and sink errors are logged and dropped.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::SinkError;
use crate::inputs::ErrorReport;
use crate::locale::Language;

pub const ENGAGEMENT: &str = "engagement";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventParams {
    Engagement {
        event_category: String,
        event_label: String,
    },
    Exception {
        description: String,
        fatal: bool,
    },
}

/// One `gtag('event', name, params)` call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub name: String,
    pub params: EventParams,
}

impl AnalyticsEvent {
    pub fn engagement(name: &str, label: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            params: EventParams::Engagement {
                event_category: ENGAGEMENT.to_string(),
                event_label: label.into(),
            },
        }
    }

    pub fn language_switch(lang: Language) -> Self {
        Self::engagement("language_switch", lang.display_name())
    }

    pub fn cta_click(label: &str) -> Self {
        Self::engagement("cta_click", label.trim())
    }

    pub fn scroll_depth(mark: u32) -> Self {
        Self::engagement("scroll_depth", format!("{mark}%"))
    }

    /// Label is the trimmed question cut to `max_chars` characters.
    pub fn faq_interaction(question: &str, max_chars: usize) -> Self {
        let label: String = question.trim().chars().take(max_chars).collect();
        Self::engagement("faq_interaction", label)
    }

    /// Non-fatal `exception` event for an uncaught error or rejection.
    pub fn exception(report: &ErrorReport) -> Self {
        let description = match report {
            ErrorReport::Script {
                message,
                source,
                line,
                column,
            } => format!("{message} at {source}:{line}:{column}"),
            ErrorReport::Rejection { reason } => format!("Unhandled Promise: {reason}"),
        };
        Self {
            name: "exception".to_string(),
            params: EventParams::Exception {
                description,
                fatal: false,
            },
        }
    }

    pub fn label(&self) -> Option<&str> {
        match &self.params {
            EventParams::Engagement { event_label, .. } => Some(event_label),
            EventParams::Exception { .. } => None,
        }
    }
}

pub trait AnalyticsSink {
    /// Cheap presence check, e.g. "is `gtag` defined".
    fn is_available(&self) -> bool;
    fn record(&mut self, event: &AnalyticsEvent) -> Result<(), SinkError>;
}

/// Sink used when the host has no analytics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AnalyticsSink for NullSink {
    fn is_available(&self) -> bool {
        false
    }

    fn record(&mut self, _event: &AnalyticsEvent) -> Result<(), SinkError> {
        Err(SinkError::Unavailable)
    }
}

/// In-memory sink; clones share the same buffer so a test (or a diagnostics
/// panel) can keep a handle after boxing one into the engine.
#[derive(Debug, Clone)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<AnalyticsEvent>>>,
    available: Rc<RefCell<bool>>,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            events: Rc::new(RefCell::new(Vec::new())),
            available: Rc::new(RefCell::new(true)),
        }
    }

    pub fn set_available(&self, available: bool) {
        *self.available.borrow_mut() = available;
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.borrow().clone()
    }

    pub fn named(&self, name: &str) -> Vec<AnalyticsEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.name == name)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl AnalyticsSink for RecordingSink {
    fn is_available(&self) -> bool {
        *self.available.borrow()
    }

    fn record(&mut self, event: &AnalyticsEvent) -> Result<(), SinkError> {
        self.events.borrow_mut().push(event.clone());
        Ok(())
    }
}

/// Best-effort front for a sink.
pub struct Reporter {
    sink: Box<dyn AnalyticsSink>,
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("available", &self.sink.is_available())
            .finish()
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(Box::new(NullSink))
    }
}

impl Reporter {
    pub fn new(sink: Box<dyn AnalyticsSink>) -> Self {
        Self { sink }
    }

    pub fn record(&mut self, event: AnalyticsEvent) {
        if !self.sink.is_available() {
            log::debug!("analytics unavailable, dropping '{}'", event.name);
            return;
        }
        if let Err(e) = self.sink.record(&event) {
            log::warn!("analytics sink error: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSink;

    impl AnalyticsSink for FailingSink {
        fn is_available(&self) -> bool {
            true
        }
        fn record(&mut self, event: &AnalyticsEvent) -> Result<(), SinkError> {
            Err(SinkError::Rejected {
                event: event.name.clone(),
                reason: "quota".into(),
            })
        }
    }

    #[test]
    fn reporter_skips_unavailable_sink() {
        let sink = RecordingSink::new();
        sink.set_available(false);
        let mut reporter = Reporter::new(Box::new(sink.clone()));
        reporter.record(AnalyticsEvent::scroll_depth(25));
        assert!(sink.events().is_empty());

        sink.set_available(true);
        reporter.record(AnalyticsEvent::scroll_depth(50));
        assert_eq!(sink.events(), vec![AnalyticsEvent::scroll_depth(50)]);
    }

    #[test]
    fn reporter_swallows_sink_errors() {
        let mut reporter = Reporter::new(Box::new(FailingSink));
        reporter.record(AnalyticsEvent::cta_click("Contact"));
        let mut null = Reporter::default();
        null.record(AnalyticsEvent::cta_click("Contact"));
    }

    #[test]
    fn gtag_param_shapes() {
        let ev = AnalyticsEvent::faq_interaction("  How long does onboarding take?  ", 8);
        assert_eq!(ev.label(), Some("How long"));
        assert_eq!(
            serde_json::to_value(&ev.params).unwrap(),
            serde_json::json!({ "event_category": "engagement", "event_label": "How long" })
        );

        let ex = AnalyticsEvent::exception(&ErrorReport::Script {
            message: "boom".into(),
            source: "main.js".into(),
            line: 3,
            column: 14,
        });
        assert_eq!(
            serde_json::to_value(&ex.params).unwrap(),
            serde_json::json!({ "description": "boom at main.js:3:14", "fatal": false })
        );

        let rej = AnalyticsEvent::exception(&ErrorReport::Rejection {
            reason: "timeout".into(),
        });
        assert_eq!(rej.label(), None);
        assert!(matches!(
            rej.params,
            EventParams::Exception { ref description, fatal: false } if description == "Unhandled Promise: timeout"
        ));
    }

    #[test]
    fn faq_label_counts_characters_not_bytes() {
        let ev = AnalyticsEvent::faq_interaction("כמה זמן לוקח", 3);
        assert_eq!(ev.label(), Some("כמה"));
    }
}
