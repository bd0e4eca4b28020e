//! Input contracts for the core engine.
//!
//! Hosts translate browser events into `UiEvent`s and pass them to
//! `Engine::dispatch` together with a timestamp.

use serde::{Deserialize, Serialize};

use crate::ids::{ElementId, WatcherId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Enter,
    Space,
    Escape,
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Key {
        match key {
            "Enter" => Key::Enter,
            " " => Key::Space,
            "Escape" => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }

    pub fn activates(&self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }
}

/// One intersection observer entry for an observed node.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntersectionEntry {
    pub element: ElementId,
    pub is_intersecting: bool,
    /// Visible fraction of the node, `intersectionRatio`.
    pub ratio: f64,
}

impl IntersectionEntry {
    pub fn entering(element: ElementId, ratio: f64) -> Self {
        Self {
            element,
            is_intersecting: true,
            ratio,
        }
    }

    pub fn leaving(element: ElementId) -> Self {
        Self {
            element,
            is_intersecting: false,
            ratio: 0.0,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    pub scroll_y: f64,
    /// `document.body.scrollHeight`
    pub scroll_height: f64,
    /// `window.innerHeight`
    pub viewport_height: f64,
}

impl ScrollMetrics {
    pub fn at(scroll_y: f64, scroll_height: f64, viewport_height: f64) -> Self {
        Self {
            scroll_y,
            scroll_height,
            viewport_height,
        }
    }
}

/// Uncaught failures the host forwards for reporting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorReport {
    Script {
        message: String,
        source: String,
        line: u32,
        column: u32,
    },
    Rejection {
        reason: String,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// A click reached a listener registered on `element`. Bubbling clicks
    /// are delivered once per registered ancestor, innermost first.
    Click { element: ElementId },
    /// `element` is the registered node that was focused, if any.
    KeyDown {
        key: Key,
        element: Option<ElementId>,
    },
    Resize { width: f64 },
    Scroll { metrics: ScrollMetrics },
    Intersections {
        watcher: WatcherId,
        entries: Vec<IntersectionEntry>,
    },
    ToggleLanguage,
    Error { report: ErrorReport },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_keys() {
        assert_eq!(Key::from_dom("Enter"), Key::Enter);
        assert_eq!(Key::from_dom(" "), Key::Space);
        assert_eq!(Key::from_dom("Escape"), Key::Escape);
        assert_eq!(Key::from_dom("a"), Key::Other("a".into()));
        assert!(Key::Space.activates());
        assert!(!Key::Escape.activates());
    }

    #[test]
    fn events_deserialize_from_host_json() {
        let ev: UiEvent = serde_json::from_str(
            r#"{ "type": "intersections", "watcher": "stats",
                 "entries": [ { "element": 4, "is_intersecting": true, "ratio": 0.5 } ] }"#,
        )
        .unwrap();
        assert_eq!(
            ev,
            UiEvent::Intersections {
                watcher: WatcherId::Stats,
                entries: vec![IntersectionEntry::entering(ElementId(4), 0.5)],
            }
        );
    }
}
