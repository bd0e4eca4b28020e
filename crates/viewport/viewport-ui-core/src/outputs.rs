//! Output contracts from the core engine.
//!
//! Outputs carry DOM patches and host commands produced by a single engine call.
//! Patches are ordered; a host applies all of them before yielding back to the
//! event loop so the page never shows a half-applied update.

use serde::{Deserialize, Serialize};

use crate::ids::{ElementId, WatcherId};

/// Node a patch applies to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Target {
    /// The root `<html>` element.
    Document,
    Body,
    Element(ElementId),
}

impl From<ElementId> for Target {
    fn from(id: ElementId) -> Self {
        Target::Element(id)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DomPatch {
    SetText {
        target: Target,
        text: String,
    },
    SetHtml {
        target: Target,
        html: String,
    },
    SetPlaceholder {
        target: Target,
        text: String,
    },
    SetAttribute {
        target: Target,
        name: String,
        value: String,
    },
    AddClass {
        target: Target,
        class: String,
    },
    RemoveClass {
        target: Target,
        class: String,
    },
    SetStyle {
        target: Target,
        property: String,
        value: String,
    },
}

impl DomPatch {
    pub fn target(&self) -> Target {
        match self {
            DomPatch::SetText { target, .. }
            | DomPatch::SetHtml { target, .. }
            | DomPatch::SetPlaceholder { target, .. }
            | DomPatch::SetAttribute { target, .. }
            | DomPatch::AddClass { target, .. }
            | DomPatch::RemoveClass { target, .. }
            | DomPatch::SetStyle { target, .. } => *target,
        }
    }
}

/// Side effects only the host can perform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum HostCommand {
    Observe {
        watcher: WatcherId,
        element: ElementId,
    },
    Unobserve {
        watcher: WatcherId,
        element: ElementId,
    },
    Disconnect {
        watcher: WatcherId,
    },
    /// Smooth scroll so `element` starts at the top of the viewport.
    ScrollIntoView {
        element: ElementId,
    },
    /// Smooth scroll to the document origin.
    ScrollToTop,
}

/// Outputs returned by every engine entry point.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub patches: Vec<DomPatch>,
    #[serde(default)]
    pub commands: Vec<HostCommand>,
    /// The triggering DOM event should have its default action cancelled.
    #[serde(default)]
    pub default_prevented: bool,
    /// Work is pending for the next animation frame; the host should call
    /// `Engine::advance` from `requestAnimationFrame`.
    #[serde(default)]
    pub wants_frame: bool,
    /// Earliest pending timer deadline (same clock as the `now` passed in).
    #[serde(default)]
    pub next_deadline: Option<f64>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.patches.clear();
        self.commands.clear();
        self.default_prevented = false;
        self.wants_frame = false;
        self.next_deadline = None;
    }

    #[inline]
    pub fn push_patch(&mut self, patch: DomPatch) {
        self.patches.push(patch);
    }

    #[inline]
    pub fn push_command(&mut self, cmd: HostCommand) {
        self.commands.push(cmd);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty() && self.commands.is_empty()
    }

    pub fn set_text(&mut self, target: impl Into<Target>, text: impl Into<String>) {
        self.push_patch(DomPatch::SetText {
            target: target.into(),
            text: text.into(),
        });
    }

    pub fn set_html(&mut self, target: impl Into<Target>, html: impl Into<String>) {
        self.push_patch(DomPatch::SetHtml {
            target: target.into(),
            html: html.into(),
        });
    }

    pub fn set_placeholder(&mut self, target: impl Into<Target>, text: impl Into<String>) {
        self.push_patch(DomPatch::SetPlaceholder {
            target: target.into(),
            text: text.into(),
        });
    }

    pub fn set_attribute(&mut self, target: impl Into<Target>, name: &str, value: impl Into<String>) {
        self.push_patch(DomPatch::SetAttribute {
            target: target.into(),
            name: name.to_string(),
            value: value.into(),
        });
    }

    pub fn add_class(&mut self, target: impl Into<Target>, class: &str) {
        self.push_patch(DomPatch::AddClass {
            target: target.into(),
            class: class.to_string(),
        });
    }

    pub fn remove_class(&mut self, target: impl Into<Target>, class: &str) {
        self.push_patch(DomPatch::RemoveClass {
            target: target.into(),
            class: class.to_string(),
        });
    }

    pub fn set_style(&mut self, target: impl Into<Target>, property: &str, value: &str) {
        self.push_patch(DomPatch::SetStyle {
            target: target.into(),
            property: property.to_string(),
            value: value.to_string(),
        });
    }

    /// Patches addressed to one node, in emission order.
    pub fn patches_for(&self, target: impl Into<Target>) -> impl Iterator<Item = &DomPatch> {
        let target = target.into();
        self.patches.iter().filter(move |p| p.target() == target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_json_shape() {
        let patch = DomPatch::AddClass {
            target: Target::Element(ElementId(3)),
            class: "open".into(),
        };
        let v = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "op": "add_class",
                "target": { "kind": "element", "id": 3 },
                "class": "open"
            })
        );

        let body = serde_json::to_value(Target::Body).unwrap();
        assert_eq!(body, serde_json::json!({ "kind": "body" }));
    }

    #[test]
    fn clear_resets_flags() {
        let mut out = Outputs::default();
        out.add_class(ElementId(1), "x");
        out.push_command(HostCommand::ScrollToTop);
        out.default_prevented = true;
        out.wants_frame = true;
        out.next_deadline = Some(10.0);
        out.clear();
        assert!(out.is_empty());
        assert!(!out.default_prevented);
        assert!(!out.wants_frame);
        assert_eq!(out.next_deadline, None);
    }
}
