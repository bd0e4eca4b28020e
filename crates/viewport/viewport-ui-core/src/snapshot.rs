//! Headless patch applier.
//!
//! Keeps the visible state of every patched node so hosts without a DOM
//! (server-side previews, tests) can inspect what the page would show.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::outputs::{DomPatch, Outputs, Target};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeState {
    pub text: Option<String>,
    pub html: Option<String>,
    pub placeholder: Option<String>,
    pub attributes: BTreeMap<String, String>,
    pub classes: BTreeSet<String>,
    pub styles: BTreeMap<String, String>,
}

impl NodeState {
    /// Whatever the node displays as content: the last text or html write.
    pub fn content(&self) -> Option<&str> {
        self.text.as_deref().or(self.html.as_deref())
    }
}

#[derive(Clone, Debug, Default)]
pub struct DomSnapshot {
    nodes: HashMap<Target, NodeState>,
}

impl DomSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a node's authored state before the engine touches it.
    pub fn seed(&mut self, target: impl Into<Target>) -> &mut NodeState {
        self.nodes.entry(target.into()).or_default()
    }

    pub fn apply(&mut self, outputs: &Outputs) {
        for patch in &outputs.patches {
            self.apply_patch(patch);
        }
    }

    pub fn apply_patch(&mut self, patch: &DomPatch) {
        let node = self.nodes.entry(patch.target()).or_default();
        match patch {
            DomPatch::SetText { text, .. } => {
                node.text = Some(text.clone());
                node.html = None;
            }
            DomPatch::SetHtml { html, .. } => {
                node.html = Some(html.clone());
                node.text = None;
            }
            DomPatch::SetPlaceholder { text, .. } => node.placeholder = Some(text.clone()),
            DomPatch::SetAttribute { name, value, .. } => {
                node.attributes.insert(name.clone(), value.clone());
            }
            DomPatch::AddClass { class, .. } => {
                node.classes.insert(class.clone());
            }
            DomPatch::RemoveClass { class, .. } => {
                node.classes.remove(class);
            }
            DomPatch::SetStyle {
                property, value, ..
            } => {
                node.styles.insert(property.clone(), value.clone());
            }
        }
    }

    pub fn node(&self, target: impl Into<Target>) -> Option<&NodeState> {
        self.nodes.get(&target.into())
    }

    pub fn content(&self, target: impl Into<Target>) -> Option<&str> {
        self.node(target).and_then(NodeState::content)
    }

    pub fn placeholder(&self, target: impl Into<Target>) -> Option<&str> {
        self.node(target).and_then(|n| n.placeholder.as_deref())
    }

    pub fn attribute(&self, target: impl Into<Target>, name: &str) -> Option<&str> {
        self.node(target)
            .and_then(|n| n.attributes.get(name))
            .map(String::as_str)
    }

    pub fn style(&self, target: impl Into<Target>, property: &str) -> Option<&str> {
        self.node(target)
            .and_then(|n| n.styles.get(property))
            .map(String::as_str)
    }

    pub fn has_class(&self, target: impl Into<Target>, class: &str) -> bool {
        self.node(target)
            .map(|n| n.classes.contains(class))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ElementId;

    #[test]
    fn last_write_wins_per_channel() {
        let mut dom = DomSnapshot::new();
        let mut out = Outputs::default();
        out.set_html(ElementId(1), "<b>hi</b>");
        out.set_text(ElementId(1), "plain");
        out.add_class(Target::Body, "en");
        out.add_class(Target::Body, "drawer-open");
        out.remove_class(Target::Body, "en");
        out.set_attribute(Target::Document, "dir", "ltr");
        dom.apply(&out);

        assert_eq!(dom.content(ElementId(1)), Some("plain"));
        assert!(dom.has_class(Target::Body, "drawer-open"));
        assert!(!dom.has_class(Target::Body, "en"));
        assert_eq!(dom.attribute(Target::Document, "dir"), Some("ltr"));
        assert!(!dom.has_class(ElementId(42), "anything"));
    }
}
