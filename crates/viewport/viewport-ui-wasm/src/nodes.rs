//! Element table: maps engine `ElementId`s to live DOM nodes and applies
//! patches to them.

use viewport_ui_core::{DomPatch, ElementId, Target};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

#[derive(Default)]
pub struct NodeTable {
    nodes: Vec<Element>,
}

impl NodeTable {
    /// Id of `el`, assigning a fresh one on first sight. The same node always
    /// gets the same id.
    pub fn id_of(&mut self, el: &Element) -> ElementId {
        if let Some(id) = self.lookup(el.as_ref()) {
            return id;
        }
        self.nodes.push(el.clone());
        ElementId((self.nodes.len() - 1) as u32)
    }

    /// Id of an already-registered node (an event or observer target).
    pub fn lookup(&self, value: &JsValue) -> Option<ElementId> {
        self.nodes
            .iter()
            .position(|n| {
                let v: &JsValue = n.as_ref();
                v == value
            })
            .map(|i| ElementId(i as u32))
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    fn resolve(&self, doc: &Document, target: Target) -> Option<Element> {
        match target {
            Target::Document => doc.document_element(),
            Target::Body => doc.body().map(Into::into),
            Target::Element(id) => self.get(id).cloned(),
        }
    }

    pub fn apply(&self, doc: &Document, patch: &DomPatch) -> Result<(), JsValue> {
        let Some(el) = self.resolve(doc, patch.target()) else {
            log::warn!("patch target {:?} is not in the document", patch.target());
            return Ok(());
        };
        match patch {
            DomPatch::SetText { text, .. } => el.set_text_content(Some(text)),
            DomPatch::SetHtml { html, .. } => el.set_inner_html(html),
            DomPatch::SetPlaceholder { text, .. } => el.set_attribute("placeholder", text)?,
            DomPatch::SetAttribute { name, value, .. } => el.set_attribute(name, value)?,
            DomPatch::AddClass { class, .. } => el.class_list().add_1(class)?,
            DomPatch::RemoveClass { class, .. } => el.class_list().remove_1(class)?,
            DomPatch::SetStyle {
                property, value, ..
            } => match el.dyn_ref::<HtmlElement>() {
                Some(html) => html.style().set_property(property, value)?,
                None => log::debug!("cannot style non-HTML node {:?}", patch.target()),
            },
        }
        Ok(())
    }
}
