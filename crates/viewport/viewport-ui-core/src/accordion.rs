//! FAQ accordion. Items are independent; any number may be open at once.

use std::collections::BTreeSet;

use crate::ids::ElementId;
use crate::inputs::Key;
use crate::outputs::Outputs;
use crate::page::FaqItem;

pub const OPEN_CLASS: &str = "open";

#[derive(Debug, Clone, Default)]
pub struct AccordionController {
    items: Vec<FaqItem>,
    open: BTreeSet<ElementId>,
}

impl AccordionController {
    pub fn new(items: Vec<FaqItem>) -> Self {
        Self {
            items,
            open: BTreeSet::new(),
        }
    }

    /// Make every header keyboard-operable.
    pub fn attach(&self, out: &mut Outputs) {
        for item in &self.items {
            let Some(header) = item.header else {
                log::debug!("faq item {:?} has no heading", item.element);
                continue;
            };
            out.set_attribute(header, "role", "button");
            let expanded = self.open.contains(&item.element);
            out.set_attribute(header, "aria-expanded", expanded.to_string());
            out.set_attribute(header, "tabindex", "0");
        }
    }

    pub fn is_open(&self, item: ElementId) -> bool {
        self.open.contains(&item)
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    /// Question of the item rooted at `el`, for interaction tracking.
    pub fn question_for(&self, el: ElementId) -> Option<&str> {
        self.items
            .iter()
            .find(|i| i.element == el)
            .map(|i| i.question.as_str())
    }

    fn index_for_header(&self, el: ElementId) -> Option<usize> {
        self.items.iter().position(|i| i.header == Some(el))
    }

    fn toggle(&mut self, index: usize, out: &mut Outputs) {
        let item = &self.items[index];
        let now_open = if self.open.remove(&item.element) {
            out.remove_class(item.element, OPEN_CLASS);
            false
        } else {
            self.open.insert(item.element);
            out.add_class(item.element, OPEN_CLASS);
            true
        };
        if let Some(header) = item.header {
            out.set_attribute(header, "aria-expanded", now_open.to_string());
        }
    }

    pub fn on_click(&mut self, el: ElementId, out: &mut Outputs) -> bool {
        match self.index_for_header(el) {
            Some(i) => {
                self.toggle(i, out);
                true
            }
            None => false,
        }
    }

    pub fn on_key(&mut self, key: &Key, el: Option<ElementId>, out: &mut Outputs) -> bool {
        if !key.activates() {
            return false;
        }
        let Some(i) = el.and_then(|el| self.index_for_header(el)) else {
            return false;
        };
        out.default_prevented = true;
        self.toggle(i, out);
        true
    }
}
