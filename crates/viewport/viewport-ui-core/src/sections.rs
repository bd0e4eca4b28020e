//! Scroll position → active bottom-navigation tab.
//!
//! The tracker is the only writer of the active section. Once any section has
//! been marked active exactly one tab carries the `active` class.

use crate::config::SectionsCfg;
use crate::ids::{ElementId, WatcherId};
use crate::inputs::IntersectionEntry;
use crate::outputs::{HostCommand, Outputs};
use crate::page::{NavTab, PageModel, Section};
use crate::visibility::{FireMode, VisibilityWatcher};

pub const ACTIVE_CLASS: &str = "active";

#[derive(Debug, Clone)]
pub struct SectionTracker {
    sections: Vec<Section>,
    tabs: Vec<NavTab>,
    active: Option<String>,
    home: String,
    top_offset_px: f64,
    watcher: VisibilityWatcher,
}

impl SectionTracker {
    pub fn new(sections: Vec<Section>, tabs: Vec<NavTab>, cfg: &SectionsCfg) -> Self {
        // Observe in navigation order; sentinels outside the configured set are ignored.
        let mut ordered = Vec::with_capacity(sections.len());
        for id in &cfg.ids {
            if let Some(s) = sections.iter().find(|s| &s.name == id) {
                ordered.push(s.clone());
            }
        }
        Self {
            sections: ordered,
            tabs,
            active: None,
            home: cfg.home().to_string(),
            top_offset_px: cfg.top_offset_px,
            watcher: VisibilityWatcher::new(WatcherId::Sections, cfg.observer(), FireMode::Every),
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn attach(&mut self, out: &mut Outputs) {
        if self.tabs.is_empty() {
            log::debug!("no bottom navigation, section tracking disabled");
            return;
        }
        for s in &self.sections {
            self.watcher.register(s.element, out);
        }
    }

    pub fn detach(&mut self, out: &mut Outputs) {
        self.watcher.disconnect(out);
    }

    pub fn on_intersections(&mut self, entries: &[IntersectionEntry], out: &mut Outputs) {
        for el in self.watcher.process(entries, out) {
            let name = self
                .sections
                .iter()
                .find(|s| s.element == el)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| self.home.clone());
            self.set_active(&name, out);
        }
    }

    /// Default the home tab when the page loaded at (or near) the top.
    pub fn initial_check(&mut self, scroll_y: f64, out: &mut Outputs) {
        if self.tabs.is_empty() {
            return;
        }
        if scroll_y < self.top_offset_px {
            let home = self.home.clone();
            self.set_active(&home, out);
        }
    }

    /// Mark exactly the tab for `name` active. Names with no tab are ignored
    /// so the bar never ends up with zero active tabs.
    pub fn set_active(&mut self, name: &str, out: &mut Outputs) {
        if self.active.as_deref() == Some(name) {
            return;
        }
        if !self.tabs.iter().any(|t| t.section == name) {
            log::debug!("no tab for section '{name}'");
            return;
        }
        for tab in &self.tabs {
            if tab.section == name {
                out.add_class(tab.element, ACTIVE_CLASS);
            } else {
                out.remove_class(tab.element, ACTIVE_CLASS);
            }
        }
        self.active = Some(name.to_string());
    }

    /// Tab clicks only scroll; the resulting intersections update the state.
    pub fn on_click(&self, el: ElementId, page: &PageModel, out: &mut Outputs) -> bool {
        let Some(tab) = self.tabs.iter().find(|t| t.element == el) else {
            return false;
        };
        out.default_prevented = true;
        if tab.href == "#" {
            out.push_command(HostCommand::ScrollToTop);
        } else if let Some(target) = page.resolve_fragment(&tab.href) {
            out.push_command(HostCommand::ScrollIntoView { element: target });
        } else {
            log::debug!("tab target '{}' not on page", tab.href);
        }
        true
    }
}
