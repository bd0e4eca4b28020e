//! Fade/slide-in on first view.

use std::collections::BTreeSet;

use crate::config::ObserverOptions;
use crate::ids::{ElementId, WatcherId};
use crate::inputs::IntersectionEntry;
use crate::outputs::Outputs;
use crate::visibility::{FireMode, VisibilityWatcher};

const HIDDEN_OPACITY: &str = "0";
const HIDDEN_TRANSFORM: &str = "translateY(20px)";
const REST_OPACITY: &str = "1";
const REST_TRANSFORM: &str = "translateY(0)";
const TRANSITION: &str = "opacity 0.6s ease, transform 0.6s ease";

#[derive(Debug, Clone)]
pub struct RevealAnimator {
    targets: Vec<ElementId>,
    revealed: BTreeSet<ElementId>,
    watcher: VisibilityWatcher,
}

impl RevealAnimator {
    pub fn new(targets: Vec<ElementId>, options: ObserverOptions) -> Self {
        Self {
            targets,
            revealed: BTreeSet::new(),
            watcher: VisibilityWatcher::new(WatcherId::Reveal, options, FireMode::Once),
        }
    }

    /// Hide every not-yet-revealed target and start watching it.
    pub fn attach(&mut self, out: &mut Outputs) {
        for &el in &self.targets {
            if self.revealed.contains(&el) {
                continue;
            }
            out.set_style(el, "opacity", HIDDEN_OPACITY);
            out.set_style(el, "transform", HIDDEN_TRANSFORM);
            out.set_style(el, "transition", TRANSITION);
            self.watcher.register(el, out);
        }
    }

    pub fn detach(&mut self, out: &mut Outputs) {
        self.watcher.disconnect(out);
    }

    pub fn on_intersections(&mut self, entries: &[IntersectionEntry], out: &mut Outputs) {
        for el in self.watcher.process(entries, out) {
            if !self.revealed.insert(el) {
                continue;
            }
            out.set_style(el, "opacity", REST_OPACITY);
            out.set_style(el, "transform", REST_TRANSFORM);
        }
    }

    pub fn is_revealed(&self, el: ElementId) -> bool {
        self.revealed.contains(&el)
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }
}
