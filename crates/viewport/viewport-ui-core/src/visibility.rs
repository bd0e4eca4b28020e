//! Host-agnostic view of one intersection observer.
//!
//! The host runs the real observer and forwards its entries; the watcher
//! decides which entries count as "became visible" and keeps the observed set
//! in sync with the host through `Observe`/`Unobserve` commands.

use crate::config::ObserverOptions;
use crate::ids::{ElementId, WatcherId};
use crate::inputs::IntersectionEntry;
use crate::outputs::{HostCommand, Outputs};

/// Browsers report ratios at threshold crossings with some float noise.
const RATIO_EPSILON: f64 = 1e-3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FireMode {
    /// Fire the first time an element qualifies, then stop observing it.
    Once,
    /// Fire on every qualifying entry.
    Every,
}

#[derive(Debug, Clone)]
pub struct VisibilityWatcher {
    id: WatcherId,
    options: ObserverOptions,
    mode: FireMode,
    observed: Vec<ElementId>,
}

impl VisibilityWatcher {
    pub fn new(id: WatcherId, options: ObserverOptions, mode: FireMode) -> Self {
        Self {
            id,
            options,
            mode,
            observed: Vec::new(),
        }
    }

    pub fn id(&self) -> WatcherId {
        self.id
    }

    pub fn options(&self) -> &ObserverOptions {
        &self.options
    }

    pub fn register(&mut self, element: ElementId, out: &mut Outputs) {
        if self.observed.contains(&element) {
            return;
        }
        self.observed.push(element);
        out.push_command(HostCommand::Observe {
            watcher: self.id,
            element,
        });
    }

    pub fn is_observing(&self, element: ElementId) -> bool {
        self.observed.contains(&element)
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    fn qualifies(&self, entry: &IntersectionEntry) -> bool {
        entry.is_intersecting && entry.ratio + RATIO_EPSILON >= self.options.threshold
    }

    /// Filter a batch of entries down to the elements that fire, in batch order.
    /// Entries for elements this watcher no longer observes are ignored.
    pub fn process(&mut self, entries: &[IntersectionEntry], out: &mut Outputs) -> Vec<ElementId> {
        let mut fired = Vec::new();
        for entry in entries {
            if !self.is_observing(entry.element) || !self.qualifies(entry) {
                continue;
            }
            fired.push(entry.element);
            if self.mode == FireMode::Once {
                self.observed.retain(|e| *e != entry.element);
                out.push_command(HostCommand::Unobserve {
                    watcher: self.id,
                    element: entry.element,
                });
            }
        }
        fired
    }

    pub fn disconnect(&mut self, out: &mut Outputs) {
        self.observed.clear();
        out.push_command(HostCommand::Disconnect { watcher: self.id });
    }
}
