//! Count-up animation for the stats row.
//!
//! One watcher registration covers the whole row. The first qualifying
//! crossing flips a latch and schedules each target at `index * stagger`;
//! later crossings are ignored. Runs are advanced once per animation frame and
//! end only by reaching fraction 1.

use crate::config::{CounterCfg, ObserverOptions};
use crate::ids::{ElementId, WatcherId};
use crate::inputs::IntersectionEntry;
use crate::outputs::Outputs;
use crate::page::StatsGroup;
use crate::stats::{ease_out_cubic, format_stat_value, parse_stat_text, wrap_ltr, StatKind, StatTarget};
use crate::timers::{TimerQueue, TimerTask};
use crate::visibility::{FireMode, VisibilityWatcher};

pub const VISIBLE_CLASS: &str = "visible";
pub const PULSE_CLASS: &str = "counting";

/// In-flight state for one animated number.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationRun {
    pub element: ElementId,
    pub start_time: f64,
    pub target_value: f64,
    pub suffix: String,
}

#[derive(Debug, Clone)]
pub struct CounterAnimator {
    container: Option<ElementId>,
    items: Vec<ElementId>,
    targets: Vec<StatTarget>,
    has_animated: bool,
    triggered_at: Option<f64>,
    runs: Vec<AnimationRun>,
    /// Start instant of each target, by index, once started.
    started: Vec<Option<f64>>,
    /// Elements currently carrying the completion pulse.
    pulsing: Vec<ElementId>,
    cfg: CounterCfg,
    watcher: VisibilityWatcher,
}

impl CounterAnimator {
    pub fn new(group: Option<&StatsGroup>, options: ObserverOptions, cfg: CounterCfg) -> Self {
        let (container, items, targets) = match group {
            Some(g) => (
                Some(g.container),
                g.items.clone(),
                g.numbers
                    .iter()
                    .map(|n| parse_stat_text(n.element, &n.text))
                    .collect::<Vec<_>>(),
            ),
            None => (None, Vec::new(), Vec::new()),
        };
        let started = vec![None; targets.len()];
        Self {
            container,
            items,
            targets,
            has_animated: false,
            triggered_at: None,
            runs: Vec::new(),
            started,
            pulsing: Vec::new(),
            cfg,
            watcher: VisibilityWatcher::new(WatcherId::Stats, options, FireMode::Every),
        }
    }

    pub fn targets(&self) -> &[StatTarget] {
        &self.targets
    }

    pub fn has_animated(&self) -> bool {
        self.has_animated
    }

    pub fn triggered_at(&self) -> Option<f64> {
        self.triggered_at
    }

    /// Start instant of target `index`, if it has started.
    pub fn started_at(&self, index: usize) -> Option<f64> {
        self.started.get(index).copied().flatten()
    }

    pub fn active_runs(&self) -> &[AnimationRun] {
        &self.runs
    }

    pub fn has_active_runs(&self) -> bool {
        !self.runs.is_empty()
    }

    pub fn attach(&mut self, out: &mut Outputs) {
        if self.has_animated {
            return;
        }
        match self.container {
            Some(row) => self.watcher.register(row, out),
            None => log::debug!("no stats row on page, counters idle"),
        }
    }

    /// Stop watching. A cascade cut short by the detach is settled on its
    /// final values; the latch never replays it.
    pub fn detach(&mut self, out: &mut Outputs) {
        self.watcher.disconnect(out);
        if self.has_animated {
            self.settle(out);
        }
    }

    fn settle(&mut self, out: &mut Outputs) {
        for (index, target) in self.targets.iter().enumerate() {
            let running = self.runs.iter().any(|r| r.element == target.element);
            if running || self.started_at(index).is_none() {
                log::debug!("counter {:?} settled on detach", target.element);
                out.set_text(target.element, wrap_ltr(&target.final_text()));
            }
        }
        for element in self.pulsing.drain(..) {
            out.remove_class(element, PULSE_CLASS);
        }
        self.runs.clear();
    }

    pub fn end_pulse(&mut self, element: ElementId, out: &mut Outputs) {
        self.pulsing.retain(|e| *e != element);
        out.remove_class(element, PULSE_CLASS);
    }

    pub fn on_intersections(
        &mut self,
        entries: &[IntersectionEntry],
        now: f64,
        timers: &mut TimerQueue,
        out: &mut Outputs,
    ) {
        let fired = self.watcher.process(entries, out);
        if fired.is_empty() {
            return;
        }
        if self.has_animated {
            log::debug!("stats row re-entered view, latch already set");
            return;
        }
        self.has_animated = true;
        self.triggered_at = Some(now);

        for &item in &self.items {
            out.add_class(item, VISIBLE_CLASS);
        }
        for index in 0..self.targets.len() {
            let delay = index as f64 * self.cfg.stagger_ms;
            timers.schedule(now + delay, TimerTask::StartCounter { index });
        }
    }

    /// Begin target `index` at instant `at` (its stagger deadline).
    pub fn start(&mut self, index: usize, at: f64, timers: &mut TimerQueue, out: &mut Outputs) {
        let Some(target) = self.targets.get(index).cloned() else {
            return;
        };
        let element = target.element;
        if self.runs.iter().any(|r| r.element == element) {
            log::debug!("counter {element:?} already running");
            return;
        }
        if let Some(slot) = self.started.get_mut(index) {
            *slot = Some(at);
        }
        match &target.kind {
            StatKind::Animated { value, suffix } => {
                self.runs.push(AnimationRun {
                    element,
                    start_time: at,
                    target_value: *value,
                    suffix: suffix.clone(),
                });
            }
            StatKind::Static => {
                out.set_text(element, wrap_ltr(&target.literal));
                self.pulse(element, at, timers, out);
            }
        }
    }

    fn pulse(&mut self, element: ElementId, at: f64, timers: &mut TimerQueue, out: &mut Outputs) {
        self.pulsing.push(element);
        out.add_class(element, PULSE_CLASS);
        timers.schedule(at + self.cfg.pulse_ms, TimerTask::EndPulse { element });
    }

    /// Render every active run at `now`; finished runs are dropped.
    pub fn render_frame(&mut self, now: f64, timers: &mut TimerQueue, out: &mut Outputs) {
        let duration = self.cfg.duration_ms;
        let mut finished = Vec::new();
        for run in &self.runs {
            let progress = ((now - run.start_time) / duration).clamp(0.0, 1.0);
            if progress >= 1.0 {
                let text = format_stat_value(run.target_value, run.target_value, &run.suffix);
                out.set_text(run.element, wrap_ltr(&text));
                finished.push(run.element);
                continue;
            }
            let current = run.target_value * ease_out_cubic(progress);
            let text = format_stat_value(current, run.target_value, &run.suffix);
            log::trace!("counter {:?} at {progress:.3}: {text}", run.element);
            out.set_text(run.element, wrap_ltr(&text));
        }
        for element in finished {
            self.runs.retain(|r| r.element != element);
            self.pulse(element, now, timers, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::page::StatNumber;

    fn group() -> StatsGroup {
        StatsGroup {
            container: ElementId(100),
            items: vec![ElementId(10), ElementId(11)],
            numbers: vec![
                StatNumber {
                    element: ElementId(1),
                    text: "70%".into(),
                },
                StatNumber {
                    element: ElementId(2),
                    text: "24/7".into(),
                },
            ],
        }
    }

    fn animator() -> CounterAnimator {
        let cfg = Config::default();
        CounterAnimator::new(Some(&group()), cfg.stats, cfg.counter)
    }

    #[test]
    fn latch_schedules_each_target_once() {
        let mut c = animator();
        let mut timers = TimerQueue::new();
        let mut out = Outputs::default();
        c.attach(&mut out);
        let enter = [IntersectionEntry::entering(ElementId(100), 0.4)];
        c.on_intersections(&enter, 1000.0, &mut timers, &mut out);
        c.on_intersections(&enter, 2000.0, &mut timers, &mut out);
        assert!(c.has_animated());
        assert_eq!(timers.len(), 2);
        assert_eq!(out.patches_for(ElementId(10)).count(), 1);
    }

    #[test]
    fn run_ends_on_exact_value() {
        let mut c = animator();
        let mut timers = TimerQueue::new();
        let mut out = Outputs::default();
        c.start(0, 0.0, &mut timers, &mut out);
        assert!(c.has_active_runs());
        c.render_frame(750.0, &mut timers, &mut out);
        c.render_frame(1500.0, &mut timers, &mut out);
        assert!(!c.has_active_runs());
        let texts: Vec<_> = out
            .patches_for(ElementId(1))
            .filter_map(|p| match p {
                crate::outputs::DomPatch::SetText { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec![wrap_ltr("61%"), wrap_ltr("70%")]);
        assert_eq!(timers.next_deadline(), Some(1800.0));
    }
}
