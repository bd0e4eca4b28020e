//! Engine: owns every component and routes host input to them.
//!
//! Methods:
//! - new / with_sink
//! - attach(now, metrics) / detach()
//! - dispatch(now, event): one DOM, observer or error event
//! - advance(now): due timers, then per-frame work (counter runs, scroll depth)
//!
//! Each call returns the `Outputs` produced by that call only.

use crate::accordion::AccordionController;
use crate::analytics::{AnalyticsEvent, AnalyticsSink, Reporter};
use crate::config::Config;
use crate::counter::CounterAnimator;
use crate::drawer::{DrawerController, DrawerState};
use crate::error::ConfigError;
use crate::ids::{ElementId, WatcherId};
use crate::inputs::{ScrollMetrics, UiEvent};
use crate::locale::{Language, LocaleStore};
use crate::localizer::ContentLocalizer;
use crate::outputs::{HostCommand, Outputs};
use crate::page::PageModel;
use crate::reveal::RevealAnimator;
use crate::scroll_depth::ScrollDepthTracker;
use crate::sections::SectionTracker;
use crate::timers::{TimerQueue, TimerTask};

#[derive(Debug)]
pub struct Engine {
    cfg: Config,
    page: PageModel,
    attached: bool,
    viewport: ScrollMetrics,

    // Components
    locale: LocaleStore,
    localizer: ContentLocalizer,
    reveal: RevealAnimator,
    counters: CounterAnimator,
    sections: SectionTracker,
    drawer: DrawerController,
    accordion: AccordionController,
    depth: ScrollDepthTracker,

    timers: TimerQueue,
    reporter: Reporter,

    // Per-call outputs
    outputs: Outputs,
}

impl Engine {
    /// Build an engine for `page`. Analytics go nowhere until `with_sink`.
    pub fn new(cfg: Config, page: PageModel) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let localizer = ContentLocalizer::new(
            page.lang_toggle,
            page.translatables.clone(),
            page.direction_icons.clone(),
        );
        let reveal = RevealAnimator::new(page.reveal_targets.clone(), cfg.reveal.clone());
        let counters =
            CounterAnimator::new(page.stats.as_ref(), cfg.stats.clone(), cfg.counter.clone());
        let sections = SectionTracker::new(page.sections.clone(), page.tabs.clone(), &cfg.sections);
        let drawer = DrawerController::new(&page, cfg.drawer.clone());
        let accordion = AccordionController::new(page.faq_items.clone());
        let depth = ScrollDepthTracker::new(cfg.scroll_depth.marks.clone());

        Ok(Self {
            locale: LocaleStore::new(cfg.locale.initial),
            localizer,
            reveal,
            counters,
            sections,
            drawer,
            accordion,
            depth,
            timers: TimerQueue::new(),
            reporter: Reporter::default(),
            outputs: Outputs::default(),
            viewport: ScrollMetrics::default(),
            attached: false,
            cfg,
            page,
        })
    }

    pub fn with_sink(mut self, sink: Box<dyn AnalyticsSink>) -> Self {
        self.reporter = Reporter::new(sink);
        self
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn page(&self) -> &PageModel {
        &self.page
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn language(&self) -> Language {
        self.locale.current()
    }

    pub fn active_section(&self) -> Option<&str> {
        self.sections.active()
    }

    pub fn drawer_state(&self) -> DrawerState {
        self.drawer.state()
    }

    pub fn is_faq_open(&self, item: ElementId) -> bool {
        self.accordion.is_open(item)
    }

    pub fn is_revealed(&self, el: ElementId) -> bool {
        self.reveal.is_revealed(el)
    }

    pub fn counters(&self) -> &CounterAnimator {
        &self.counters
    }

    pub fn reported_scroll_marks(&self) -> &[u32] {
        self.depth.reported()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Bind to the page: hide reveal targets, make FAQ headers operable, start
    /// observing and schedule the initial section check. A second call while
    /// attached emits nothing.
    pub fn attach(&mut self, now: f64, metrics: ScrollMetrics) -> &Outputs {
        self.outputs.clear();
        if self.attached {
            return &self.outputs;
        }
        self.attached = true;
        self.viewport = metrics;

        if self.locale.current() != Language::Hebrew {
            self.localizer.apply(self.locale.current(), &mut self.outputs);
        }
        self.accordion.attach(&mut self.outputs);
        self.reveal.attach(&mut self.outputs);
        self.counters.attach(&mut self.outputs);
        self.sections.attach(&mut self.outputs);
        self.timers.schedule(
            now + self.cfg.sections.initial_check_delay_ms,
            TimerTask::InitialSectionCheck,
        );
        log::debug!(
            "attached: {} reveal targets, {} stats, {} tabs",
            self.page.reveal_targets.len(),
            self.counters.targets().len(),
            self.sections.tab_count()
        );
        self.finish()
    }

    /// Stop observing and drop pending timers and runs. Language, reveal and
    /// latch state survive so a later `attach` does not replay them.
    pub fn detach(&mut self) -> &Outputs {
        self.outputs.clear();
        if !self.attached {
            return &self.outputs;
        }
        self.attached = false;
        self.reveal.detach(&mut self.outputs);
        self.counters.detach(&mut self.outputs);
        self.sections.detach(&mut self.outputs);
        self.depth.cancel_pending();
        self.timers.clear();
        self.finish()
    }

    /// Switch language: content first, then the analytics side effect.
    pub fn toggle_language(&mut self, now: f64) -> &Outputs {
        self.dispatch(now, UiEvent::ToggleLanguage)
    }

    pub fn dispatch(&mut self, now: f64, event: UiEvent) -> &Outputs {
        self.outputs.clear();
        self.run_timers(now);
        self.handle(now, event);
        self.finish()
    }

    /// Frame / timer wake-up.
    pub fn advance(&mut self, now: f64) -> &Outputs {
        self.outputs.clear();
        self.run_timers(now);
        self.run_frame(now);
        self.finish()
    }

    fn handle(&mut self, now: f64, event: UiEvent) {
        match event {
            UiEvent::ToggleLanguage => {
                let lang = self.locale.toggle();
                self.localizer.apply(lang, &mut self.outputs);
                self.reporter.record(AnalyticsEvent::language_switch(lang));
            }
            UiEvent::Error { report } => {
                self.reporter.record(AnalyticsEvent::exception(&report));
            }
            _ if !self.attached => log::debug!("detached, ignoring page event"),
            UiEvent::Click { element } => self.on_click(now, element),
            UiEvent::KeyDown { key, element } => {
                self.accordion.on_key(&key, element, &mut self.outputs);
                self.drawer.on_key(&key, &mut self.outputs);
            }
            UiEvent::Resize { width } => self.drawer.on_resize(width, &mut self.outputs),
            UiEvent::Scroll { metrics } => {
                self.viewport = metrics;
                self.depth.note_scroll();
            }
            UiEvent::Intersections { watcher, entries } => match watcher {
                WatcherId::Reveal => self.reveal.on_intersections(&entries, &mut self.outputs),
                WatcherId::Stats => self.counters.on_intersections(
                    &entries,
                    now,
                    &mut self.timers,
                    &mut self.outputs,
                ),
                WatcherId::Sections => self.sections.on_intersections(&entries, &mut self.outputs),
            },
        }
    }

    /// A click is offered to every component; one node can play several
    /// roles (a CTA that is also an in-page anchor).
    fn on_click(&mut self, now: f64, el: ElementId) {
        let out = &mut self.outputs;
        self.drawer
            .on_click(el, now, &self.page, &mut self.timers, out);
        self.sections.on_click(el, &self.page, out);
        self.accordion.on_click(el, out);

        if let Some(link) = self.page.anchors.iter().find(|a| a.element == el) {
            if link.href != "#" {
                out.default_prevented = true;
                match self.page.resolve_fragment(&link.href) {
                    Some(target) => out.push_command(HostCommand::ScrollIntoView { element: target }),
                    None => log::debug!("anchor target '{}' not on page", link.href),
                }
            }
        }
        if let Some(question) = self.accordion.question_for(el) {
            let ev = AnalyticsEvent::faq_interaction(question, self.cfg.analytics.label_max_chars);
            self.reporter.record(ev);
        }
        if let Some(cta) = self.page.cta_buttons.iter().find(|c| c.element == el) {
            self.reporter.record(AnalyticsEvent::cta_click(&cta.label));
        }
    }

    fn run_timers(&mut self, now: f64) {
        while let Some((at, task)) = self.timers.pop_due(now) {
            match task {
                TimerTask::StartCounter { index } => {
                    self.counters
                        .start(index, at, &mut self.timers, &mut self.outputs)
                }
                TimerTask::EndPulse { element } => {
                    self.counters.end_pulse(element, &mut self.outputs)
                }
                TimerTask::DrawerScroll { element } => self
                    .outputs
                    .push_command(HostCommand::ScrollIntoView { element }),
                TimerTask::InitialSectionCheck => self
                    .sections
                    .initial_check(self.viewport.scroll_y, &mut self.outputs),
            }
        }
    }

    fn run_frame(&mut self, now: f64) {
        if self.counters.has_active_runs() {
            self.counters
                .render_frame(now, &mut self.timers, &mut self.outputs);
        }
        if self.depth.is_pending() {
            for mark in self.depth.on_frame(&self.viewport) {
                self.reporter.record(AnalyticsEvent::scroll_depth(mark));
            }
        }
    }

    fn finish(&mut self) -> &Outputs {
        self.outputs.wants_frame = self.counters.has_active_runs() || self.depth.is_pending();
        self.outputs.next_deadline = self.timers.next_deadline();
        &self.outputs
    }
}
