//! Browser runtime: owns the engine, the DOM bindings and the wake-ups.
//!
//! Every JS callback (listeners, observers, animation frames, timeouts) goes
//! through the thread-local `RUNTIME`, so no closure holds a reference to the
//! runtime itself.

use std::cell::RefCell;

use gloo_timers::callback::Timeout;
use js_sys::{Array, Reflect};
use viewport_ui_core::{
    Config, ElementId, Engine, ErrorReport, HostCommand, IntersectionEntry, Key, Outputs,
    ScrollMetrics, UiEvent, WatcherId,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Document, ErrorEvent, Event, EventTarget, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, PromiseRejectionEvent,
    ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, ScrollToOptions, Window,
};

use crate::nodes::NodeTable;
use crate::scan::{clickable, scan_page};
use crate::sink::GtagSink;

const TOGGLE_GLOBAL: &str = "toggleLanguage";

thread_local! {
    static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
}

/// Run `f` against the live runtime. `None` when stopped, or when called
/// re-entrantly from inside another runtime call.
pub fn with_runtime<R>(f: impl FnOnce(&mut Runtime) -> R) -> Option<R> {
    RUNTIME.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => slot.as_mut().map(f),
        Err(_) => {
            log::warn!("re-entrant runtime call dropped");
            None
        }
    })
}

pub fn is_running() -> bool {
    RUNTIME.with(|cell| cell.try_borrow().map(|r| r.is_some()).unwrap_or(true))
}

pub fn install(rt: Runtime) {
    RUNTIME.with(|cell| *cell.borrow_mut() = Some(rt));
}

pub fn take() -> Option<Runtime> {
    RUNTIME.with(|cell| cell.borrow_mut().take())
}

/// DOM listener removed again when dropped.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn add(
        target: &EventTarget,
        kind: &'static str,
        passive: bool,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

struct Observer {
    watcher: WatcherId,
    inner: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl Observer {
    fn new(watcher: WatcherId, cfg: &Config) -> Result<Self, JsValue> {
        let options = cfg.observer(watcher);
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, _: IntersectionObserver| {
                with_runtime(|rt| {
                    let entries = rt.intersection_entries(&entries);
                    rt.dispatch(UiEvent::Intersections { watcher, entries });
                });
            },
        );
        let inner =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        Ok(Self {
            watcher,
            inner,
            _callback: callback,
        })
    }
}

impl Drop for Observer {
    fn drop(&mut self) {
        self.inner.disconnect();
    }
}

pub struct Runtime {
    engine: Engine,
    nodes: NodeTable,
    window: Window,
    document: Document,
    observers: Vec<Observer>,
    listeners: Vec<Listener>,
    /// Backs `window.toggleLanguage` for the markup's inline handler.
    _toggle: Closure<dyn FnMut()>,
    frame: Closure<dyn FnMut(f64)>,
    frame_id: Option<i32>,
    /// Bumped whenever the armed timeout is superseded; stale timeouts
    /// compare their captured epoch and do nothing.
    timer_epoch: u32,
    armed_deadline: Option<f64>,
}

impl Runtime {
    pub fn new(cfg: Config) -> Result<Self, JsError> {
        let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsError::new("no document"))?;

        let mut nodes = NodeTable::default();
        let page = scan_page(&document, &cfg.sections, &mut nodes)?;
        let click_targets = clickable(&page);

        let observers = WatcherId::ALL
            .iter()
            .map(|w| Observer::new(*w, &cfg))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| JsError::new(&format!("intersection observer: {e:?}")))?;

        let engine = Engine::new(cfg, page)
            .map_err(|e| JsError::new(&e.to_string()))?
            .with_sink(Box::new(GtagSink));

        let mut listeners = Vec::new();
        for id in click_targets {
            let Some(el) = nodes.get(id) else { continue };
            listeners.push(
                Listener::add(el.as_ref(), "click", false, move |ev: Event| {
                    let click = UiEvent::Click { element: id };
                    if with_runtime(|rt| rt.dispatch(click)).unwrap_or(false) {
                        ev.prevent_default();
                    }
                })
                .map_err(listener_error)?,
            );
        }
        listeners.extend(window_listeners(&window, &document).map_err(listener_error)?);

        let toggle = Closure::<dyn FnMut()>::new(|| {
            with_runtime(|rt| rt.dispatch(UiEvent::ToggleLanguage));
        });
        Reflect::set(&window, &JsValue::from_str(TOGGLE_GLOBAL), toggle.as_ref())
            .map_err(|e| JsError::new(&format!("cannot install {TOGGLE_GLOBAL}: {e:?}")))?;

        let frame = Closure::<dyn FnMut(f64)>::new(|_ts: f64| {
            with_runtime(|rt| {
                rt.frame_id = None;
                rt.advance();
            });
        });

        Ok(Self {
            engine,
            nodes,
            window,
            document,
            observers,
            listeners,
            _toggle: toggle,
            frame,
            frame_id: None,
            timer_epoch: 0,
            armed_deadline: None,
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    fn now(&self) -> f64 {
        self.window
            .performance()
            .map(|p| p.now())
            .unwrap_or_default()
    }

    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            scroll_y: self.window.scroll_y().unwrap_or_default(),
            scroll_height: self
                .document
                .body()
                .map(|b| f64::from(b.scroll_height()))
                .unwrap_or_default(),
            viewport_height: self
                .window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or_default(),
        }
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or_default()
    }

    fn intersection_entries(&self, entries: &Array) -> Vec<IntersectionEntry> {
        entries
            .iter()
            .filter_map(|v| {
                let entry: IntersectionObserverEntry = v.unchecked_into();
                let target = entry.target();
                let element = self.nodes.lookup(target.as_ref())?;
                Some(IntersectionEntry {
                    element,
                    is_intersecting: entry.is_intersecting(),
                    ratio: entry.intersection_ratio(),
                })
            })
            .collect()
    }

    pub fn attach(&mut self) {
        let now = self.now();
        let metrics = self.metrics();
        let out = self.engine.attach(now, metrics).clone();
        self.flush(&out);
    }

    pub fn detach(&mut self) {
        let out = self.engine.detach().clone();
        self.flush(&out);
    }

    /// Forward one event; returns whether the DOM event's default action
    /// should be cancelled.
    pub fn dispatch(&mut self, event: UiEvent) -> bool {
        let now = self.now();
        let out = self.engine.dispatch(now, event).clone();
        self.flush(&out);
        out.default_prevented
    }

    fn advance(&mut self) {
        let now = self.now();
        let out = self.engine.advance(now).clone();
        self.flush(&out);
    }

    fn flush(&mut self, out: &Outputs) {
        for patch in &out.patches {
            if let Err(e) = self.nodes.apply(&self.document, patch) {
                log::warn!("patch {patch:?} failed: {e:?}");
            }
        }
        for cmd in &out.commands {
            self.run_command(cmd);
        }
        if out.wants_frame && self.frame_id.is_none() {
            match self
                .window
                .request_animation_frame(self.frame.as_ref().unchecked_ref())
            {
                Ok(id) => self.frame_id = Some(id),
                Err(e) => log::error!("requestAnimationFrame failed: {e:?}"),
            }
        }
        match out.next_deadline {
            Some(deadline) if self.armed_deadline != Some(deadline) => self.arm(deadline),
            Some(_) => {}
            None => {
                self.armed_deadline = None;
                self.timer_epoch = self.timer_epoch.wrapping_add(1);
            }
        }
    }

    fn arm(&mut self, deadline: f64) {
        self.timer_epoch = self.timer_epoch.wrapping_add(1);
        self.armed_deadline = Some(deadline);
        let epoch = self.timer_epoch;
        let delay = (deadline - self.now()).max(0.0).ceil() as u32;
        Timeout::new(delay, move || {
            with_runtime(|rt| {
                if rt.timer_epoch == epoch {
                    rt.armed_deadline = None;
                    rt.advance();
                }
            });
        })
        .forget();
    }

    fn element(&self, id: ElementId) -> Option<&web_sys::Element> {
        let el = self.nodes.get(id);
        if el.is_none() {
            log::warn!("unknown element {id:?}");
        }
        el
    }

    fn run_command(&self, cmd: &HostCommand) {
        match cmd {
            HostCommand::Observe { watcher, element } => {
                if let (Some(obs), Some(el)) = (self.observer(*watcher), self.element(*element)) {
                    obs.inner.observe(el);
                }
            }
            HostCommand::Unobserve { watcher, element } => {
                if let (Some(obs), Some(el)) = (self.observer(*watcher), self.element(*element)) {
                    obs.inner.unobserve(el);
                }
            }
            HostCommand::Disconnect { watcher } => {
                if let Some(obs) = self.observer(*watcher) {
                    obs.inner.disconnect();
                }
            }
            HostCommand::ScrollIntoView { element } => {
                if let Some(el) = self.element(*element) {
                    let opts = ScrollIntoViewOptions::new();
                    opts.set_behavior(ScrollBehavior::Smooth);
                    opts.set_block(ScrollLogicalPosition::Start);
                    el.scroll_into_view_with_scroll_into_view_options(&opts);
                }
            }
            HostCommand::ScrollToTop => {
                let opts = ScrollToOptions::new();
                opts.set_top(0.0);
                opts.set_behavior(ScrollBehavior::Smooth);
                self.window.scroll_to_with_scroll_to_options(&opts);
            }
        }
    }

    fn observer(&self, watcher: WatcherId) -> Option<&Observer> {
        self.observers.iter().find(|o| o.watcher == watcher)
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        if let Some(id) = self.frame_id.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        let _ = Reflect::delete_property(&self.window, &JsValue::from_str(TOGGLE_GLOBAL));
        log::debug!("runtime dropped, {} listeners removed", self.listeners.len());
    }
}

fn listener_error(e: JsValue) -> JsError {
    JsError::new(&format!("addEventListener failed: {e:?}"))
}

/// Window/document level listeners: keys, resize, scroll and uncaught errors.
fn window_listeners(window: &Window, document: &Document) -> Result<Vec<Listener>, JsValue> {
    let keydown = Listener::add(document.as_ref(), "keydown", false, |ev: Event| {
        let Some(kev) = ev.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let key = Key::from_dom(&kev.key());
        let prevented = with_runtime(|rt| {
            let element = ev.target().and_then(|t| rt.nodes.lookup(t.as_ref()));
            rt.dispatch(UiEvent::KeyDown { key, element })
        });
        if prevented.unwrap_or(false) {
            ev.prevent_default();
        }
    })?;

    let resize = Listener::add(window.as_ref(), "resize", false, |_ev: Event| {
        with_runtime(|rt| {
            let width = rt.viewport_width();
            rt.dispatch(UiEvent::Resize { width });
        });
    })?;

    let scroll = Listener::add(window.as_ref(), "scroll", true, |_ev: Event| {
        with_runtime(|rt| {
            let metrics = rt.metrics();
            rt.dispatch(UiEvent::Scroll { metrics });
        });
    })?;

    let error = Listener::add(window.as_ref(), "error", false, |ev: Event| {
        let Some(err) = ev.dyn_ref::<ErrorEvent>() else {
            return;
        };
        let report = ErrorReport::Script {
            message: err.message(),
            source: err.filename(),
            line: err.lineno(),
            column: err.colno(),
        };
        with_runtime(|rt| rt.dispatch(UiEvent::Error { report }));
    })?;

    let rejection = Listener::add(window.as_ref(), "unhandledrejection", false, |ev: Event| {
        let Some(rej) = ev.dyn_ref::<PromiseRejectionEvent>() else {
            return;
        };
        let reason = describe(&rej.reason());
        with_runtime(|rt| rt.dispatch(UiEvent::Error {
            report: ErrorReport::Rejection { reason },
        }));
    })?;

    Ok(vec![keydown, resize, scroll, error, rejection])
}

/// String form of a rejection reason, as `String(reason)` would give.
fn describe(reason: &JsValue) -> String {
    if let Some(s) = reason.as_string() {
        return s;
    }
    if let Some(err) = reason.dyn_ref::<js_sys::Error>() {
        return String::from(err.to_string());
    }
    js_sys::JSON::stringify(reason)
        .ok()
        .and_then(|s| s.as_string())
        .unwrap_or_else(|| format!("{reason:?}"))
}
