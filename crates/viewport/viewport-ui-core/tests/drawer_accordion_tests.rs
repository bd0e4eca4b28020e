use viewport_ui_core::{
    config::Config, DomSnapshot, DrawerState, ElementId, Engine, HostCommand, Key, PageModel,
    ScrollMetrics, Target, UiEvent,
};
use viewport_ui_fixtures::pages;

const HAMBURGER: ElementId = ElementId(0);
const DRAWER: ElementId = ElementId(1);
const BACKDROP: ElementId = ElementId(2);

fn engine() -> (Engine, DomSnapshot) {
    let page: PageModel = pages::load("landing").unwrap();
    let mut engine = Engine::new(Config::default(), page).unwrap();
    let mut dom = DomSnapshot::new();
    dom.apply(engine.attach(0.0, ScrollMetrics::at(600.0, 4000.0, 800.0)));
    (engine, dom)
}

fn click(el: u32) -> UiEvent {
    UiEvent::Click {
        element: ElementId(el),
    }
}

fn key(k: Key, el: Option<u32>) -> UiEvent {
    UiEvent::KeyDown {
        key: k,
        element: el.map(ElementId),
    }
}

fn assert_closed(dom: &DomSnapshot) {
    assert_eq!(dom.attribute(HAMBURGER, "aria-expanded"), Some("false"));
    assert!(!dom.has_class(HAMBURGER, "active"));
    assert!(!dom.has_class(DRAWER, "open"));
    assert!(!dom.has_class(BACKDROP, "visible"));
    assert!(!dom.has_class(Target::Body, "drawer-open"));
}

#[test]
fn hamburger_toggles_drawer() {
    let (mut engine, mut dom) = engine();
    dom.apply(engine.dispatch(10.0, click(0)));
    assert_eq!(engine.drawer_state(), DrawerState::Open);
    assert_eq!(dom.attribute(HAMBURGER, "aria-expanded"), Some("true"));
    assert!(dom.has_class(DRAWER, "open"));
    assert!(dom.has_class(BACKDROP, "visible"));
    assert!(dom.has_class(Target::Body, "drawer-open"));

    dom.apply(engine.dispatch(20.0, click(0)));
    assert_eq!(engine.drawer_state(), DrawerState::Closed);
    assert_closed(&dom);
}

#[test]
fn backdrop_and_escape_close() {
    let (mut engine, mut dom) = engine();
    engine.dispatch(10.0, click(0));
    dom.apply(engine.dispatch(20.0, click(2)));
    assert_closed(&dom);

    engine.dispatch(30.0, click(0));
    dom.apply(engine.dispatch(40.0, key(Key::Escape, None)));
    assert_eq!(engine.drawer_state(), DrawerState::Closed);
    assert_closed(&dom);
}

#[test]
fn escape_while_closed_is_a_no_op() {
    let (mut engine, _) = engine();
    let out = engine.dispatch(10.0, key(Key::Escape, None));
    assert!(out.patches_for(HAMBURGER).next().is_none());
}

#[test]
fn desktop_resize_closes_open_drawer() {
    let (mut engine, mut dom) = engine();
    engine.dispatch(10.0, click(0));

    dom.apply(engine.dispatch(20.0, UiEvent::Resize { width: 600.0 }));
    assert_eq!(engine.drawer_state(), DrawerState::Open);

    dom.apply(engine.dispatch(30.0, UiEvent::Resize { width: 768.0 }));
    assert_eq!(engine.drawer_state(), DrawerState::Closed);
    assert_eq!(dom.attribute(HAMBURGER, "aria-expanded"), Some("false"));

    let out = engine.dispatch(40.0, UiEvent::Resize { width: 1280.0 });
    assert!(out.patches.is_empty());
}

#[test]
fn drawer_link_closes_then_scrolls_after_delay() {
    let (mut engine, mut dom) = engine();
    engine.dispatch(1000.0, click(0));

    let out = engine.dispatch(1100.0, click(3));
    assert!(out.default_prevented);
    assert!(out.commands.is_empty());
    assert_eq!(out.next_deadline, Some(1400.0));
    dom.apply(out);
    assert_closed(&dom);

    assert!(engine.advance(1399.0).commands.is_empty());
    let out = engine.advance(1400.0);
    assert_eq!(
        out.commands,
        vec![HostCommand::ScrollIntoView {
            element: ElementId(81)
        }]
    );
}

#[test]
fn drawer_link_to_missing_target_only_closes() {
    let (mut engine, _) = engine();
    engine.dispatch(1000.0, click(0));
    let out = engine.dispatch(1100.0, click(6));
    assert!(out.default_prevented);
    assert_eq!(out.next_deadline, None);
    assert_eq!(engine.drawer_state(), DrawerState::Closed);
}

#[test]
fn faq_headers_become_buttons() {
    let (_, dom) = engine();
    for header in [61, 63] {
        assert_eq!(dom.attribute(ElementId(header), "role"), Some("button"));
        assert_eq!(dom.attribute(ElementId(header), "tabindex"), Some("0"));
        assert_eq!(dom.attribute(ElementId(header), "aria-expanded"), Some("false"));
    }
}

#[test]
fn faq_items_open_independently() {
    let (mut engine, mut dom) = engine();
    dom.apply(engine.dispatch(10.0, click(61)));
    dom.apply(engine.dispatch(20.0, click(63)));
    assert!(engine.is_faq_open(ElementId(60)));
    assert!(engine.is_faq_open(ElementId(62)));
    assert!(dom.has_class(ElementId(60), "open"));
    assert!(dom.has_class(ElementId(62), "open"));

    dom.apply(engine.dispatch(30.0, click(61)));
    assert!(!engine.is_faq_open(ElementId(60)));
    assert!(engine.is_faq_open(ElementId(62)));
    assert_eq!(dom.attribute(ElementId(61), "aria-expanded"), Some("false"));
    assert_eq!(dom.attribute(ElementId(63), "aria-expanded"), Some("true"));
}

#[test]
fn enter_and_space_activate_focused_header() {
    let (mut engine, _) = engine();
    let out = engine.dispatch(10.0, key(Key::Enter, Some(61)));
    assert!(out.default_prevented);
    assert!(engine.is_faq_open(ElementId(60)));

    let out = engine.dispatch(20.0, key(Key::from_dom(" "), Some(61)));
    assert!(out.default_prevented);
    assert!(!engine.is_faq_open(ElementId(60)));

    let out = engine.dispatch(30.0, key(Key::from_dom("a"), Some(61)));
    assert!(!out.default_prevented);
    let out = engine.dispatch(40.0, key(Key::Enter, Some(3)));
    assert!(!out.default_prevented);
}

#[test]
fn events_are_ignored_while_detached() {
    let page: PageModel = pages::load("landing").unwrap();
    let mut engine = Engine::new(Config::default(), page).unwrap();
    let out = engine.dispatch(0.0, click(0));
    assert!(out.patches.is_empty());
    assert_eq!(engine.drawer_state(), DrawerState::Closed);
}
