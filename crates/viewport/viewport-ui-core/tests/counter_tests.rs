use viewport_ui_core::{
    config::Config, format_stat_value, parse_stat_text, wrap_ltr, DomSnapshot, ElementId, Engine,
    IntersectionEntry, PageModel, ScrollMetrics, StatKind, UiEvent, WatcherId,
};
use viewport_ui_fixtures::pages;

const ROW: ElementId = ElementId(50);

fn engine() -> (Engine, DomSnapshot) {
    let page: PageModel = pages::load("landing").unwrap();
    let mut engine = Engine::new(Config::default(), page).unwrap();
    let mut dom = DomSnapshot::new();
    dom.apply(engine.attach(0.0, ScrollMetrics::at(0.0, 4000.0, 800.0)));
    (engine, dom)
}

fn row_enters(ratio: f64) -> UiEvent {
    UiEvent::Intersections {
        watcher: WatcherId::Stats,
        entries: vec![IntersectionEntry::entering(ROW, ratio)],
    }
}

fn row_leaves() -> UiEvent {
    UiEvent::Intersections {
        watcher: WatcherId::Stats,
        entries: vec![IntersectionEntry::leaving(ROW)],
    }
}

#[test]
fn targets_parse_from_markup() {
    let (engine, _) = engine();
    let kinds: Vec<_> = engine
        .counters()
        .targets()
        .iter()
        .map(|t| t.is_animated())
        .collect();
    assert_eq!(kinds, vec![true, false, true, false]);
    assert_eq!(
        engine.counters().targets()[0].kind,
        StatKind::Animated {
            value: 70.0,
            suffix: "%".into()
        }
    );
}

#[test]
fn below_threshold_does_not_start() {
    let (mut engine, _) = engine();
    let out = engine.dispatch(50.0, row_enters(0.2));
    assert!(out.patches.is_empty());
    assert_eq!(out.next_deadline, Some(100.0));
    assert!(!engine.counters().has_animated());
}

#[test]
fn full_run_ends_on_literal_values() {
    let (mut engine, mut dom) = engine();
    let out = engine.dispatch(1000.0, row_enters(0.35));
    assert_eq!(out.next_deadline, Some(1000.0));
    dom.apply(out);
    for item in [51, 52, 53, 58] {
        assert!(dom.has_class(ElementId(item), "visible"));
    }

    let mut now = 1000.0;
    while now <= 3200.0 {
        dom.apply(engine.advance(now));
        now += 50.0;
    }

    assert_eq!(dom.content(ElementId(54)), Some(wrap_ltr("70%").as_str()));
    assert_eq!(dom.content(ElementId(55)), Some(wrap_ltr("24/7").as_str()));
    assert_eq!(dom.content(ElementId(56)), Some(wrap_ltr("2.5").as_str()));
    assert_eq!(dom.content(ElementId(57)), Some(wrap_ltr("2-4").as_str()));
    for id in 54..=57 {
        assert!(!dom.has_class(ElementId(id), "counting"), "pulse left on {id}");
    }
    assert!(!engine.counters().has_active_runs());
    assert_eq!(engine.pending_timers(), 0);
}

#[test]
fn detach_mid_cascade_settles_on_final_values() {
    let (mut engine, mut dom) = engine();
    dom.apply(engine.dispatch(1000.0, row_enters(0.5)));
    for now in [1000.0, 1150.0, 1300.0] {
        dom.apply(engine.advance(now));
    }
    assert!(dom.has_class(ElementId(55), "counting"));
    assert!(engine.counters().started_at(3).is_none());

    dom.apply(engine.detach());
    dom.apply(engine.attach(2000.0, ScrollMetrics::at(0.0, 4000.0, 800.0)));
    dom.apply(engine.dispatch(2050.0, row_enters(0.5)));
    let mut now = 2050.0;
    while now <= 6000.0 {
        dom.apply(engine.advance(now));
        now += 50.0;
    }

    assert_eq!(dom.content(ElementId(54)), Some(wrap_ltr("70%").as_str()));
    assert_eq!(dom.content(ElementId(55)), Some(wrap_ltr("24/7").as_str()));
    assert_eq!(dom.content(ElementId(56)), Some(wrap_ltr("2.5").as_str()));
    assert_eq!(dom.content(ElementId(57)), Some(wrap_ltr("2-4").as_str()));
    for id in 54..=57 {
        assert!(!dom.has_class(ElementId(id), "counting"), "pulse left on {id}");
    }
    assert!(!engine.counters().has_active_runs());
    assert_eq!(engine.pending_timers(), 0);
}

#[test]
fn starts_are_staggered() {
    let (mut engine, _) = engine();
    engine.dispatch(1000.0, row_enters(0.5));
    for now in [1000.0, 1150.0, 1300.0, 1450.0] {
        engine.advance(now);
    }
    let c = engine.counters();
    assert_eq!(c.triggered_at(), Some(1000.0));
    assert_eq!(c.started_at(0), Some(1000.0));
    assert_eq!(c.started_at(1).unwrap() - c.started_at(0).unwrap(), 150.0);
    assert_eq!(c.started_at(3), Some(1450.0));
}

#[test]
fn late_wakeup_keeps_stagger_deadlines() {
    let (mut engine, _) = engine();
    engine.dispatch(1000.0, row_enters(0.5));
    // Host was throttled; first wake-up is well past every deadline.
    engine.advance(1600.0);
    let c = engine.counters();
    assert_eq!(c.started_at(0), Some(1000.0));
    assert_eq!(c.started_at(1), Some(1150.0));
    assert_eq!(c.started_at(2), Some(1300.0));
}

#[test]
fn midway_frame_uses_eased_value() {
    let (mut engine, _) = engine();
    engine.dispatch(0.0, row_enters(0.5));
    engine.advance(0.0);
    let out = engine.advance(750.0);
    let texts: Vec<_> = out
        .patches_for(ElementId(54))
        .filter_map(|p| match p {
            viewport_ui_core::DomPatch::SetText { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec![wrap_ltr("61%")]);
    assert!(out.wants_frame);
}

#[test]
fn latch_fires_once_across_reentries() {
    let (mut engine, _) = engine();
    engine.dispatch(1000.0, row_enters(0.5));
    for now in [1000.0, 1150.0, 1300.0, 1450.0, 3000.0, 3300.0] {
        engine.advance(now);
    }
    assert_eq!(engine.pending_timers(), 0);

    engine.dispatch(4000.0, row_leaves());
    let out = engine.dispatch(5000.0, row_enters(0.9));
    assert!(out.patches.is_empty());
    assert_eq!(out.next_deadline, None);
    assert_eq!(engine.counters().triggered_at(), Some(1000.0));
}

#[test]
fn static_target_pulses_for_300ms() {
    let (mut engine, mut dom) = engine();
    engine.dispatch(1000.0, row_enters(0.5));
    dom.apply(engine.advance(1000.0));
    dom.apply(engine.advance(1150.0));
    assert!(dom.has_class(ElementId(55), "counting"));
    dom.apply(engine.advance(1449.0));
    assert!(dom.has_class(ElementId(55), "counting"));
    dom.apply(engine.advance(1450.0));
    assert!(!dom.has_class(ElementId(55), "counting"));
}

#[test]
fn rendered_text_reparses_to_same_target() {
    let shown = wrap_ltr(&format_stat_value(70.0, 70.0, "%"));
    assert_eq!(parse_stat_text(ElementId(1), &shown), parse_stat_text(ElementId(1), "70%"));
    assert_eq!(parse_stat_text(ElementId(1), " 2.5 ").literal, "2.5");
}

#[test]
fn formatting_precision_follows_target() {
    assert_eq!(format_stat_value(34.6, 70.0, "%"), "35%");
    assert_eq!(format_stat_value(1.234, 2.5, ""), "1.2");
    assert_eq!(format_stat_value(2.5, 2.5, "x"), "2.5x");
    assert_eq!(format_stat_value(0.0, 100.0, "%+"), "0%+");
}

#[test]
fn page_without_stats_stays_idle() {
    let page: PageModel = pages::load("minimal").unwrap();
    let mut engine = Engine::new(Config::default(), page).unwrap();
    let out = engine.attach(0.0, ScrollMetrics::default());
    assert!(out.commands.is_empty());
    assert!(engine.counters().targets().is_empty());
}
