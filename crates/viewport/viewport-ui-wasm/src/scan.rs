//! One-time scan of the document into a `PageModel`.
//!
//! Selectors follow the landing page markup: `.nav-hamburger`, `#mobileDrawer`,
//! `#drawerBackdrop`, `[data-he]`, `.stats-row`, `.bottom-nav-tab`,
//! `.faq-item`, ... Anything optional that is missing simply leaves its part of
//! the model empty.

use std::collections::BTreeMap;

use viewport_ui_core::{
    config::SectionsCfg, CtaButton, ElementId, FaqItem, Link, NavTab, PageModel, Section,
    StatNumber, StatsGroup, TextChannel, Translatable,
};
use wasm_bindgen::{JsCast, JsError, JsValue};
use web_sys::{Document, Element, Node, NodeList};

use crate::nodes::NodeTable;

const HAMBURGER: &str = ".nav-hamburger";
const DRAWER_ID: &str = "mobileDrawer";
const BACKDROP_ID: &str = "drawerBackdrop";
const LANG_TOGGLE: &str = ".lang-toggle";
const TRANSLATABLE: &str = "[data-he]";
const DIRECTION_ICONS: &str = ".btn-icon use";
const REVEAL: &str = ".service-card, .timeline-item, .faq-item";
const STATS_ROW: &str = ".stats-row";
const STAT_ITEM: &str = ".stat-item";
const STAT_NUMBER: &str = ".stat-number";
const BOTTOM_NAV: &str = ".bottom-nav";
const NAV_TAB: &str = ".bottom-nav-tab";
const FAQ_ITEM: &str = ".faq-item";
const FAQ_HEADER: &str = "h3";
const FRAGMENT_LINK: &str = "a[href^=\"#\"]";
const CTA: &str = ".btn-primary, .btn-secondary, .contact-btn";

fn elements(list: Result<NodeList, JsValue>, selector: &str) -> Result<Vec<Element>, JsError> {
    let list = list.map_err(|e| JsError::new(&format!("bad selector {selector}: {e:?}")))?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
        .collect())
}

fn all(doc: &Document, selector: &str) -> Result<Vec<Element>, JsError> {
    elements(doc.query_selector_all(selector), selector)
}

fn within(root: &Element, selector: &str) -> Result<Vec<Element>, JsError> {
    elements(root.query_selector_all(selector), selector)
}

fn text_of(el: &Element) -> String {
    el.text_content().unwrap_or_default().trim().to_string()
}

fn required(found: Option<Element>, what: &str) -> Result<Element, JsError> {
    found.ok_or_else(|| JsError::new(&format!("page is missing {what}")))
}

/// Scan `doc`, registering every bound node in `nodes`.
pub fn scan_page(
    doc: &Document,
    sections_cfg: &SectionsCfg,
    nodes: &mut NodeTable,
) -> Result<PageModel, JsError> {
    let q = |sel: &str| doc.query_selector(sel).ok().flatten();

    let hamburger = required(q(HAMBURGER), HAMBURGER)?;
    let drawer = required(doc.get_element_by_id(DRAWER_ID), "#mobileDrawer")?;
    let backdrop = required(doc.get_element_by_id(BACKDROP_ID), "#drawerBackdrop")?;
    let mut page = PageModel::with_drawer(
        nodes.id_of(&hamburger),
        nodes.id_of(&drawer),
        nodes.id_of(&backdrop),
    );

    let mut fragments = Vec::new();
    for a in within(&drawer, "a")? {
        let href = a.get_attribute("href").unwrap_or_default();
        fragments.push(href.clone());
        page.drawer_links.push(Link {
            element: nodes.id_of(&a),
            href,
        });
    }

    page.lang_toggle = q(LANG_TOGGLE).map(|el| nodes.id_of(&el));

    for el in all(doc, TRANSLATABLE)? {
        let channel = match el.tag_name().as_str() {
            "INPUT" | "TEXTAREA" => TextChannel::Placeholder,
            _ => TextChannel::Content,
        };
        page.translatables.push(Translatable {
            element: nodes.id_of(&el),
            he: el.get_attribute("data-he"),
            en: el.get_attribute("data-en"),
            channel,
        });
    }

    page.direction_icons = all(doc, DIRECTION_ICONS)?
        .iter()
        .map(|el| nodes.id_of(el))
        .collect();
    page.reveal_targets = all(doc, REVEAL)?.iter().map(|el| nodes.id_of(el)).collect();

    if let Some(row) = q(STATS_ROW) {
        page.stats = Some(StatsGroup {
            container: nodes.id_of(&row),
            items: all(doc, STAT_ITEM)?.iter().map(|el| nodes.id_of(el)).collect(),
            numbers: all(doc, STAT_NUMBER)?
                .iter()
                .map(|el| StatNumber {
                    element: nodes.id_of(el),
                    text: el.text_content().unwrap_or_default(),
                })
                .collect(),
        });
    }

    for name in &sections_cfg.ids {
        if let Some(el) = doc.get_element_by_id(name) {
            page.sections.push(Section {
                element: nodes.id_of(&el),
                name: name.clone(),
            });
        }
    }

    if let Some(nav) = q(BOTTOM_NAV) {
        for tab in within(&nav, NAV_TAB)? {
            let href = tab.get_attribute("href").unwrap_or_default();
            fragments.push(href.clone());
            page.tabs.push(NavTab {
                element: nodes.id_of(&tab),
                section: tab.get_attribute("data-section").unwrap_or_default(),
                href,
            });
        }
    }

    for item in all(doc, FAQ_ITEM)? {
        let header = item.query_selector(FAQ_HEADER).ok().flatten();
        page.faq_items.push(FaqItem {
            element: nodes.id_of(&item),
            question: header.as_ref().map(text_of).unwrap_or_default(),
            header: header.map(|h| nodes.id_of(&h)),
        });
    }

    // Drawer links and bottom-nav tabs have their own handling.
    for a in all(doc, FRAGMENT_LINK)? {
        let in_nav = a.closest(BOTTOM_NAV).ok().flatten().is_some();
        let node: &Node = a.as_ref();
        if in_nav || drawer.contains(Some(node)) {
            continue;
        }
        let href = a.get_attribute("href").unwrap_or_default();
        fragments.push(href.clone());
        page.anchors.push(Link {
            element: nodes.id_of(&a),
            href,
        });
    }

    for btn in all(doc, CTA)? {
        page.cta_buttons.push(CtaButton {
            element: nodes.id_of(&btn),
            label: text_of(&btn),
        });
    }

    let mut targets = BTreeMap::new();
    for href in fragments {
        let Some(id) = href.strip_prefix('#').filter(|id| !id.is_empty()) else {
            continue;
        };
        if let Some(el) = doc.get_element_by_id(id) {
            targets.insert(id.to_string(), nodes.id_of(&el));
        }
    }
    page.anchor_targets = targets;

    log::info!(
        "scanned page: {} nodes, {} translatable, {} reveal, {} tabs, {} faq",
        nodes.len(),
        page.translatables.len(),
        page.reveal_targets.len(),
        page.tabs.len(),
        page.faq_items.len()
    );
    Ok(page)
}

/// Nodes that need a click listener, each listed once.
pub fn clickable(page: &PageModel) -> Vec<ElementId> {
    let mut ids = vec![page.hamburger, page.backdrop];
    ids.extend(page.drawer_links.iter().map(|l| l.element));
    ids.extend(page.tabs.iter().map(|t| t.element));
    for item in &page.faq_items {
        ids.push(item.element);
        ids.extend(item.header);
    }
    ids.extend(page.anchors.iter().map(|l| l.element));
    ids.extend(page.cta_buttons.iter().map(|c| c.element));
    ids.sort();
    ids.dedup();
    ids
}
