//! The markup contract, expressed as data.
//!
//! A host scans its document once and describes every node the engine binds
//! to. Optional regions are empty collections; only the drawer trio is required.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::ElementId;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageModel {
    pub hamburger: ElementId,
    pub drawer: ElementId,
    pub backdrop: ElementId,
    #[serde(default)]
    pub drawer_links: Vec<Link>,
    #[serde(default)]
    pub lang_toggle: Option<ElementId>,
    #[serde(default)]
    pub translatables: Vec<Translatable>,
    /// `<use>` nodes inside buttons whose arrow follows the text direction.
    #[serde(default)]
    pub direction_icons: Vec<ElementId>,
    #[serde(default)]
    pub reveal_targets: Vec<ElementId>,
    #[serde(default)]
    pub stats: Option<StatsGroup>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub tabs: Vec<NavTab>,
    #[serde(default)]
    pub faq_items: Vec<FaqItem>,
    /// In-page `#fragment` links outside the bottom navigation and the drawer.
    #[serde(default)]
    pub anchors: Vec<Link>,
    #[serde(default)]
    pub cta_buttons: Vec<CtaButton>,
    /// Fragment id (without `#`) to node.
    #[serde(default)]
    pub anchor_targets: BTreeMap<String, ElementId>,
}

impl PageModel {
    /// Minimal page: just the mobile navigation trio.
    pub fn with_drawer(hamburger: ElementId, drawer: ElementId, backdrop: ElementId) -> Self {
        Self {
            hamburger,
            drawer,
            backdrop,
            drawer_links: Vec::new(),
            lang_toggle: None,
            translatables: Vec::new(),
            direction_icons: Vec::new(),
            reveal_targets: Vec::new(),
            stats: None,
            sections: Vec::new(),
            tabs: Vec::new(),
            faq_items: Vec::new(),
            anchors: Vec::new(),
            cta_buttons: Vec::new(),
            anchor_targets: BTreeMap::new(),
        }
    }

    /// Resolve an `href` of the form `#id`. Sections resolve by name as well.
    pub fn resolve_fragment(&self, href: &str) -> Option<ElementId> {
        let id = href.strip_prefix('#').filter(|id| !id.is_empty())?;
        self.anchor_targets.get(id).copied().or_else(|| {
            self.sections
                .iter()
                .find(|s| s.name == id)
                .map(|s| s.element)
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub element: ElementId,
    pub href: String,
}

/// How a translatable node displays its text.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextChannel {
    /// Inner HTML of the node.
    #[default]
    Content,
    /// `placeholder` of an input or textarea.
    Placeholder,
}

/// Node carrying `data-he` / `data-en`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Translatable {
    pub element: ElementId,
    #[serde(default)]
    pub he: Option<String>,
    #[serde(default)]
    pub en: Option<String>,
    #[serde(default)]
    pub channel: TextChannel,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatsGroup {
    /// Observed row; crossing its threshold starts every counter.
    pub container: ElementId,
    #[serde(default)]
    pub items: Vec<ElementId>,
    #[serde(default)]
    pub numbers: Vec<StatNumber>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatNumber {
    pub element: ElementId,
    /// Literal text as authored in the markup.
    pub text: String,
}

/// Sentinel for one navigation section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub element: ElementId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavTab {
    pub element: ElementId,
    /// `data-section`
    pub section: String,
    pub href: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaqItem {
    pub element: ElementId,
    #[serde(default)]
    pub header: Option<ElementId>,
    #[serde(default)]
    pub question: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CtaButton {
    pub element: ElementId,
    pub label: String,
}
