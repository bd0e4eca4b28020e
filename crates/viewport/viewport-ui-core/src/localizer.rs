//! Applies a language to the document in one pass.

use crate::ids::ElementId;
use crate::locale::Language;
use crate::outputs::{Outputs, Target};
use crate::page::{TextChannel, Translatable};

/// Class on `<body>` while English is active.
pub const ENGLISH_BODY_CLASS: &str = "en";

#[derive(Debug, Clone, Default)]
pub struct ContentLocalizer {
    lang_toggle: Option<ElementId>,
    translatables: Vec<Translatable>,
    icons: Vec<ElementId>,
}

impl ContentLocalizer {
    pub fn new(
        lang_toggle: Option<ElementId>,
        translatables: Vec<Translatable>,
        icons: Vec<ElementId>,
    ) -> Self {
        Self {
            lang_toggle,
            translatables,
            icons,
        }
    }

    /// Emit every patch needed to show `lang`. Nodes lacking text for `lang`
    /// keep whatever they show now.
    pub fn apply(&self, lang: Language, out: &mut Outputs) {
        out.set_attribute(Target::Document, "lang", lang.tag());
        out.set_attribute(Target::Document, "dir", lang.direction().as_str());
        match lang {
            Language::English => out.add_class(Target::Body, ENGLISH_BODY_CLASS),
            Language::Hebrew => out.remove_class(Target::Body, ENGLISH_BODY_CLASS),
        }
        if let Some(btn) = self.lang_toggle {
            out.set_text(btn, lang.switch_label());
        }

        for t in &self.translatables {
            let text = match lang {
                Language::Hebrew => t.he.as_deref(),
                Language::English => t.en.as_deref(),
            };
            let Some(text) = text else {
                log::debug!("element {:?} has no {} text, left unchanged", t.element, lang.tag());
                continue;
            };
            match t.channel {
                TextChannel::Placeholder => out.set_placeholder(t.element, text),
                TextChannel::Content => out.set_html(t.element, text),
            }
        }

        for icon in &self.icons {
            out.set_attribute(*icon, "href", lang.arrow_icon());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outputs::DomPatch;

    fn tr(id: u32, he: Option<&str>, en: Option<&str>, channel: TextChannel) -> Translatable {
        Translatable {
            element: ElementId(id),
            he: he.map(str::to_string),
            en: en.map(str::to_string),
            channel,
        }
    }

    #[test]
    fn placeholder_channel_for_inputs() {
        let loc = ContentLocalizer::new(
            None,
            vec![tr(1, Some("שם"), Some("Name"), TextChannel::Placeholder)],
            vec![],
        );
        let mut out = Outputs::default();
        loc.apply(Language::English, &mut out);
        assert!(out.patches.contains(&DomPatch::SetPlaceholder {
            target: Target::Element(ElementId(1)),
            text: "Name".into(),
        }));
    }

    #[test]
    fn missing_attribute_leaves_node_alone() {
        let loc = ContentLocalizer::new(
            Some(ElementId(9)),
            vec![tr(1, Some("שלום"), None, TextChannel::Content)],
            vec![ElementId(4)],
        );
        let mut out = Outputs::default();
        loc.apply(Language::English, &mut out);
        assert_eq!(out.patches_for(ElementId(1)).count(), 0);
        assert!(out.patches.contains(&DomPatch::SetText {
            target: Target::Element(ElementId(9)),
            text: "עב".into(),
        }));
        assert!(out.patches.contains(&DomPatch::SetAttribute {
            target: Target::Element(ElementId(4)),
            name: "href".into(),
            value: "icons.svg#icon-arrow-right".into(),
        }));
    }
}
