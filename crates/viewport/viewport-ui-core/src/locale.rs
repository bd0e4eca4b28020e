//! Active language and its direction.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// Primary language; the markup is authored in it.
    Hebrew,
    English,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDirection {
    Rtl,
    Ltr,
}

impl TextDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            TextDirection::Rtl => "rtl",
            TextDirection::Ltr => "ltr",
        }
    }
}

impl Language {
    pub fn toggled(self) -> Language {
        match self {
            Language::Hebrew => Language::English,
            Language::English => Language::Hebrew,
        }
    }

    pub fn direction(self) -> TextDirection {
        match self {
            Language::Hebrew => TextDirection::Rtl,
            Language::English => TextDirection::Ltr,
        }
    }

    /// BCP 47 tag for `<html lang>`.
    pub fn tag(self) -> &'static str {
        match self {
            Language::Hebrew => "he",
            Language::English => "en",
        }
    }

    /// Label of the switch control, which names the *other* language.
    pub fn switch_label(self) -> &'static str {
        match self {
            Language::Hebrew => "EN",
            Language::English => "עב",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::Hebrew => "Hebrew",
            Language::English => "English",
        }
    }

    /// Arrow glyph pointing "forward" in this language's reading direction.
    pub fn arrow_icon(self) -> &'static str {
        match self {
            Language::Hebrew => "icons.svg#icon-arrow-left",
            Language::English => "icons.svg#icon-arrow-right",
        }
    }
}

/// Owner of the language flag. `toggle` is its only writer.
#[derive(Debug, Clone)]
pub struct LocaleStore {
    current: Language,
}

impl LocaleStore {
    pub fn new(initial: Language) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> Language {
        self.current
    }

    pub fn toggle(&mut self) -> Language {
        self.current = self.current.toggled();
        self.current
    }
}
