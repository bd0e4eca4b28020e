//! Stat-number parsing and formatting.
//!
//! - parse_stat_text: literal markup text → StatTarget (ANIMATED or STATIC)
//! - format_stat_value: integral targets render with no decimals, fractional
//!   targets with exactly one
//! - wrap_ltr: prefix numerals with LEFT-TO-RIGHT MARK so they keep their
//!   order inside right-to-left text
//! - ease_out_cubic: 1 - (1 - t)^3

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ids::ElementId;

/// U+200E LEFT-TO-RIGHT MARK
pub const LRM: char = '\u{200E}';

static ANIMATED_STAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+(?:\.[0-9]+)?)(%.*)?$").expect("stat pattern is valid"));

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatKind {
    Animated { value: f64, suffix: String },
    /// Rendered verbatim ("24/7", "2-4", ...).
    Static,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatTarget {
    pub element: ElementId,
    /// Normalised literal: markers stripped, whitespace trimmed.
    pub literal: String,
    #[serde(flatten)]
    pub kind: StatKind,
}

impl StatTarget {
    pub fn is_animated(&self) -> bool {
        matches!(self.kind, StatKind::Animated { .. })
    }

    /// Text shown once the counter has finished.
    pub fn final_text(&self) -> String {
        match &self.kind {
            StatKind::Animated { value, suffix } => format_stat_value(*value, *value, suffix),
            StatKind::Static => self.literal.clone(),
        }
    }
}

/// Normalise markup text: drop any LRM a previous render left, then trim.
pub fn normalize_literal(raw: &str) -> String {
    raw.chars().filter(|c| *c != LRM).collect::<String>().trim().to_string()
}

/// Derive a StatTarget from literal text. Deterministic: the same text (or the
/// same text after it has been rendered with `wrap_ltr`) always yields the
/// same target.
pub fn parse_stat_text(element: ElementId, raw: &str) -> StatTarget {
    let literal = normalize_literal(raw);
    let kind = ANIMATED_STAT
        .captures(&literal)
        .and_then(|caps| {
            let value = caps
                .get(1)?
                .as_str()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())?;
            let suffix = caps.get(2).map(|m| m.as_str()).unwrap_or("").to_string();
            Some(StatKind::Animated { value, suffix })
        })
        .unwrap_or(StatKind::Static);
    StatTarget {
        element,
        literal,
        kind,
    }
}

pub fn is_integral(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

/// Render `current` using the precision implied by `target`.
pub fn format_stat_value(current: f64, target: f64, suffix: &str) -> String {
    if is_integral(target) {
        format!("{}{}", current.round() as i64, suffix)
    } else {
        format!("{current:.1}{suffix}")
    }
}

pub fn wrap_ltr(text: &str) -> String {
    let mut s = String::with_capacity(text.len() + LRM.len_utf8());
    s.push(LRM);
    s.push_str(text);
    s
}

#[inline]
pub fn ease_out_cubic(t: f64) -> f64 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}
