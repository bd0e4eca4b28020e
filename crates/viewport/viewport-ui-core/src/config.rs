//! Engine configuration.
//!
//! Every field has a default matching the landing page the engine was built
//! for, so hosts usually pass an empty object and override a handful of values.
//! The reveal and stats observers keep their own threshold/margin pairs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ids::WatcherId;
use crate::locale::Language;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: LocaleCfg,
    pub reveal: ObserverOptions,
    pub stats: ObserverOptions,
    pub counter: CounterCfg,
    pub sections: SectionsCfg,
    pub drawer: DrawerCfg,
    pub scroll_depth: ScrollDepthCfg,
    pub analytics: AnalyticsCfg,
}

/// Options forwarded to the host's intersection observer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: String,
}

impl ObserverOptions {
    pub fn new(threshold: f64, root_margin: &str) -> Self {
        Self {
            threshold,
            root_margin: root_margin.to_string(),
        }
    }

    fn validate(&self, observer: &'static str) -> Result<RootMargin, ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::InvalidThreshold {
                observer,
                value: self.threshold,
            });
        }
        RootMargin::parse(&self.root_margin).map_err(|reason| ConfigError::InvalidRootMargin {
            observer,
            margin: self.root_margin.clone(),
            reason,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: LocaleCfg::default(),
            reveal: ObserverOptions::new(0.1, "0px 0px -50px 0px"),
            stats: ObserverOptions::new(0.3, "0px"),
            counter: CounterCfg::default(),
            sections: SectionsCfg::default(),
            drawer: DrawerCfg::default(),
            scroll_depth: ScrollDepthCfg::default(),
            analytics: AnalyticsCfg::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleCfg {
    /// Language the markup is authored in.
    pub initial: Language,
}

impl Default for LocaleCfg {
    fn default() -> Self {
        Self {
            initial: Language::Hebrew,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterCfg {
    pub duration_ms: f64,
    pub stagger_ms: f64,
    pub pulse_ms: f64,
}

impl Default for CounterCfg {
    fn default() -> Self {
        Self {
            duration_ms: 1500.0,
            stagger_ms: 150.0,
            pulse_ms: 300.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionsCfg {
    pub threshold: f64,
    pub root_margin: String,
    /// Section ids in navigation order; the first one is the "home" section.
    pub ids: Vec<String>,
    pub initial_check_delay_ms: f64,
    /// Scroll offsets below this count as "at the top" for the initial check.
    pub top_offset_px: f64,
}

impl SectionsCfg {
    pub fn observer(&self) -> ObserverOptions {
        ObserverOptions::new(self.threshold, &self.root_margin)
    }

    pub fn home(&self) -> &str {
        self.ids.first().map(String::as_str).unwrap_or("hero")
    }
}

impl Default for SectionsCfg {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            root_margin: "-20% 0px -60% 0px".to_string(),
            ids: ["hero", "services", "proof", "contact"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            initial_check_delay_ms: 100.0,
            top_offset_px: 100.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawerCfg {
    pub desktop_breakpoint_px: f64,
    /// Delay between closing the drawer and scrolling to a link target.
    pub scroll_delay_ms: f64,
}

impl Default for DrawerCfg {
    fn default() -> Self {
        Self {
            desktop_breakpoint_px: 768.0,
            scroll_delay_ms: 300.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollDepthCfg {
    pub marks: Vec<u32>,
}

impl Default for ScrollDepthCfg {
    fn default() -> Self {
        Self {
            marks: vec![25, 50, 75, 100],
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsCfg {
    pub label_max_chars: usize,
}

impl Default for AnalyticsCfg {
    fn default() -> Self {
        Self {
            label_max_chars: 50,
        }
    }
}

impl Config {
    /// Parse a JSON config; missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Config =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Observer options the host should use for `watcher`.
    pub fn observer(&self, watcher: WatcherId) -> ObserverOptions {
        match watcher {
            WatcherId::Reveal => self.reveal.clone(),
            WatcherId::Stats => self.stats.clone(),
            WatcherId::Sections => self.sections.observer(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.reveal.validate("reveal")?;
        self.stats.validate("stats")?;
        self.sections.observer().validate("sections")?;
        let duration = self.counter.duration_ms;
        if duration.is_nan() || duration <= 0.0 {
            return Err(ConfigError::ZeroDuration);
        }
        let marks = &self.scroll_depth.marks;
        let in_range = marks.iter().all(|m| (1..=100).contains(m));
        let increasing = marks.windows(2).all(|w| w[0] < w[1]);
        if !in_range || !increasing {
            return Err(ConfigError::InvalidScrollMarks {
                marks: marks.clone(),
            });
        }
        Ok(())
    }
}

/// One CSS length of a root margin.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Length {
    Px(f64),
    Percent(f64),
}

impl Length {
    fn parse(token: &str) -> Result<Length, String> {
        let (num, ctor): (&str, fn(f64) -> Length) = if let Some(n) = token.strip_suffix("px") {
            (n, Length::Px)
        } else if let Some(n) = token.strip_suffix('%') {
            (n, Length::Percent)
        } else if token == "0" {
            return Ok(Length::Px(0.0));
        } else {
            return Err(format!("'{token}' must end in px or %"));
        };
        num.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(ctor)
            .ok_or_else(|| format!("'{token}' is not a number"))
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(v) => write!(f, "{v}px"),
            Length::Percent(v) => write!(f, "{v}%"),
        }
    }
}

/// Parsed `rootMargin` in CSS shorthand order (top, right, bottom, left).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RootMargin {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl RootMargin {
    pub fn parse(s: &str) -> Result<RootMargin, String> {
        let parts = s
            .split_whitespace()
            .map(Length::parse)
            .collect::<Result<Vec<_>, _>>()?;
        match parts.as_slice() {
            [all] => Ok(RootMargin {
                top: *all,
                right: *all,
                bottom: *all,
                left: *all,
            }),
            [v, h] => Ok(RootMargin {
                top: *v,
                right: *h,
                bottom: *v,
                left: *h,
            }),
            [t, h, b] => Ok(RootMargin {
                top: *t,
                right: *h,
                bottom: *b,
                left: *h,
            }),
            [t, r, b, l] => Ok(RootMargin {
                top: *t,
                right: *r,
                bottom: *b,
                left: *l,
            }),
            _ => Err(format!("expected 1 to 4 lengths, got {}", parts.len())),
        }
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_reveal_and_stats_apart() {
        let cfg = Config::default();
        assert_eq!(cfg.reveal, ObserverOptions::new(0.1, "0px 0px -50px 0px"));
        assert_eq!(cfg.stats, ObserverOptions::new(0.3, "0px"));
        assert_eq!(cfg.sections.root_margin, "-20% 0px -60% 0px");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = Config::from_json(r#"{ "counter": { "stagger_ms": 200 } }"#).unwrap();
        assert_eq!(cfg.counter.stagger_ms, 200.0);
        assert_eq!(cfg.counter.duration_ms, 1500.0);
        assert_eq!(cfg.stats.threshold, 0.3);
        assert_eq!(cfg.sections.home(), "hero");
    }

    #[test]
    fn root_margin_shorthand() {
        let m = RootMargin::parse("-20% 0px -60% 0px").unwrap();
        assert_eq!(m.top, Length::Percent(-20.0));
        assert_eq!(m.bottom, Length::Percent(-60.0));
        assert_eq!(m.to_string(), "-20% 0px -60% 0px");

        let m = RootMargin::parse("0px").unwrap();
        assert_eq!(m.left, Length::Px(0.0));

        let m = RootMargin::parse("10px 5%").unwrap();
        assert_eq!(m.bottom, Length::Px(10.0));
        assert_eq!(m.left, Length::Percent(5.0));

        assert!(RootMargin::parse("").is_err());
        assert!(RootMargin::parse("10em").is_err());
        assert!(RootMargin::parse("1px 2px 3px 4px 5px").is_err());
    }

    #[test]
    fn rejects_bad_values() {
        let mut cfg = Config::default();
        cfg.reveal.threshold = 1.5;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidThreshold { observer: "reveal", .. })
        ));

        let mut cfg = Config::default();
        cfg.counter.duration_ms = 0.0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroDuration));

        let mut cfg = Config::default();
        cfg.scroll_depth.marks = vec![50, 25];
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidScrollMarks { .. })
        ));

        assert!(matches!(
            Config::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
