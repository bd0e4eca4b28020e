//! Viewport UI Core (host-agnostic)
//!
//! State engine for a bilingual landing page: language toggle, reveal-on-first-view,
//! count-up statistics, the active bottom-navigation tab, the mobile drawer and the
//! FAQ accordion, plus best-effort analytics for all of them.
//!
//! The crate never touches a browser. A host (see `viewport-ui-wasm`) describes the
//! page as a [`PageModel`], forwards DOM and observer events to [`Engine::dispatch`],
//! wakes it with [`Engine::advance`] on animation frames and timer deadlines, and
//! applies the returned [`Outputs`].

pub mod accordion;
pub mod analytics;
pub mod config;
pub mod counter;
pub mod drawer;
pub mod engine;
pub mod error;
pub mod ids;
pub mod inputs;
pub mod locale;
pub mod localizer;
pub mod outputs;
pub mod page;
pub mod reveal;
pub mod scroll_depth;
pub mod sections;
pub mod snapshot;
pub mod stats;
pub mod timers;
pub mod visibility;

// Re-exports for hosts
pub use analytics::{AnalyticsEvent, AnalyticsSink, EventParams, NullSink, RecordingSink};
pub use config::{Config, ObserverOptions, RootMargin};
pub use drawer::DrawerState;
pub use engine::Engine;
pub use error::{ConfigError, SinkError};
pub use ids::{ElementId, WatcherId};
pub use inputs::{ErrorReport, IntersectionEntry, Key, ScrollMetrics, UiEvent};
pub use locale::{Language, TextDirection};
pub use outputs::{DomPatch, HostCommand, Outputs, Target};
pub use page::{
    CtaButton, FaqItem, Link, NavTab, PageModel, Section, StatNumber, StatsGroup, TextChannel,
    Translatable,
};
pub use snapshot::DomSnapshot;
pub use stats::{format_stat_value, parse_stat_text, wrap_ltr, StatKind, StatTarget, LRM};
