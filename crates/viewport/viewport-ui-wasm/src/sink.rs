//! `gtag` analytics sink.

use js_sys::{Function, Reflect};
use serde::Serialize;
use viewport_ui_core::{AnalyticsEvent, AnalyticsSink, SinkError};
use wasm_bindgen::{JsCast, JsValue};

/// Calls the page's global `gtag('event', name, params)`; unavailable while
/// the tag script has not loaded (or was blocked).
#[derive(Debug, Default)]
pub struct GtagSink;

impl GtagSink {
    fn gtag() -> Option<Function> {
        Reflect::get(&js_sys::global(), &JsValue::from_str("gtag"))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
    }
}

impl AnalyticsSink for GtagSink {
    fn is_available(&self) -> bool {
        Self::gtag().is_some()
    }

    fn record(&mut self, event: &AnalyticsEvent) -> Result<(), SinkError> {
        let gtag = Self::gtag().ok_or(SinkError::Unavailable)?;
        let rejected = |reason: String| SinkError::Rejected {
            event: event.name.clone(),
            reason,
        };
        let params = event
            .params
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| rejected(e.to_string()))?;
        gtag.call3(
            &JsValue::UNDEFINED,
            &JsValue::from_str("event"),
            &JsValue::from_str(&event.name),
            &params,
        )
        .map(|_| ())
        .map_err(|e| rejected(format!("{e:?}")))
    }
}
