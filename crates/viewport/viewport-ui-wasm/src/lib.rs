//! Browser host for `viewport-ui-core`.
//!
//! `start()` scans the document, builds the engine and wires listeners,
//! intersection observers, animation frames and timeouts to it. Everything the
//! engine decides comes back as patches and commands applied here.

use serde::{Deserialize, Serialize};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use viewport_ui_core::{Config, ElementId, UiEvent};

mod logger;
mod nodes;
mod runtime;
mod scan;
mod sink;

pub use sink::GtagSink;

/// `start()` options: any engine `Config` field, plus the console log level.
#[derive(Debug, Default, Deserialize)]
struct HostOptions {
    #[serde(flatten)]
    config: Config,
    #[serde(default)]
    log_level: Option<String>,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Bind to the current document. Pass a partial config object or
/// undefined/null for defaults. Calling it again while running does nothing.
/// Example:
///   start({ counter: { duration_ms: 1200 }, log_level: "debug" })
#[wasm_bindgen]
pub fn start(options: JsValue) -> Result<(), JsError> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let opts: HostOptions = if jsvalue_is_undefined_or_null(&options) {
        HostOptions::default()
    } else {
        swb::from_value(options).map_err(|e| JsError::new(&format!("config error: {e}")))?
    };
    logger::init(logger::parse_level(opts.log_level.as_deref()));

    if runtime::is_running() {
        log::debug!("start: already running");
        return Ok(());
    }
    let rt = runtime::Runtime::new(opts.config)?;
    runtime::install(rt);
    runtime::with_runtime(runtime::Runtime::attach);
    Ok(())
}

/// Detach from the document: observers disconnected, listeners removed,
/// pending timers dropped.
#[wasm_bindgen]
pub fn stop() {
    if let Some(mut rt) = runtime::take() {
        rt.detach();
        log::info!("stopped");
    }
}

#[wasm_bindgen(js_name = toggleLanguage)]
pub fn toggle_language() -> Result<(), JsError> {
    runtime::with_runtime(|rt| rt.dispatch(UiEvent::ToggleLanguage))
        .map(|_| ())
        .ok_or_else(|| JsError::new("toggleLanguage: not started"))
}

/// Current language tag ("he" / "en"), or undefined when not started.
#[wasm_bindgen]
pub fn language() -> Option<String> {
    runtime::with_runtime(|rt| rt.engine().language().tag().to_string())
}

/// Classify stat text as the counter would: `{ literal, kind, value?, suffix? }`.
#[wasm_bindgen]
pub fn parse_stat_text(text: &str) -> Result<JsValue, JsError> {
    let target = viewport_ui_core::parse_stat_text(ElementId(0), text);
    let ser = swb::Serializer::json_compatible();
    target
        .serialize(&ser)
        .map_err(|e| JsError::new(&format!("serialize error: {e}")))
}

#[wasm_bindgen]
pub fn format_stat_value(current: f64, target: f64, suffix: &str) -> String {
    viewport_ui_core::format_stat_value(current, target, suffix)
}

#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
