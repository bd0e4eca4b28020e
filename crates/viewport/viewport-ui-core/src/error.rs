//! Error types.
//!
//! Only configuration and the analytics sink can fail. Everything the engine
//! does in response to page events degrades to "no patch" instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{observer} threshold must be within [0, 1], got {value}")]
    InvalidThreshold { observer: &'static str, value: f64 },
    #[error("{observer} root margin '{margin}' is invalid: {reason}")]
    InvalidRootMargin {
        observer: &'static str,
        margin: String,
        reason: String,
    },
    #[error("counter duration must be positive")]
    ZeroDuration,
    #[error("scroll depth marks must be strictly increasing within 1..=100, got {marks:?}")]
    InvalidScrollMarks { marks: Vec<u32> },
    #[error("config parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("analytics sink is unavailable")]
    Unavailable,
    #[error("analytics sink rejected event '{event}': {reason}")]
    Rejected { event: String, reason: String },
}
