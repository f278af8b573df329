//! Error types for gauge operations.

use thiserror::Error;
use tracing::warn;

/// Result type for gauge operations.
pub type GaugeResult<T> = Result<T, GaugeError>;

/// Errors surfaced at the gauge boundary.
///
/// Degenerate ranges, unsized frames and double cancellation are handled
/// locally and never show up here.
#[derive(Debug, Error)]
pub enum GaugeError {
    /// NaN or infinite input offered to a setter. The previous state is kept.
    #[error("Rejected non-finite {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    /// Font bytes could not be parsed.
    #[error("Invalid font data in {path}")]
    Font { path: String },

    /// Font file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Reject NaN and infinities before they reach the model.
pub(crate) fn ensure_finite(what: &'static str, value: f64) -> GaugeResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        warn!(what, value, "rejecting non-finite input");
        Err(GaugeError::NonFinite { what, value })
    }
}
