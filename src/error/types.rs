use thiserror::Error;

use crate::layout::GridError;

/// Unified result type for the boxflow crate.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors surfaced by the layout engine.
///
/// Numeric degenerate cases (zero items, negative available space) are not
/// errors; only malformed caller input is.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid edge spec `{spec}`: {reason}")]
    InvalidSpec { spec: String, reason: String },
    #[error("unknown {field} value `{value}`")]
    Configuration { field: &'static str, value: String },
    #[error("grid layout error: {0}")]
    Grid(#[from] GridError),
    #[error("malformed layout json: {0}")]
    Json(#[from] serde_json::Error),
}

impl LayoutError {
    pub(crate) fn invalid_spec(spec: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            spec: spec.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn configuration(field: &'static str, value: impl Into<String>) -> Self {
        Self::Configuration {
            field,
            value: value.into(),
        }
    }
}
