//! Error types for airport layout loading.

use thiserror::Error;

/// Failure while loading or validating an airport layout.
///
/// Any of these is fatal to the layout: there is no partial airport and no
/// synthesized fallback.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to read layout file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse layout JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid airport layout: {0}")]
    Invalid(String),
}
