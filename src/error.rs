//! Error types for the brochure renderer
//!
//! Only document serialization at the very end of a generation call is
//! fatal; per-asset failures (image fetch/decode, missing fonts) are
//! absorbed at the call site and degrade to placeholders or fallback
//! styling.

use thiserror::Error;

/// Custom error type for brochure rendering operations
#[derive(Error, Debug)]
pub enum RendererError {
    #[error("Font error: {0}")]
    FontError(String),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("PDF generation error: {0}")]
    PdfError(String),
}

/// Result type alias for renderer operations
pub type RendererResult<T> = Result<T, RendererError>;

impl From<serde_json::Error> for RendererError {
    fn from(err: serde_json::Error) -> Self {
        RendererError::JsonError(err.to_string())
    }
}

impl From<reqwest::Error> for RendererError {
    fn from(err: reqwest::Error) -> Self {
        RendererError::HttpError(err.to_string())
    }
}
