//! Error types for certificate rendering
//!
//! This module defines the error type shared by the whole pipeline,
//! providing clear error messages and proper error propagation.

use thiserror::Error;

/// Error type for certificate rendering operations
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Image error: {0}")]
    Image(String),

    #[error("SVG error: {0}")]
    Svg(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
