//! Error types for the PDF builder library

use thiserror::Error;

/// PDF rendering error types
#[derive(Debug, Error)]
pub enum RenderError {
    /// Document assembly error (fonts, page content, serialization)
    #[error("PDF error: {0}")]
    Pdf(String),

    /// IO error while writing the document
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<printpdf::Error> for RenderError {
    fn from(e: printpdf::Error) -> Self {
        RenderError::Pdf(e.to_string())
    }
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
