//! Error types for export.

/// Error from PDF generation.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// HTTP request failed (network error, timeout, body too large).
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The PDF service answered with an error status.
    #[error("PDF service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("JSON error: {0}")]
    Serialize(#[from] serde_json::Error),
}
