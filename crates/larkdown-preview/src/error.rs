//! Whole-document render failures.

use larkdown_renderer::ExtensionError;

/// A failure that prevents the document from rendering at all.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("input is {size} bytes, limit is {limit}")]
    InputTooLarge { size: usize, limit: usize },

    #[error("extension {name} failed: {message}")]
    Extension { name: String, message: String },
}

impl From<ExtensionError> for RenderError {
    fn from(e: ExtensionError) -> Self {
        Self::Extension {
            name: e.name.to_owned(),
            message: e.message,
        }
    }
}
