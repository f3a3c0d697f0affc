//! Export of rendered previews.
//!
//! [`ExportDocument`] wraps preview HTML into a printable standalone page;
//! a [`PdfBackend`] such as [`RemotePdfClient`] turns that page into a PDF.
//!
//! ```
//! use larkdown_export::ExportDocument;
//!
//! let page = ExportDocument::new("<p>hello</p>").title("Notes").build();
//! assert!(page.contains(r#"<div id="preview-content" class="markdown-preview"><p>hello</p></div>"#));
//! ```

mod document;
mod error;
mod pdf;

pub use document::ExportDocument;
pub use error::ExportError;
pub use pdf::{
    DEFAULT_ENDPOINT, ExportOutcome, PdfBackend, PdfMargin, PdfOptions, RemotePdfClient,
    export_pdf,
};
