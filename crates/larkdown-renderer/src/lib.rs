//! Style-driven markdown renderer.
//!
//! The pieces of one render, in the order they run:
//!
//! 1. [`preprocess`]: fixed pipeline of text stages (color tags, `**` runs,
//!    character bullets).
//! 2. [`InlineExtensionRegistry::protect`]: math spans are rendered and
//!    replaced with placeholders.
//! 3. [`MarkdownRenderer`] walks `pulldown-cmark` events and asks a
//!    [`RenderBackend`] for every tag. [`StyledBackend`] writes each element's
//!    style from a [`StyleModel`](larkdown_style::StyleModel) inline.
//!    [`CodeBlockProcessor`]s take over fenced blocks such as diagrams.
//! 4. [`ProtectedMarkdown::restore`] puts the extension fragments back.
//!
//! # Example
//!
//! ```
//! use larkdown_renderer::{MarkdownRenderer, StyledBackend, parser_options};
//! use larkdown_style::{RenderOptions, TemplateResolver};
//! use pulldown_cmark::Parser;
//!
//! let resolved = TemplateResolver::builtin().resolve("default", &RenderOptions::default());
//! let backend = StyledBackend::from_resolved(&resolved);
//! let result = MarkdownRenderer::new(backend)
//!     .render(Parser::new_ext("hello world", parser_options()));
//! assert!(result.html.starts_with("<p style="));
//! ```

mod backend;
mod code_block;
mod extension;
mod highlight;
mod preprocess;
mod renderer;
mod state;
mod styled;
mod util;

use pulldown_cmark::Options;

pub use backend::RenderBackend;
pub use code_block::{CodeBlockProcessor, ExtractedCodeBlock, ProcessResult};
pub use extension::{
    ExtensionError, ExtensionToken, InlineExtension, InlineExtensionRegistry, MathError,
    MathExtension, MathMlTypesetter, MathTypesetter, ProtectedMarkdown,
};
pub use highlight::CodeHighlighter;
pub use preprocess::{STAGES, Stage, preprocess, tag_color};
pub use renderer::{MarkdownRenderer, RenderResult};
pub use state::escape_html;
pub use styled::StyledBackend;

/// Markdown extensions enabled for every render: tables, strikethrough, task
/// lists and footnotes.
#[must_use]
pub fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}
