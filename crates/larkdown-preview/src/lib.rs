//! Markdown preview pipeline.
//!
//! [`MarkdownParser::parse`] is the entry point: it resolves a template,
//! preprocesses and renders the markdown, wraps it in the styled root
//! container and runs the template's transform hook. It never fails; a
//! document that cannot render yields [`ERROR_FRAGMENT`].
//!
//! [`PreviewSession`] drives a live preview panel on top of it, with
//! [`ThemeSource`] notifications and deferred diagram rasterization.

mod cell;
mod error;
mod parser;
mod session;
mod theme;

pub use cell::cell_to_markdown;
pub use error::RenderError;
pub use parser::{DEFAULT_MAX_INPUT_BYTES, ERROR_FRAGMENT, MarkdownParser};
pub use session::PreviewSession;
pub use theme::{
    Subscription, ThemeBroadcaster, ThemeListener, ThemeMode, ThemeSource, UnknownThemeMode,
};
