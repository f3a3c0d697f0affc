//! Style model, template registry and code-theme registry for larkdown.
//!
//! A render pass is styled by a [`StyleModel`]: root (`base`) properties plus
//! one property map per block and inline element kind. Templates are named
//! presets held in a read-only [`TemplateRegistry`]; [`TemplateResolver`]
//! merges a template with caller [`RenderOptions`] into the final model.
//!
//! # Example
//!
//! ```
//! use larkdown_style::{BlockElement, RenderOptions, TemplateResolver};
//!
//! let options = RenderOptions::default().theme_color("#1a73e8");
//! let resolved = TemplateResolver::builtin().resolve("default", &options);
//!
//! let h1 = resolved.styles.block_style(BlockElement::H1).unwrap();
//! assert_eq!(h1.get("color"), Some("#1a73e8"));
//! ```

mod builtin;
mod code_theme;
mod element;
mod model;
mod resolve;
mod template;

pub use builtin::FONT_FAMILY;
pub use code_theme::{
    CodeTheme, DEFAULT_CODE_THEME, DEFAULT_DARK_CODE_THEME, code_theme, code_themes,
    find_code_theme,
};
pub use element::{BlockElement, InlineElement};
pub use model::{StyleMap, StyleModel, THEME_COLOR, camel_to_kebab, to_inline_style_string};
pub use resolve::{
    DARK_TEXT_COLOR, DARK_THEME_COLOR, RenderOptions, ResolvedStyle, TemplateResolver,
};
pub use template::{
    CatalogEntry, RegistryError, Template, TemplateRegistry, TransformError, TransformFn,
    TransformOutput,
};
