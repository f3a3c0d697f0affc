//! Template resolution.
//!
//! [`TemplateResolver::resolve`] turns a template id plus caller options into
//! the final [`StyleModel`] for one render. Precedence, lowest first:
//!
//! 1. template styles
//! 2. code-theme `<pre>` colors
//! 3. caller style overrides
//!
//! After merging, the theme color (explicit option, `base.themeColor` from the
//! overrides, or the dark-mode default) is substituted into every reference to
//! the template's theme variable.

use crate::code_theme::{CodeTheme, DEFAULT_CODE_THEME, DEFAULT_DARK_CODE_THEME, code_theme};
use crate::element::BlockElement;
use crate::model::{StyleModel, THEME_COLOR};
use crate::template::{Template, TemplateRegistry};

/// Theme color used in dark mode when the caller picked none.
pub const DARK_THEME_COLOR: &str = "#e5e7eb";

/// Text color used in dark mode when the caller picked none.
pub const DARK_TEXT_COLOR: &str = "#d1d5db";

/// Host-page foreground color some overrides refer to.
const FOREGROUND_COLOR: &str = "hsl(var(--foreground))";

/// Caller-supplied options for one render.
#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    /// Code theme id. Defaults to `github`, or `github-dark` in dark mode.
    pub code_theme: Option<String>,
    pub dark_mode: bool,
    /// Concrete theme color, e.g. `#1a73e8`.
    pub theme_color: Option<String>,
    /// Per-session style overrides; always win over template values.
    pub style_overrides: StyleModel,
}

impl RenderOptions {
    #[must_use]
    pub fn code_theme(mut self, id: impl Into<String>) -> Self {
        self.code_theme = Some(id.into());
        self
    }

    #[must_use]
    pub fn dark_mode(mut self, dark_mode: bool) -> Self {
        self.dark_mode = dark_mode;
        self
    }

    #[must_use]
    pub fn theme_color(mut self, color: impl Into<String>) -> Self {
        self.theme_color = Some(color.into());
        self
    }

    #[must_use]
    pub fn style_overrides(mut self, overrides: StyleModel) -> Self {
        self.style_overrides = overrides;
        self
    }
}

/// Result of resolving a template against render options.
#[derive(Clone, Debug)]
pub struct ResolvedStyle<'r> {
    pub template: &'r Template,
    pub styles: StyleModel,
    pub code_theme: &'static CodeTheme,
    pub dark_mode: bool,
}

/// Merges templates with caller options.
#[derive(Clone, Copy, Debug)]
pub struct TemplateResolver<'r> {
    registry: &'r TemplateRegistry,
}

impl TemplateResolver<'static> {
    /// Resolver over the built-in templates.
    pub fn builtin() -> Self {
        Self::new(TemplateRegistry::builtin())
    }
}

impl<'r> TemplateResolver<'r> {
    pub fn new(registry: &'r TemplateRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r TemplateRegistry {
        self.registry
    }

    /// Resolve `template_id` (falling back to the first template) with `options`.
    #[must_use]
    pub fn resolve(&self, template_id: &str, options: &RenderOptions) -> ResolvedStyle<'r> {
        let template = self.registry.get(template_id);

        let theme_id = options.code_theme.as_deref().unwrap_or(if options.dark_mode {
            DEFAULT_DARK_CODE_THEME
        } else {
            DEFAULT_CODE_THEME
        });
        let code_theme = code_theme(theme_id);

        let mut theme_layer = StyleModel::default();
        *theme_layer.block_mut(BlockElement::CodePre) = code_theme.pre_style();

        let mut styles = template
            .styles()
            .merge(&theme_layer)
            .merge(&options.style_overrides);

        let explicit_color = options
            .theme_color
            .as_deref()
            .or_else(|| options.style_overrides.theme_color())
            .filter(|color| is_concrete(color))
            .map(str::to_owned);

        let theme_color = explicit_color
            .or_else(|| options.dark_mode.then(|| DARK_THEME_COLOR.to_owned()));

        if let Some(color) = theme_color {
            styles.base.insert(THEME_COLOR, color.as_str());
            styles.substitute_var(template.theme_var(), &color);
        }

        if options.dark_mode {
            styles.substitute_var("text-color", DARK_TEXT_COLOR);
            styles.replace_value(FOREGROUND_COLOR, DARK_TEXT_COLOR);
            if !options.style_overrides.base.contains("color") {
                styles.base.insert("color", DARK_TEXT_COLOR);
            }
        }

        ResolvedStyle {
            template,
            styles,
            code_theme,
            dark_mode: options.dark_mode,
        }
    }
}

/// A color is concrete when it does not itself defer to a CSS variable.
fn is_concrete(color: &str) -> bool {
    !color.trim().is_empty() && !color.contains("var(")
}
