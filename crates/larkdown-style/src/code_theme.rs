//! Code-theme registry.
//!
//! Each theme pairs the `<pre>` colors merged into `block.code_pre` with the
//! name of the syntax-highlighting theme used for token colors.

use crate::model::StyleMap;
use crate::template::CatalogEntry;

/// A code block color theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodeTheme {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub background: &'static str,
    pub text: &'static str,
    /// Name of the bundled highlighting theme.
    pub highlight_theme: &'static str,
    pub dark: bool,
}

impl CodeTheme {
    /// Class added to the `<pre>` element.
    #[must_use]
    pub fn class_name(&self) -> String {
        format!("prism-{}", self.id)
    }

    /// Background and text color for the `<pre>` element.
    #[must_use]
    pub fn pre_style(&self) -> StyleMap {
        StyleMap::new()
            .with("background", self.background)
            .with("color", self.text)
    }

    pub fn info(&self) -> CatalogEntry<'static> {
        CatalogEntry {
            id: self.id,
            name: self.name,
            description: self.description,
        }
    }
}

/// Theme used when none is selected in light mode.
pub const DEFAULT_CODE_THEME: &str = "github";

/// Theme used when none is selected in dark mode.
pub const DEFAULT_DARK_CODE_THEME: &str = "github-dark";

const fn theme(
    id: &'static str,
    name: &'static str,
    (background, text): (&'static str, &'static str),
    highlight_theme: &'static str,
    dark: bool,
) -> CodeTheme {
    CodeTheme {
        id,
        name,
        description: if dark { "Dark code theme" } else { "Light code theme" },
        background,
        text,
        highlight_theme,
        dark,
    }
}

const fn light(
    id: &'static str,
    name: &'static str,
    colors: (&'static str, &'static str),
    highlight_theme: &'static str,
) -> CodeTheme {
    theme(id, name, colors, highlight_theme, false)
}

const fn dark(
    id: &'static str,
    name: &'static str,
    colors: (&'static str, &'static str),
    highlight_theme: &'static str,
) -> CodeTheme {
    theme(id, name, colors, highlight_theme, true)
}

static CODE_THEMES: [CodeTheme; 12] = [
    light("github", "GitHub Light", ("#f6f8fa", "#24292e"), "InspiredGitHub"),
    dark("github-dark", "GitHub Dark", ("#0d1117", "#c9d1d9"), "base16-ocean.dark"),
    dark("dracula", "Dracula", ("#282a36", "#f8f8f2"), "base16-eighties.dark"),
    dark("monokai", "Monokai", ("#272822", "#f8f8f2"), "base16-mocha.dark"),
    dark("nord", "Nord", ("#2e3440", "#d8dee9"), "base16-ocean.dark"),
    dark("one-dark", "One Dark", ("#282c34", "#abb2bf"), "base16-eighties.dark"),
    light("solarized-light", "Solarized Light", ("#fdf6e3", "#657b83"), "Solarized (light)"),
    dark("solarized-dark", "Solarized Dark", ("#002b36", "#839496"), "Solarized (dark)"),
    light("vs", "VS Light", ("#ffffff", "#000000"), "InspiredGitHub"),
    dark("vs-dark", "VS Dark", ("#1e1e1e", "#d4d4d4"), "base16-eighties.dark"),
    light("atom-one-light", "Atom One Light", ("#fafafa", "#383a42"), "base16-ocean.light"),
    dark("atom-one-dark", "Atom One Dark", ("#282c34", "#abb2bf"), "base16-ocean.dark"),
];

/// All registered code themes. The first is the fallback.
pub fn code_themes() -> &'static [CodeTheme] {
    &CODE_THEMES
}

/// Find a code theme by id.
#[must_use]
pub fn find_code_theme(id: &str) -> Option<&'static CodeTheme> {
    CODE_THEMES.iter().find(|theme| theme.id == id)
}

/// Find a code theme by id, falling back to the first registered theme.
#[must_use]
pub fn code_theme(id: &str) -> &'static CodeTheme {
    find_code_theme(id).unwrap_or(&CODE_THEMES[0])
}
