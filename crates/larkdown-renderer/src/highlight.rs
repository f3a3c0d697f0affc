//! Syntax highlighting for fenced code blocks.
//!
//! Token colors are emitted as inline `style` attributes so the output keeps
//! its colors when pasted into editors that strip stylesheets.

use std::sync::LazyLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use larkdown_style::CodeTheme;

use crate::state::escape_html;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Highlights code with the token colors of one code theme.
#[derive(Clone, Copy, Debug)]
pub struct CodeHighlighter {
    theme_name: &'static str,
}

impl CodeHighlighter {
    #[must_use]
    pub fn new(theme: &CodeTheme) -> Self {
        Self {
            theme_name: theme.highlight_theme,
        }
    }

    /// Highlight `code` as `language`.
    ///
    /// Unknown languages, a missing language and highlighter failures all
    /// yield the HTML-escaped source.
    #[must_use]
    pub fn highlight(&self, code: &str, language: Option<&str>) -> String {
        let Some(language) = language.filter(|l| !l.is_empty()) else {
            return escape_html(code);
        };
        let Some(syntax) = SYNTAX_SET.find_syntax_by_token(language) else {
            tracing::debug!(language, "No syntax for code block language");
            return escape_html(code);
        };
        let Some(theme) = THEME_SET.themes.get(self.theme_name) else {
            tracing::warn!(theme = self.theme_name, "Highlight theme not bundled");
            return escape_html(code);
        };

        match highlight_lines(code, syntax, theme) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(error = %e, language, "Syntax highlighting failed");
                escape_html(code)
            }
        }
    }
}

fn highlight_lines(
    code: &str,
    syntax: &SyntaxReference,
    theme: &Theme,
) -> Result<String, syntect::Error> {
    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut html = String::with_capacity(code.len() * 4);
    for line in LinesWithEndings::from(code) {
        let regions = highlighter.highlight_line(line, &SYNTAX_SET)?;
        html.push_str(&styled_line_to_highlighted_html(
            &regions[..],
            IncludeBackground::No,
        )?);
    }
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use larkdown_style::code_theme;

    #[test]
    fn test_known_language_is_colored() {
        let highlighter = CodeHighlighter::new(code_theme("github"));
        let html = highlighter.highlight("fn main() {}\n", Some("rust"));
        assert!(html.contains("<span style=\""));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_unknown_language_is_escaped() {
        let highlighter = CodeHighlighter::new(code_theme("github"));
        let html = highlighter.highlight("<a>", Some("no-such-language"));
        assert_eq!(html, "&lt;a&gt;");
    }

    #[test]
    fn test_missing_language_is_escaped() {
        let highlighter = CodeHighlighter::new(code_theme("github"));
        assert_eq!(highlighter.highlight("a & b", None), "a &amp; b");
    }

    #[test]
    fn test_every_code_theme_is_bundled() {
        for theme in larkdown_style::code_themes() {
            assert!(
                THEME_SET.themes.contains_key(theme.highlight_theme),
                "missing {}",
                theme.highlight_theme
            );
        }
    }
}
