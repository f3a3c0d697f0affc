//! Math spans: `\[..\]`, `$$..$$`, `\(..\)` and `$..$`.

use latex2mathml::{DisplayStyle, latex_to_mathml};

use super::{ExtensionError, ExtensionToken, InlineExtension};
use crate::state::escape_html;

/// Delimiter pairs in priority order, with their display flag.
const RULES: [(&str, &str, bool); 4] = [
    ("\\[", "\\]", true),
    ("$$", "$$", true),
    ("\\(", "\\)", false),
    ("$", "$", false),
];

/// Typesetting failure.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct MathError(pub String);

/// Turns TeX source into HTML.
pub trait MathTypesetter: Send + Sync {
    /// # Errors
    ///
    /// Returns [`MathError`] when `source` cannot be typeset.
    fn typeset(&self, source: &str, display: bool) -> Result<String, MathError>;
}

/// MathML output via `latex2mathml`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MathMlTypesetter;

impl MathTypesetter for MathMlTypesetter {
    fn typeset(&self, source: &str, display: bool) -> Result<String, MathError> {
        let style = if display {
            DisplayStyle::Block
        } else {
            DisplayStyle::Inline
        };
        latex_to_mathml(source, style).map_err(|e| MathError(e.to_string()))
    }
}

/// Inline extension recognizing math delimiters.
pub struct MathExtension<T> {
    typesetter: T,
}

impl<T: MathTypesetter> MathExtension<T> {
    pub fn new(typesetter: T) -> Self {
        Self { typesetter }
    }
}

impl<T: MathTypesetter> InlineExtension for MathExtension<T> {
    fn name(&self) -> &'static str {
        "math"
    }

    fn triggers(&self) -> &'static [char] {
        &['$', '\\']
    }

    /// First rule whose closing delimiter appears wins; the shortest body is
    /// taken. An empty body is not math.
    fn tokenize(&self, src: &str) -> Result<Option<ExtensionToken>, ExtensionError> {
        for (open, close, display) in RULES {
            let Some(body) = src.strip_prefix(open) else {
                continue;
            };
            let Some(end) = body.find(close) else {
                continue;
            };
            let text = body[..end].trim();
            if text.is_empty() {
                continue;
            }
            return Ok(Some(ExtensionToken {
                kind: "math",
                raw: src[..open.len() + end + close.len()].to_owned(),
                text: text.to_owned(),
                display,
            }));
        }
        Ok(None)
    }

    fn render(&self, token: &ExtensionToken) -> String {
        match self.typesetter.typeset(&token.text, token.display) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(error = %e, source = %token.text, "Math typesetting failed");
                format!(
                    r#"<span class="math-error" style="color: red;">{}</span>"#,
                    escape_html(&e.to_string())
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Echo;

    impl MathTypesetter for Echo {
        fn typeset(&self, source: &str, display: bool) -> Result<String, MathError> {
            if source.contains("\\bad") {
                return Err(MathError(format!("Undefined control sequence: {source}")));
            }
            let mode = if display { "block" } else { "inline" };
            Ok(format!("<m {mode}>{source}</m>"))
        }
    }

    fn token(src: &str) -> Option<ExtensionToken> {
        MathExtension::new(Echo).tokenize(src).unwrap()
    }

    #[test]
    fn test_rule_priority() {
        let t = token(r"\[ a \] rest").unwrap();
        assert_eq!((t.raw.as_str(), t.text.as_str(), t.display), (r"\[ a \]", "a", true));

        let t = token("$$x$$ y").unwrap();
        assert_eq!((t.raw.as_str(), t.display), ("$$x$$", true));

        let t = token(r"\(b\)").unwrap();
        assert_eq!((t.text.as_str(), t.display), ("b", false));

        let t = token("$x^2$ and $y$").unwrap();
        assert_eq!((t.raw.as_str(), t.text.as_str(), t.display), ("$x^2$", "x^2", false));
    }

    #[test]
    fn test_display_math_spans_lines() {
        let t = token("$$\na + b\n$$").unwrap();
        assert_eq!(t.text, "a + b");
        assert!(t.display);
    }

    #[test]
    fn test_unterminated_is_not_math() {
        assert_eq!(token("$5 for everything"), None);
        assert_eq!(token(r"\[ open"), None);
    }

    #[test]
    fn test_empty_body_is_not_math() {
        assert_eq!(token("$$"), None);
        assert_eq!(token("$ $"), None);
    }

    #[test]
    fn test_plain_escape_is_not_math() {
        assert_eq!(token(r"\*"), None);
    }

    #[test]
    fn test_render_error_span() {
        let ext = MathExtension::new(Echo);
        let t = token(r"$\bad<$").unwrap();
        assert_eq!(
            ext.render(&t),
            r#"<span class="math-error" style="color: red;">Undefined control sequence: \bad&lt;</span>"#
        );
    }

    #[test]
    fn test_mathml_typesetter() {
        let html = MathMlTypesetter.typeset("x^2", false).unwrap();
        assert!(html.contains("<math"));
        assert!(html.contains("<mi>x</mi>"));
    }
}
