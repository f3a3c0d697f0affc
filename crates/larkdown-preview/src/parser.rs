//! Markdown to styled HTML.

use std::time::Instant;

use larkdown_diagrams::DiagramProcessor;
use larkdown_renderer::{
    InlineExtensionRegistry, MarkdownRenderer, StyledBackend, escape_html, parser_options,
    preprocess,
};
use larkdown_style::{RenderOptions, ResolvedStyle, THEME_COLOR, TemplateRegistry, TemplateResolver};
use pulldown_cmark::Parser;

use crate::error::RenderError;

/// Default input limit: 1 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 1024 * 1024;

/// Literal produced upstream by coercing structured cell values to strings.
const OBJECT_COERCION: &str = "[object Object]";

/// Returned by [`MarkdownParser::parse`] when the document cannot render.
pub const ERROR_FRAGMENT: &str = r#"<div class="markdown-error" style="color: #dc2626; background: #fef2f2; border: 1px solid #fecaca; border-radius: 4px; padding: 1em; margin: 1em 0;">Error processing markdown content</div>"#;

/// Renders markdown documents with a template.
///
/// A parser holds only read-only configuration, so one instance can serve
/// any number of documents.
///
/// # Example
///
/// ```
/// use larkdown_preview::MarkdownParser;
/// use larkdown_style::RenderOptions;
///
/// let parser = MarkdownParser::new();
/// let html = parser.parse("hello world", "default", &RenderOptions::default());
/// assert!(html.starts_with(r#"<section class="markdown-preview default-template""#));
/// ```
pub struct MarkdownParser<'r> {
    resolver: TemplateResolver<'r>,
    extensions: InlineExtensionRegistry,
    max_input_bytes: usize,
}

impl MarkdownParser<'static> {
    /// Parser over the built-in templates with math support.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(TemplateRegistry::builtin())
    }
}

impl Default for MarkdownParser<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> MarkdownParser<'r> {
    #[must_use]
    pub fn with_registry(registry: &'r TemplateRegistry) -> Self {
        Self {
            resolver: TemplateResolver::new(registry),
            extensions: InlineExtensionRegistry::with_math(),
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }

    /// Replace the inline extensions.
    #[must_use]
    pub fn extensions(mut self, extensions: InlineExtensionRegistry) -> Self {
        self.extensions = extensions;
        self
    }

    #[must_use]
    pub fn max_input_bytes(mut self, limit: usize) -> Self {
        self.max_input_bytes = limit;
        self
    }

    pub fn registry(&self) -> &'r TemplateRegistry {
        self.resolver.registry()
    }

    /// Render `markdown` with a template, never failing.
    ///
    /// A document that cannot render yields [`ERROR_FRAGMENT`].
    #[must_use]
    pub fn parse(&self, markdown: &str, template_id: &str, options: &RenderOptions) -> String {
        match self.try_parse(markdown, template_id, options) {
            Ok(html) => html,
            Err(e) => {
                tracing::error!(error = %e, template = template_id, "Markdown rendering failed");
                ERROR_FRAGMENT.to_owned()
            }
        }
    }

    /// Render `markdown` with a template.
    ///
    /// Blank input renders to an empty string. Unknown template ids fall back
    /// to the registry's first template.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the input exceeds the size limit or an
    /// inline extension fails.
    pub fn try_parse(
        &self,
        markdown: &str,
        template_id: &str,
        options: &RenderOptions,
    ) -> Result<String, RenderError> {
        if markdown.trim().is_empty() {
            return Ok(String::new());
        }
        if markdown.len() > self.max_input_bytes {
            return Err(RenderError::InputTooLarge {
                size: markdown.len(),
                limit: self.max_input_bytes,
            });
        }

        let start = Instant::now();
        let resolved = self.resolver.resolve(template_id, options);

        let text = preprocess(markdown);
        let protected = self.extensions.protect(&text)?;

        let mut renderer = MarkdownRenderer::new(StyledBackend::from_resolved(&resolved))
            .with_processor(DiagramProcessor::new());
        let result = renderer.render(Parser::new_ext(protected.markdown(), parser_options()));
        for warning in &result.warnings {
            tracing::debug!(warning = %warning, "Code block processor warning");
        }

        let body = protected.restore(&result.html);
        let html = apply_transform(&resolved, wrap_root(&resolved, &body));

        tracing::debug!(
            template = resolved.template.id(),
            extensions = protected.len(),
            diagrams = renderer.extracted_code_blocks().len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Markdown rendered"
        );

        Ok(strip_object_coercion(html))
    }
}

/// Remove every `[object Object]`, including ones formed by a removal.
fn strip_object_coercion(mut html: String) -> String {
    while html.contains(OBJECT_COERCION) {
        html = html.replace(OBJECT_COERCION, "");
    }
    html
}

/// Wrap the body in the styled root `<section>`.
fn wrap_root(resolved: &ResolvedStyle<'_>, body: &str) -> String {
    let mut base = resolved.styles.base.clone();
    base.remove(THEME_COLOR);
    let style = base.to_inline_style();

    let mut class = format!("markdown-preview {}", resolved.template.class());
    if resolved.dark_mode {
        class.push_str(" dark");
    }

    if style.is_empty() {
        format!(r#"<section class="{class}">{body}</section>"#)
    } else {
        format!(
            r#"<section class="{class}" style="{}">{body}</section>"#,
            escape_html(&style)
        )
    }
}

/// Run the template's transform hook, keeping `html` if it fails.
fn apply_transform(resolved: &ResolvedStyle<'_>, html: String) -> String {
    let Some(transform) = resolved.template.transform_fn() else {
        return html;
    };

    match transform(&html) {
        Ok(output) => match output.into_html() {
            Some(transformed) => transformed,
            None => {
                tracing::warn!(
                    template = resolved.template.id(),
                    "Transform returned neither html nor content"
                );
                html
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, template = resolved.template.id(), "Transform failed");
            html
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larkdown_renderer::{ExtensionError, ExtensionToken, InlineExtension};
    use larkdown_style::{StyleModel, Template, TransformError, TransformOutput};
    use pretty_assertions::assert_eq;

    fn parse(markdown: &str) -> String {
        MarkdownParser::new().parse(markdown, "default", &RenderOptions::default())
    }

    #[test]
    fn test_plain_paragraph() {
        let html = parse("hello world");
        assert_eq!(html.matches("<p").count(), 1);
        assert!(html.contains(">hello world</p></section>"));

        let inner_start = html.find("<p").unwrap();
        let inner = &html[inner_start..html.len() - "</section>".len()];
        assert!(inner.starts_with("<p style=\""));
        assert!(inner.ends_with(">hello world</p>"));
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(parse(""), "");
        assert_eq!(parse("  \n\t"), "");
    }

    #[test]
    fn test_root_style_excludes_theme_color() {
        let options = RenderOptions::default().theme_color("#ff0000");
        let html = MarkdownParser::new().parse("x", "default", &options);
        let root = &html[..html.find('>').unwrap()];
        assert!(!root.contains("theme-color"));
        assert!(root.contains("font-family"));
    }

    #[test]
    fn test_dark_class() {
        let options = RenderOptions::default().dark_mode(true);
        let html = MarkdownParser::new().parse("x", "wechat", &options);
        assert!(html.starts_with(r#"<section class="markdown-preview wechat-template dark""#));
    }

    #[test]
    fn test_idempotent() {
        let markdown = "# Title\n\n- a\n- b\n\n$x^2$ and `code`";
        assert_eq!(parse(markdown), parse(markdown));
    }

    #[test]
    fn test_object_coercion_stripped() {
        let html = parse("value: [object Object] and `[object Object]`");
        assert!(!html.contains("[object Object]"));
    }

    #[test]
    fn test_nested_object_coercion_stripped() {
        let html = parse("[object [object Object]Object] and [ob[object Object]ject Object]");
        assert!(!html.contains("[object Object]"));
        assert!(html.contains("> and </p>"));
    }

    #[test]
    fn test_math_rendered_inline() {
        let html = parse("area $a_1 + b_1$ here");
        assert!(html.contains("<math"));
        assert!(!html.contains("<em"));
    }

    #[test]
    fn test_math_in_image_alt_kept_as_source() {
        let html = parse("![see $x$](a.png)");
        assert!(html.contains(r#"<img src="a.png" alt="see $x$""#));
        assert!(!html.contains("<math"));
    }

    #[test]
    fn test_math_in_indented_code_is_literal() {
        let html = parse("Pricing:\n\n    let cost = $a$;\n\nTotal $b$.");
        assert!(html.contains("let cost = $a$;</code></pre>"));
        assert_eq!(html.matches("<math").count(), 1);
    }

    #[test]
    fn test_invalid_math_renders_error_span() {
        let html = parse(r"before $\frac{a$ after");
        let open = r#"<span class="math-error" style="color: red;">"#;
        let message = &html[html.find(open).unwrap() + open.len()..];
        assert!(!message.starts_with("</span>"));
        assert!(!html.contains("<math"));
        assert!(html.contains("before "));
        assert!(html.contains(" after</p>"));
    }

    #[test]
    fn test_color_tag() {
        let html = parse("<text_tag color='red'>alert</text_tag>");
        assert!(html.contains(r#"<span style="color: #ef4444; font-weight: bold;"#));
        assert!(html.contains(">alert</span>"));
    }

    #[test]
    fn test_unclosed_mermaid_fence() {
        let html = parse("```mermaid\ngraph TD\n  A --> B");
        let found = larkdown_diagrams::find_placeholders(&html);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].source, "graph TD\n  A --> B");
    }

    #[test]
    fn test_input_too_large() {
        let parser = MarkdownParser::new().max_input_bytes(4);
        let err = parser
            .try_parse("hello", "default", &RenderOptions::default())
            .unwrap_err();
        assert!(matches!(err, RenderError::InputTooLarge { size: 5, limit: 4 }));
        assert_eq!(
            parser.parse("hello", "default", &RenderOptions::default()),
            ERROR_FRAGMENT
        );
    }

    struct Exploding;

    impl InlineExtension for Exploding {
        fn name(&self) -> &'static str {
            "exploding"
        }

        fn triggers(&self) -> &'static [char] {
            &['%']
        }

        fn tokenize(&self, _src: &str) -> Result<Option<ExtensionToken>, ExtensionError> {
            Err(ExtensionError {
                name: "exploding",
                message: "tokenizer bug".to_owned(),
            })
        }

        fn render(&self, _token: &ExtensionToken) -> String {
            String::new()
        }
    }

    #[test]
    fn test_extension_failure_yields_error_fragment() {
        let parser = MarkdownParser::new()
            .extensions(InlineExtensionRegistry::new().with_extension(Exploding));
        assert_eq!(
            parser.parse("100% done", "default", &RenderOptions::default()),
            ERROR_FRAGMENT
        );
    }

    fn to_upper(html: &str) -> Result<TransformOutput, TransformError> {
        Ok(TransformOutput::Html(html.to_uppercase()))
    }

    fn content_only(html: &str) -> Result<TransformOutput, TransformError> {
        Ok(TransformOutput::Structured {
            html: None,
            content: Some(format!("<main>{html}</main>")),
        })
    }

    fn failing(_html: &str) -> Result<TransformOutput, TransformError> {
        Err(TransformError("bad template".to_owned()))
    }

    fn registry() -> TemplateRegistry {
        TemplateRegistry::new(vec![
            Template::new("plain", "Plain", StyleModel::default()),
            Template::new("upper", "Upper", StyleModel::default()).transform(to_upper),
            Template::new("content", "Content", StyleModel::default()).transform(content_only),
            Template::new("failing", "Failing", StyleModel::default()).transform(failing),
        ])
        .unwrap()
    }

    #[test]
    fn test_transform_hooks() {
        let registry = registry();
        let parser = MarkdownParser::with_registry(&registry);
        let options = RenderOptions::default();

        let plain = parser.parse("hi", "plain", &options);
        assert_eq!(
            plain,
            r#"<section class="markdown-preview plain-template"><p>hi</p></section>"#
        );

        assert_eq!(
            parser.parse("hi", "upper", &options),
            plain.replace("plain", "upper").to_uppercase()
        );
        assert_eq!(
            parser.parse("hi", "content", &options),
            format!("<main>{}</main>", plain.replace("plain", "content"))
        );
        assert_eq!(parser.parse("hi", "failing", &options), plain.replace("plain", "failing"));
    }

    #[test]
    fn test_unknown_template_uses_first() {
        let registry = registry();
        let parser = MarkdownParser::with_registry(&registry);
        let html = parser.parse("hi", "nope", &RenderOptions::default());
        assert!(html.contains("plain-template"));
    }
}
