//! Code block processor for mermaid fences.

use std::collections::HashMap;

use larkdown_renderer::{CodeBlockProcessor, ExtractedCodeBlock, ProcessResult};

use crate::placeholder::{next_diagram_id, placeholder_html};

/// Fence language handled by [`DiagramProcessor`].
pub const DIAGRAM_LANGUAGE: &str = "mermaid";

/// Turns ```` ```mermaid ```` fences into addressable placeholders.
///
/// The fence body is trimmed and carried URL-encoded in the placeholder; it is
/// never highlighted or HTML-escaped at this stage. Each placeholder gets a
/// fresh id, so re-rendering the same document yields new ids.
///
/// # Example
///
/// ```
/// use larkdown_diagrams::DiagramProcessor;
/// use larkdown_renderer::{MarkdownRenderer, StyledBackend, parser_options};
/// use larkdown_style::{StyleModel, code_theme};
/// use pulldown_cmark::Parser;
///
/// let markdown = "```mermaid\ngraph TD\n  A --> B\n```";
/// let backend = StyledBackend::new(StyleModel::default(), code_theme("github"));
/// let mut renderer = MarkdownRenderer::new(backend).with_processor(DiagramProcessor::new());
///
/// let result = renderer.render(Parser::new_ext(markdown, parser_options()));
/// assert!(result.html.contains(r#"class="mermaid-diagram""#));
/// assert_eq!(renderer.extracted_code_blocks()[0].source, "graph TD\n  A --> B");
/// ```
#[derive(Default)]
pub struct DiagramProcessor {
    extracted: Vec<ExtractedCodeBlock>,
    warnings: Vec<String>,
}

impl DiagramProcessor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CodeBlockProcessor for DiagramProcessor {
    fn process(
        &mut self,
        language: &str,
        attrs: &HashMap<String, String>,
        source: &str,
        index: usize,
    ) -> ProcessResult {
        if language != DIAGRAM_LANGUAGE {
            return ProcessResult::PassThrough;
        }

        for key in attrs.keys() {
            self.warnings
                .push(format!("diagram {index}: unknown attribute '{key}' ignored"));
        }

        let id = next_diagram_id();
        let source = source.trim();

        let mut stored_attrs = attrs.clone();
        stored_attrs.insert("id".to_owned(), id.clone());
        self.extracted.push(ExtractedCodeBlock {
            index,
            language: language.to_owned(),
            source: source.to_owned(),
            attrs: stored_attrs,
        });

        ProcessResult::Inline(placeholder_html(&id, source))
    }

    fn extracted(&self) -> &[ExtractedCodeBlock] {
        &self.extracted
    }

    fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::find_placeholders;
    use larkdown_renderer::{MarkdownRenderer, StyledBackend, parser_options};
    use larkdown_style::{StyleModel, code_theme};
    use pretty_assertions::assert_eq;
    use pulldown_cmark::Parser;

    fn render(markdown: &str) -> (String, Vec<ExtractedCodeBlock>, Vec<String>) {
        let backend = StyledBackend::new(StyleModel::default(), code_theme("github"));
        let mut renderer = MarkdownRenderer::new(backend).with_processor(DiagramProcessor::new());
        let result = renderer.render(Parser::new_ext(markdown, parser_options()));
        (result.html, renderer.extracted_code_blocks(), result.warnings)
    }

    #[test]
    fn test_other_languages_pass_through() {
        let (html, extracted, _) = render("```rust\nfn main() {}\n```");
        assert!(html.contains(r#"class="language-rust""#));
        assert!(extracted.is_empty());
    }

    #[test]
    fn test_placeholder_carries_source() {
        let (html, extracted, _) = render("```mermaid\nsequenceDiagram\n  A->>B: hi & bye\n```");
        let found = find_placeholders(&html);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].source, "sequenceDiagram\n  A->>B: hi & bye");
        assert_eq!(found[0].id, extracted[0].attrs["id"]);
    }

    #[test]
    fn test_unclosed_fence_still_one_placeholder() {
        let (html, _, _) = render("intro\n\n```mermaid\ngraph LR\n  A --> B\n");
        let found = find_placeholders(&html);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].source, "graph LR\n  A --> B");
    }

    #[test]
    fn test_ids_unique_within_document() {
        let (html, _, _) = render("```mermaid\na\n```\n\n```mermaid\na\n```");
        let found = find_placeholders(&html);
        assert_eq!(found.len(), 2);
        assert_ne!(found[0].id, found[1].id);
    }

    #[test]
    fn test_rerender_gets_new_ids() {
        let (first, _, _) = render("```mermaid\na\n```");
        let (second, _, _) = render("```mermaid\na\n```");
        assert_ne!(find_placeholders(&first)[0].id, find_placeholders(&second)[0].id);
    }

    #[test]
    fn test_fence_attributes_warn() {
        let (_, _, warnings) = render("```mermaid theme=dark\na\n```");
        assert_eq!(warnings, vec!["diagram 0: unknown attribute 'theme' ignored".to_owned()]);
    }
}
