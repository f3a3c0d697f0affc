//! Markdown event renderer with pluggable backend.

use std::collections::HashMap;

use pulldown_cmark::{CodeBlockKind, Event, Tag, TagEnd};

use crate::backend::RenderBackend;
use crate::code_block::{CodeBlockProcessor, ExtractedCodeBlock, ProcessResult, parse_fence_info};
use crate::state::{CodeCapture, FootnoteState, ImageCapture, TableCursor, escape_html};
use crate::util::heading_level_to_num;

/// Result of rendering markdown.
#[derive(Clone, Debug, Default)]
pub struct RenderResult {
    /// Rendered HTML fragment.
    pub html: String,
    /// Warnings reported by code block processors.
    pub warnings: Vec<String>,
}

/// Markdown renderer delegating element markup to a [`RenderBackend`].
///
/// The renderer tracks document structure (lists, tables, code blocks,
/// footnotes) and asks the backend for each opening and closing tag.
///
/// # Code Block Processors
///
/// Custom code block processing can be added via [`with_processor`](Self::with_processor).
/// Processors are checked in order; the first returning a non-`PassThrough` result wins.
pub struct MarkdownRenderer<B: RenderBackend> {
    backend: B,
    output: String,
    code: CodeCapture,
    table: TableCursor,
    image: ImageCapture,
    footnotes: FootnoteState,
    processors: Vec<Box<dyn CodeBlockProcessor>>,
    /// Current code block index for processor callbacks.
    code_block_index: usize,
    /// Pending code block attrs from fence info.
    pending_attrs: HashMap<String, String>,
}

impl<B: RenderBackend> MarkdownRenderer<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            output: String::with_capacity(4096),
            code: CodeCapture::default(),
            table: TableCursor::default(),
            image: ImageCapture::default(),
            footnotes: FootnoteState::default(),
            processors: Vec::new(),
            code_block_index: 0,
            pending_attrs: HashMap::new(),
        }
    }

    /// Add a code block processor.
    ///
    /// Processors are checked in order when a fenced code block with a
    /// language is encountered.
    #[must_use]
    pub fn with_processor<P: CodeBlockProcessor + 'static>(mut self, processor: P) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// All code blocks captured by processors.
    #[must_use]
    pub fn extracted_code_blocks(&self) -> Vec<ExtractedCodeBlock> {
        self.processors
            .iter()
            .flat_map(|p| p.extracted())
            .cloned()
            .collect()
    }

    /// Render markdown events and return the result.
    ///
    /// Processors' `post_process` hooks run over the finished HTML.
    pub fn render<'a, I>(&mut self, events: I) -> RenderResult
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event);
        }

        let mut html = std::mem::take(&mut self.output);
        for processor in &mut self.processors {
            processor.post_process(&mut html);
        }

        let warnings = self
            .processors
            .iter()
            .flat_map(|p| p.warnings())
            .cloned()
            .collect();

        RenderResult { html, warnings }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                if self.image.is_active() {
                    self.image.push_alt(&code);
                } else {
                    self.backend.inline_code(&code, &mut self.output);
                }
            }
            // Alt text stays plain
            Event::InlineHtml(_) if self.image.is_active() => {}
            Event::Html(html) | Event::InlineHtml(html) => {
                self.backend.raw_html(&html, &mut self.output);
            }
            Event::SoftBreak => {
                if self.code.is_active() {
                    self.code.push_str("\n");
                } else if self.image.is_active() {
                    self.image.push_alt(" ");
                } else {
                    self.backend.soft_break(&mut self.output);
                }
            }
            Event::HardBreak => self.backend.hard_break(&mut self.output),
            Event::Rule => self.backend.horizontal_rule(&mut self.output),
            Event::TaskListMarker(checked) => {
                self.backend.task_list_marker(checked, &mut self.output);
            }
            Event::FootnoteReference(label) => {
                let number = self.footnotes.number(&label);
                self.backend
                    .footnote_reference(&label, number, &mut self.output);
            }
            Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Math is handled by inline extensions before parsing
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        // Alt text is plain; markup inside an image is dropped
        if self.image.is_active() {
            return;
        }
        match tag {
            Tag::Paragraph => self.backend.paragraph_start(&mut self.output),
            Tag::Heading { level, .. } => {
                self.backend
                    .heading_start(heading_level_to_num(level), &mut self.output);
            }
            Tag::BlockQuote(_) => self.backend.blockquote_start(&mut self.output),
            Tag::CodeBlock(kind) => {
                let (lang, attrs) = match kind {
                    CodeBlockKind::Fenced(ref info) if !info.is_empty() => {
                        let (lang, attrs) = parse_fence_info(info);
                        (if lang.is_empty() { None } else { Some(lang) }, attrs)
                    }
                    _ => (None, HashMap::new()),
                };
                self.pending_attrs = attrs;
                self.code.start(lang);
            }
            Tag::List(start) => self.backend.list_start(start, &mut self.output),
            Tag::Item => self.backend.item_start(&mut self.output),
            Tag::FootnoteDefinition(label) => {
                let number = self.footnotes.number(&label);
                self.backend
                    .footnote_definition_start(&label, number, &mut self.output);
            }
            Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.backend.table_start(&mut self.output);
            }
            Tag::TableHead => {
                self.table.enter_head();
                self.backend.table_head_start(&mut self.output);
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                self.backend.table_cell_start(
                    self.table.in_head(),
                    self.table.alignment(),
                    &mut self.output,
                );
            }
            Tag::Emphasis => self.backend.emphasis_start(&mut self.output),
            Tag::Strong => self.backend.strong_start(&mut self.output),
            Tag::Strikethrough => self.backend.strikethrough_start(&mut self.output),
            Tag::Link {
                dest_url, title, ..
            } => {
                self.backend
                    .link_start(&dest_url, &title, &mut self.output);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Alt text is collected until the end tag
                self.image.start(dest_url.into_string(), title.into_string());
            }
            Tag::Superscript => self.output.push_str("<sup>"),
            Tag::Subscript => self.output.push_str("<sub>"),
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        if self.image.is_active() && tag != TagEnd::Image {
            return;
        }
        match tag {
            TagEnd::Paragraph => self.backend.paragraph_end(&mut self.output),
            TagEnd::Heading(level) => {
                self.backend
                    .heading_end(heading_level_to_num(level), &mut self.output);
            }
            TagEnd::BlockQuote(_) => self.backend.blockquote_end(&mut self.output),
            TagEnd::CodeBlock => self.finish_code_block(),
            TagEnd::List(ordered) => self.backend.list_end(ordered, &mut self.output),
            TagEnd::Item => self.backend.item_end(&mut self.output),
            TagEnd::FootnoteDefinition => {
                self.backend.footnote_definition_end(&mut self.output);
            }
            TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::Image => {
                if let Some(image) = self.image.finish() {
                    self.backend
                        .image(&image.src, &image.alt, &image.title, &mut self.output);
                }
            }
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => self.backend.table_end(&mut self.output),
            TagEnd::TableHead => {
                self.backend.table_head_end(&mut self.output);
                self.table.leave_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.backend
                    .table_cell_end(self.table.in_head(), &mut self.output);
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.backend.emphasis_end(&mut self.output),
            TagEnd::Strong => self.backend.strong_end(&mut self.output),
            TagEnd::Strikethrough => self.backend.strikethrough_end(&mut self.output),
            TagEnd::Link => self.backend.link_end(&mut self.output),
            TagEnd::Superscript => self.output.push_str("</sup>"),
            TagEnd::Subscript => self.output.push_str("</sub>"),
        }
    }

    fn finish_code_block(&mut self) {
        let (lang, content) = self.code.finish();
        let attrs = std::mem::take(&mut self.pending_attrs);
        let index = self.code_block_index;
        self.code_block_index += 1;

        // Try processors in order, fall back to normal code block rendering
        let processed = lang.as_ref().is_some_and(|lang_str| {
            self.processors.iter_mut().any(|processor| {
                match processor.process(lang_str, &attrs, &content, index) {
                    ProcessResult::Placeholder(placeholder) => {
                        self.output.push_str(&placeholder);
                        true
                    }
                    ProcessResult::Inline(html) => {
                        self.output.push_str(&html);
                        true
                    }
                    ProcessResult::PassThrough => false,
                }
            })
        });

        if !processed {
            self.backend
                .code_block(lang.as_deref(), &content, &mut self.output);
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.is_active() {
            self.code.push_str(text);
        } else if self.image.is_active() {
            self.image.push_alt(text);
        } else {
            self.output.push_str(&escape_html(text));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StyledBackend;
    use larkdown_style::{StyleModel, code_theme};
    use pretty_assertions::assert_eq;
    use pulldown_cmark::{Options, Parser};

    fn backend() -> StyledBackend {
        StyledBackend::new(StyleModel::default(), code_theme("github"))
    }

    fn options() -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_FOOTNOTES
    }

    fn render(markdown: &str) -> RenderResult {
        MarkdownRenderer::new(backend()).render(Parser::new_ext(markdown, options()))
    }

    #[test]
    fn test_basic_paragraph() {
        assert_eq!(render("Hello, world!").html, "<p>Hello, world!</p>");
    }

    #[test]
    fn test_heading_has_no_id() {
        assert_eq!(render("## Section").html, "<h2>Section</h2>");
    }

    #[test]
    fn test_soft_break_becomes_br() {
        assert_eq!(render("one\ntwo").html, "<p>one<br>two</p>");
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(render("a < b & c").html, "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn test_image_alt_text_collected() {
        let html = render("![Alt *text*](image.png)").html;
        assert!(html.contains(r#"<img src="image.png" alt="Alt text""#));
    }

    #[test]
    fn test_image_alt_drops_inline_html() {
        let html = render("![a <b>bold</b> c](image.png)").html;
        assert!(html.contains(r#"<img src="image.png" alt="a bold c""#));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_table_structure() {
        let html = render("| A | B |\n|:-:|---|\n| 1 | 2 |").html;
        assert!(html.starts_with("<table><thead><tr>"));
        assert!(html.contains(r#"<th style="text-align: center">A</th><th>B</th>"#));
        assert!(html.contains("</tr></thead><tbody><tr>"));
        assert!(html.contains(r#"<td style="text-align: center">1</td><td>2</td>"#));
        assert!(html.ends_with("</tbody></table>"));
    }

    #[test]
    fn test_task_list() {
        let html = render("- [ ] todo\n- [x] done").html;
        assert!(html.contains(r#"<input type="checkbox" disabled="" /> todo"#));
        assert!(html.contains(r#"<input type="checkbox" checked="" disabled="" /> done"#));
    }

    #[test]
    fn test_strikethrough() {
        assert_eq!(render("~~gone~~").html, "<p><del>gone</del></p>");
    }

    #[test]
    fn test_footnotes_numbered_by_first_use() {
        let html = render("A[^b] B[^a]\n\n[^a]: first\n\n[^b]: second").html;
        assert!(html.contains(r##"<a href="#fn-b">[1]</a>"##));
        assert!(html.contains(r##"<a href="#fn-a">[2]</a>"##));
        assert!(html.contains(r#"id="fn-a"><sup>2</sup>"#));
    }

    // Code block processor tests

    struct PlaceholderProcessor {
        extracted: Vec<ExtractedCodeBlock>,
    }

    impl CodeBlockProcessor for PlaceholderProcessor {
        fn process(
            &mut self,
            language: &str,
            attrs: &HashMap<String, String>,
            source: &str,
            index: usize,
        ) -> ProcessResult {
            if language != "diagram" {
                return ProcessResult::PassThrough;
            }
            self.extracted.push(ExtractedCodeBlock {
                index,
                language: language.to_owned(),
                source: source.to_owned(),
                attrs: attrs.clone(),
            });
            ProcessResult::Placeholder(format!("{{{{DIAGRAM_{index}}}}}"))
        }

        fn post_process(&mut self, html: &mut String) {
            for block in &self.extracted {
                *html = html.replace(
                    &format!("{{{{DIAGRAM_{}}}}}", block.index),
                    &format!("<figure>{}</figure>", block.source.trim()),
                );
            }
        }

        fn extracted(&self) -> &[ExtractedCodeBlock] {
            &self.extracted
        }
    }

    #[test]
    fn test_processor_placeholder_resolved() {
        let markdown = "```diagram\nA -> B\n```\n\n```rust\nfn main() {}\n```";
        let mut renderer = MarkdownRenderer::new(backend()).with_processor(PlaceholderProcessor {
            extracted: Vec::new(),
        });
        let result = renderer.render(Parser::new_ext(markdown, options()));

        assert!(result.html.starts_with("<figure>A -> B</figure>"));
        assert!(result.html.contains(r#"class="language-rust""#));

        let extracted = renderer.extracted_code_blocks();
        assert_eq!(extracted.len(), 1);
        assert_eq!(extracted[0].source, "A -> B\n");
        assert_eq!(extracted[0].index, 0);
    }

    #[test]
    fn test_processor_skips_unlabelled_blocks() {
        let mut renderer = MarkdownRenderer::new(backend()).with_processor(PlaceholderProcessor {
            extracted: Vec::new(),
        });
        let result = renderer.render(Parser::new("```\nplain\n```"));
        assert!(result.html.contains("<code>plain</code>"));
        assert!(renderer.extracted_code_blocks().is_empty());
    }
}
