//! Inline-styled HTML backend.
//!
//! Every element carries its resolved style as a `style` attribute. A handful
//! of properties are forced on top of the template so that the output reads
//! the same wherever it is pasted.

use std::fmt::Write;

use larkdown_style::{BlockElement, CodeTheme, InlineElement, ResolvedStyle, StyleMap, StyleModel};

use crate::backend::RenderBackend;
use crate::highlight::CodeHighlighter;
use crate::state::escape_html;

/// Blockquote border color when no theme color is set.
const QUOTE_BORDER_FALLBACK: &str = "#1a1a1a";

/// Backend producing HTML with inline styles from a [`StyleModel`].
#[derive(Clone, Debug)]
pub struct StyledBackend {
    styles: StyleModel,
    code_theme: &'static CodeTheme,
    highlighter: CodeHighlighter,
}

impl StyledBackend {
    #[must_use]
    pub fn new(styles: StyleModel, code_theme: &'static CodeTheme) -> Self {
        Self {
            styles,
            code_theme,
            highlighter: CodeHighlighter::new(code_theme),
        }
    }

    #[must_use]
    pub fn from_resolved(resolved: &ResolvedStyle<'_>) -> Self {
        Self::new(resolved.styles.clone(), resolved.code_theme)
    }

    pub fn styles(&self) -> &StyleModel {
        &self.styles
    }

    fn block(&self, kind: BlockElement) -> StyleMap {
        self.styles.block_style(kind).cloned().unwrap_or_default()
    }

    fn inline(&self, kind: InlineElement) -> StyleMap {
        self.styles.inline_style(kind).cloned().unwrap_or_default()
    }

    fn theme_color(&self) -> Option<&str> {
        self.styles.theme_color()
    }
}

/// ` style="..."`, or nothing for an empty map.
fn style_attr(map: &StyleMap) -> String {
    let style = map.to_inline_style();
    if style.is_empty() {
        String::new()
    } else {
        format!(r#" style="{}""#, escape_html(&style))
    }
}

impl RenderBackend for StyledBackend {
    fn heading_start(&self, level: u8, out: &mut String) {
        let mut style = BlockElement::heading(level)
            .map(|kind| self.block(kind))
            .unwrap_or_default();
        if let Some(color) = self.theme_color() {
            style.insert("color", color);
        }
        let _ = write!(out, "<h{level}{}>", style_attr(&style));
    }

    fn paragraph_start(&self, out: &mut String) {
        let mut style = self.block(BlockElement::Paragraph);
        for name in ["font-size", "line-height"] {
            if let Some(value) = self.styles.base.get(name) {
                style.insert_if_absent(name, value);
            }
        }
        let _ = write!(out, "<p{}>", style_attr(&style));
    }

    fn blockquote_start(&self, out: &mut String) {
        let mut style = self.block(BlockElement::Blockquote);
        let border = self.theme_color().unwrap_or(QUOTE_BORDER_FALLBACK);
        style.insert("border-left", format!("4px solid {border}"));
        let _ = write!(out, "<blockquote{}>", style_attr(&style));
    }

    fn code_block(&self, lang: Option<&str>, content: &str, out: &mut String) {
        let pre_style = style_attr(&self.block(BlockElement::CodePre));
        let code_style = style_attr(&self.block(BlockElement::Code));
        let body = self
            .highlighter
            .highlight(content.trim_end_matches('\n'), lang);

        let _ = write!(out, r#"<pre class="{}"{pre_style}>"#, self.code_theme.class_name());
        match lang.filter(|l| !l.is_empty()) {
            Some(lang) => {
                let _ = write!(
                    out,
                    r#"<code class="language-{}"{code_style}>"#,
                    escape_html(lang)
                );
            }
            None => {
                let _ = write!(out, "<code{code_style}>");
            }
        }
        out.push_str(&body);
        out.push_str("</code></pre>");
    }

    fn inline_code(&self, code: &str, out: &mut String) {
        let style = self.inline(InlineElement::CodeSpan);
        let _ = write!(out, "<code{}>{}</code>", style_attr(&style), escape_html(code));
    }

    fn emphasis_start(&self, out: &mut String) {
        let style = self.inline(InlineElement::Emphasis).with("font-style", "italic");
        let _ = write!(out, "<em{}>", style_attr(&style));
    }

    fn strong_start(&self, out: &mut String) {
        let mut style = self.inline(InlineElement::Strong);
        if let Some(color) = self.theme_color() {
            style.insert("color", color);
        }
        style.insert("font-weight", "bold");
        let _ = write!(out, "<strong{}>", style_attr(&style));
    }

    fn strikethrough_start(&self, out: &mut String) {
        let style = self.inline(InlineElement::Strikethrough);
        let _ = write!(out, "<del{}>", style_attr(&style));
    }

    fn link_start(&self, href: &str, title: &str, out: &mut String) {
        let style = self.inline(InlineElement::Link);
        let _ = write!(out, r#"<a href="{}""#, escape_html(href));
        if !title.is_empty() {
            let _ = write!(out, r#" title="{}""#, escape_html(title));
        }
        let _ = write!(out, "{}>", style_attr(&style));
    }

    fn image(&self, src: &str, alt: &str, title: &str, out: &mut String) {
        let style = self
            .block(BlockElement::Image)
            .with("max-width", "100%")
            .with("display", "block")
            .with("margin", "0.5em auto");
        let _ = write!(
            out,
            r#"<img src="{}" alt="{}""#,
            escape_html(src),
            escape_html(alt)
        );
        if !title.is_empty() {
            let _ = write!(out, r#" title="{}""#, escape_html(title));
        }
        let _ = write!(out, "{}>", style_attr(&style));
    }

    fn list_start(&self, start: Option<u64>, out: &mut String) {
        let (tag, kind, marker) = match start {
            Some(_) => ("ol", BlockElement::OrderedList, "decimal"),
            None => ("ul", BlockElement::UnorderedList, "disc"),
        };
        let style = self
            .block(kind)
            .with("list-style", marker)
            .with("padding-left", "2em");
        let _ = write!(out, "<{tag}");
        if let Some(n) = start.filter(|&n| n != 1) {
            let _ = write!(out, r#" start="{n}""#);
        }
        let _ = write!(out, "{}>", style_attr(&style));
    }

    fn item_start(&self, out: &mut String) {
        let style = self
            .inline(InlineElement::ListItem)
            .with("margin-bottom", "8px")
            .with("display", "list-item");
        let _ = write!(out, "<li{}>", style_attr(&style));
    }

    fn task_list_marker(&self, checked: bool, out: &mut String) {
        if checked {
            out.push_str(r#"<input type="checkbox" checked="" disabled="" /> "#);
        } else {
            out.push_str(r#"<input type="checkbox" disabled="" /> "#);
        }
    }

    fn table_start(&self, out: &mut String) {
        let _ = write!(out, "<table{}>", style_attr(&self.block(BlockElement::Table)));
    }

    fn table_head_start(&self, out: &mut String) {
        let style = self.block(BlockElement::TableHead);
        let _ = write!(out, "<thead{}><tr>", style_attr(&style));
    }

    fn table_cell_start(&self, head: bool, alignment: Option<&str>, out: &mut String) {
        let mut style = self.block(BlockElement::TableCell);
        if let Some(align) = alignment {
            style.insert("text-align", align);
        }
        let tag = if head { "th" } else { "td" };
        let _ = write!(out, "<{tag}{}>", style_attr(&style));
    }

    fn footnote_reference(&self, label: &str, number: usize, out: &mut String) {
        let style = self.inline(InlineElement::Footnote);
        let _ = write!(
            out,
            r##"<sup class="footnote-ref"{}><a href="#fn-{}">[{number}]</a></sup>"##,
            style_attr(&style),
            escape_html(label)
        );
    }

    fn footnote_definition_start(&self, label: &str, number: usize, out: &mut String) {
        let style = self.block(BlockElement::Footnotes);
        let _ = write!(
            out,
            r#"<div class="footnote-definition" id="fn-{}"{}><sup>{number}</sup> "#,
            escape_html(label),
            style_attr(&style)
        );
    }

    /// Bare `<strong>` tags come from the emphasis rewrite and are styled
    /// like markdown strong text.
    fn raw_html(&self, html: &str, out: &mut String) {
        match html {
            "<strong>" => self.strong_start(out),
            "</strong>" => self.strong_end(out),
            _ => out.push_str(html),
        }
    }
}
