//! Render backend trait: one rendering function per node kind.
//!
//! The renderer walks markdown events and calls into a backend for every
//! element it opens or closes. A backend owns whatever it needs to style its
//! output (see [`StyledBackend`](crate::StyledBackend)), so nothing is shared
//! between render calls.

use std::fmt::Write;

/// Backend trait for element rendering.
///
/// Methods ending in `_start` write an opening tag, `_end` the matching
/// closing tag. Closing tags and a few simple elements have plain HTML
/// defaults.
pub trait RenderBackend {
    /// Open a heading of `level` (1-6).
    fn heading_start(&self, level: u8, out: &mut String);

    fn heading_end(&self, level: u8, out: &mut String) {
        let _ = write!(out, "</h{level}>");
    }

    fn paragraph_start(&self, out: &mut String);

    fn paragraph_end(&self, out: &mut String) {
        out.push_str("</p>");
    }

    fn blockquote_start(&self, out: &mut String);

    fn blockquote_end(&self, out: &mut String) {
        out.push_str("</blockquote>");
    }

    /// Render a fenced or indented code block.
    ///
    /// # Arguments
    ///
    /// * `lang` - Optional language identifier (e.g., "rust", "python")
    /// * `content` - The raw code content
    /// * `out` - Output buffer to write to
    fn code_block(&self, lang: Option<&str>, content: &str, out: &mut String);

    fn inline_code(&self, code: &str, out: &mut String);

    fn emphasis_start(&self, out: &mut String);

    fn emphasis_end(&self, out: &mut String) {
        out.push_str("</em>");
    }

    fn strong_start(&self, out: &mut String);

    fn strong_end(&self, out: &mut String) {
        out.push_str("</strong>");
    }

    fn strikethrough_start(&self, out: &mut String);

    fn strikethrough_end(&self, out: &mut String) {
        out.push_str("</del>");
    }

    /// Open a link. `title` is empty when the link has none.
    fn link_start(&self, href: &str, title: &str, out: &mut String);

    fn link_end(&self, out: &mut String) {
        out.push_str("</a>");
    }

    /// Render an image. `title` is empty when the image has none.
    fn image(&self, src: &str, alt: &str, title: &str, out: &mut String);

    /// Open a list. `start` is `Some` for ordered lists.
    fn list_start(&self, start: Option<u64>, out: &mut String);

    fn list_end(&self, ordered: bool, out: &mut String) {
        out.push_str(if ordered { "</ol>" } else { "</ul>" });
    }

    fn item_start(&self, out: &mut String);

    fn item_end(&self, out: &mut String) {
        out.push_str("</li>");
    }

    /// Render a task list marker.
    fn task_list_marker(&self, checked: bool, out: &mut String) {
        if checked {
            out.push_str(r#"<input type="checkbox" checked disabled> "#);
        } else {
            out.push_str(r#"<input type="checkbox" disabled> "#);
        }
    }

    fn table_start(&self, out: &mut String);

    fn table_end(&self, out: &mut String) {
        out.push_str("</tbody></table>");
    }

    fn table_head_start(&self, out: &mut String);

    fn table_head_end(&self, out: &mut String) {
        out.push_str("</tr></thead><tbody>");
    }

    /// Open a `th` (header row) or `td` cell with its column alignment.
    fn table_cell_start(&self, head: bool, alignment: Option<&str>, out: &mut String);

    fn table_cell_end(&self, head: bool, out: &mut String) {
        out.push_str(if head { "</th>" } else { "</td>" });
    }

    /// Render a footnote reference with its one-based number.
    fn footnote_reference(&self, label: &str, number: usize, out: &mut String);

    fn footnote_definition_start(&self, label: &str, number: usize, out: &mut String);

    fn footnote_definition_end(&self, out: &mut String) {
        out.push_str("</div>");
    }

    /// Inline or block HTML from the source.
    fn raw_html(&self, html: &str, out: &mut String) {
        out.push_str(html);
    }

    /// A line break inside a paragraph. Rendered as `<br>`.
    fn soft_break(&self, out: &mut String) {
        out.push_str("<br>");
    }

    fn hard_break(&self, out: &mut String) {
        out.push_str("<br>");
    }

    fn horizontal_rule(&self, out: &mut String) {
        out.push_str("<hr>");
    }
}
