//! Context carried between events while walking one document.

use pulldown_cmark::Alignment;

/// Text of the code block being collected, held until its end tag so a
/// processor can claim it or the backend can highlight it in one piece.
#[derive(Default)]
pub struct CodeCapture {
    open: Option<(Option<String>, String)>,
}

impl CodeCapture {
    pub fn start(&mut self, language: Option<String>) {
        self.open = Some((language, String::new()));
    }

    /// Close the block, returning its language and text.
    pub fn finish(&mut self) -> (Option<String>, String) {
        self.open.take().unwrap_or_default()
    }

    pub fn is_active(&self) -> bool {
        self.open.is_some()
    }

    pub fn push_str(&mut self, text: &str) {
        if let Some((_, buffer)) = &mut self.open {
            buffer.push_str(text);
        }
    }
}

/// Position inside a table, used to pick the `thead` style and the
/// per-column `text-align` override for each cell.
#[derive(Default)]
pub struct TableCursor {
    alignments: Vec<Alignment>,
    in_head: bool,
    column: usize,
}

impl TableCursor {
    pub fn start(&mut self, alignments: Vec<Alignment>) {
        *self = Self {
            alignments,
            ..Self::default()
        };
    }

    pub fn enter_head(&mut self) {
        self.in_head = true;
        self.column = 0;
    }

    pub fn leave_head(&mut self) {
        self.in_head = false;
    }

    pub fn start_row(&mut self) {
        self.column = 0;
    }

    pub fn next_cell(&mut self) {
        self.column += 1;
    }

    pub fn in_head(&self) -> bool {
        self.in_head
    }

    /// `text-align` for the current column; `None` keeps the template's cell style.
    pub fn alignment(&self) -> Option<&'static str> {
        match self.alignments.get(self.column)? {
            Alignment::Left => Some("left"),
            Alignment::Center => Some("center"),
            Alignment::Right => Some("right"),
            Alignment::None => None,
        }
    }
}

/// An image waiting for its end tag.
///
/// Everything between the start and end tag flattens into plain alt text.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PendingImage {
    pub src: String,
    pub title: String,
    pub alt: String,
}

#[derive(Default)]
pub struct ImageCapture {
    pending: Option<PendingImage>,
}

impl ImageCapture {
    pub fn start(&mut self, src: String, title: String) {
        self.pending = Some(PendingImage {
            src,
            title,
            alt: String::new(),
        });
    }

    pub fn finish(&mut self) -> Option<PendingImage> {
        self.pending.take()
    }

    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    pub fn push_alt(&mut self, text: &str) {
        if let Some(image) = &mut self.pending {
            image.alt.push_str(text);
        }
    }
}

/// Footnote label numbering in order of first appearance.
#[derive(Default)]
pub struct FootnoteState {
    labels: Vec<String>,
}

impl FootnoteState {
    /// One-based number for `label`, assigning the next number on first use.
    pub fn number(&mut self, label: &str) -> usize {
        if let Some(pos) = self.labels.iter().position(|l| l == label) {
            return pos + 1;
        }
        self.labels.push(label.to_owned());
        self.labels.len()
    }
}

/// Escape text for HTML content and double- or single-quoted attributes.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
