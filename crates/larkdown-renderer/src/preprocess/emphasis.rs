//! `**strong**` normalization.
//!
//! CommonMark refuses `**` runs that sit next to CJK punctuation, so
//! `**注意：**内容` would render literally. Such pairs are rewritten to raw
//! `<strong>` tags, which the styled backend renders like markdown strong text.

use std::sync::LazyLock;

use regex::Regex;

use crate::util::code_span_end;

static STRONG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^*\n]+)\*\*").unwrap());

/// Rewrite `**text**` outside code spans and HTML tags.
pub(crate) fn normalize_strong(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        rewrite_line(line, &mut out);
    }
    out
}

/// Split a line into rewritable text and protected segments (code spans, tags).
fn rewrite_line(line: &str, out: &mut String) {
    let bytes = line.as_bytes();
    let mut plain_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let protected_end = match bytes[i] {
            b'`' => code_span_end(line, i),
            b'<' => line[i..].find('>').map(|end| i + end + 1),
            _ => None,
        };

        match protected_end {
            Some(end) => {
                out.push_str(&STRONG.replace_all(&line[plain_start..i], "<strong>$1</strong>"));
                out.push_str(&line[i..end]);
                plain_start = end;
                i = end;
            }
            None => i += 1,
        }
    }

    out.push_str(&STRONG.replace_all(&line[plain_start..], "<strong>$1</strong>"));
}
