//! Placeholder markup for deferred diagrams.
//!
//! Phase one of diagram rendering writes a `mermaid-diagram` container that
//! carries the diagram id and its URL-encoded source. Phase two finds those
//! containers again by id and swaps in the rasterized SVG or an error block.

use std::ops::Range;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use larkdown_renderer::escape_html;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use regex::Regex;

/// Characters escaped the way `encodeURIComponent` escapes them.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const CONTAINER_STYLE: &str = "text-align: center; margin: 1em 0; padding: 1em; border: 1px solid var(--mermaid-border-color, #e5e7eb); border-radius: 8px; background: var(--mermaid-bg-color, #ffffff);";

const LOADING: &str = r#"<div class="mermaid-loading" style="color: var(--text-color, #666); font-style: italic;">Loading diagram...</div>"#;

const ERROR_STYLE: &str = "color: #dc2626; background: #fef2f2; border: 1px solid #fecaca; border-radius: 4px; padding: 1em; margin: 1em 0;";

const ERROR_SOURCE_STYLE: &str = "margin-top: 0.5em; font-size: 0.9em; background: rgba(0,0,0,0.1); padding: 0.5em; border-radius: 4px;";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<div class="mermaid-diagram" data-diagram-id="([^"]+)" data-diagram-text="([^"]*)"[^>]*><div class="mermaid-loading"[^>]*>[^<]*</div></div>"#,
    )
    .unwrap()
});

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// New diagram id: `mermaid-diagram-{unix millis}-{process counter}`.
#[must_use]
pub fn next_diagram_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis());
    let n = COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    format!("mermaid-diagram-{millis}-{n}")
}

#[must_use]
pub fn encode_source(source: &str) -> String {
    utf8_percent_encode(source, COMPONENT).to_string()
}

/// Decode a `data-diagram-text` value. Invalid UTF-8 is replaced lossily.
#[must_use]
pub fn decode_source(encoded: &str) -> String {
    percent_decode_str(encoded).decode_utf8_lossy().into_owned()
}

/// Placeholder container with its loading message.
#[must_use]
pub fn placeholder_html(id: &str, source: &str) -> String {
    format!(
        r#"<div class="mermaid-diagram" data-diagram-id="{}" data-diagram-text="{}" style="{CONTAINER_STYLE}">{LOADING}</div>"#,
        escape_html(id),
        encode_source(source)
    )
}

/// Container holding a rasterized diagram.
#[must_use]
pub fn rendered_html(id: &str, source: &str, svg: &str) -> String {
    format!(
        r#"<div class="mermaid-diagram mermaid-rendered" data-diagram-id="{}" data-diagram-text="{}" style="{CONTAINER_STYLE}">{svg}</div>"#,
        escape_html(id),
        encode_source(source)
    )
}

/// Container holding a visible error for one diagram.
#[must_use]
pub fn error_html(id: &str, source: &str, message: &str) -> String {
    format!(
        r#"<div class="mermaid-diagram" data-diagram-id="{}" data-diagram-text="{}" style="{CONTAINER_STYLE}"><div class="mermaid-error" style="{ERROR_STYLE}"><strong>Mermaid Error:</strong> {}<pre style="{ERROR_SOURCE_STYLE}">{}</pre></div></div>"#,
        escape_html(id),
        encode_source(source),
        escape_html(message),
        escape_html(source)
    )
}

/// A placeholder found in rendered HTML.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placeholder {
    pub id: String,
    /// Decoded diagram source.
    pub source: String,
    /// Byte range of the whole container in the scanned HTML.
    pub span: Range<usize>,
}

/// All unrendered placeholders in `html`, in document order.
#[must_use]
pub fn find_placeholders(html: &str) -> Vec<Placeholder> {
    PLACEHOLDER
        .captures_iter(html)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(Placeholder {
                id: caps[1].to_owned(),
                source: decode_source(&caps[2]),
                span: whole.range(),
            })
        })
        .collect()
}
