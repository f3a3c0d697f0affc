//! Standalone HTML pages for printing.
//!
//! A preview fragment depends on the host page: its dark-mode class, its
//! toolbar buttons, images served from local paths. [`ExportDocument`] turns
//! it into a page a PDF service can render on its own.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use regex::{Captures, Regex};

static CLASS_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\bclass\s*=\s*")([^"]*)(")"#).unwrap());

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9-]*)([^>]*)>").unwrap());

static IMG_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(<img\b[^>]*?\bsrc\s*=\s*")([^"]*)(")"#).unwrap());

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Classes of host-page controls that must not be printed.
const UNPRINTABLE_CLASSES: &[&str] = &["no-print", "copy-btn"];

/// Layout fixes so the service paginates the whole document.
const PRINT_CSS: &str = r"
@media print {
  body { -webkit-print-color-adjust: exact; print-color-adjust: exact; }
}
html, body {
  height: auto !important;
  min-height: 100% !important;
  overflow: visible !important;
  display: block !important;
  position: static !important;
}
body { margin: 0; padding: 20px; background-color: white !important; }
#preview-content, .markdown-preview {
  height: auto !important;
  max-height: none !important;
  overflow: visible !important;
  display: block !important;
  position: relative !important;
  width: 100% !important;
}
#preview-content { padding: 0 !important; margin: 0 !important; max-width: 100% !important; }
* { scrollbar-width: none !important; }
pre, table, img, .mermaid-diagram { page-break-inside: avoid; }
";

/// Builder for a self-contained HTML page.
#[derive(Clone, Debug)]
pub struct ExportDocument {
    content: String,
    title: String,
    base_dir: Option<PathBuf>,
    stylesheet: String,
}

impl ExportDocument {
    /// Page around rendered preview HTML.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            title: "Document".to_owned(),
            base_dir: None,
            stylesheet: String::new(),
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Directory relative image paths are resolved against.
    #[must_use]
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Extra CSS placed before the print fixes.
    #[must_use]
    pub fn stylesheet(mut self, css: impl Into<String>) -> Self {
        self.stylesheet = css.into();
        self
    }

    /// Assemble the page.
    pub fn build(&self) -> String {
        let content = strip_class(&self.content, "dark");
        let content = remove_unprintable(&content);
        let content = embed_images(&content, self.base_dir.as_deref());

        format!(
            r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>{stylesheet}{PRINT_CSS}</style>
</head>
<body>
<div id="preview-content" class="markdown-preview">{content}</div>
</body>
</html>
"#,
            title = escape_text(&self.title),
            stylesheet = self.stylesheet,
        )
    }
}

/// Remove one class token from every `class` attribute.
fn strip_class(html: &str, class: &str) -> String {
    CLASS_ATTR
        .replace_all(html, |caps: &Captures<'_>| {
            let kept: Vec<&str> = caps[2].split_whitespace().filter(|c| *c != class).collect();
            format!("{}{}{}", &caps[1], kept.join(" "), &caps[3])
        })
        .into_owned()
}

fn is_unprintable(name: &str, attrs: &str) -> bool {
    if name.eq_ignore_ascii_case("button") {
        return true;
    }
    CLASS_ATTR.captures(attrs).is_some_and(|caps| {
        caps[2]
            .split_whitespace()
            .any(|c| UNPRINTABLE_CLASSES.contains(&c))
    })
}

/// Drop buttons and `no-print` elements together with their content.
fn remove_unprintable(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut copied = 0;
    let mut search = 0;

    while let Some(caps) = TAG.captures_at(html, search) {
        let Some(tag) = caps.get(0) else { break };
        search = tag.end();
        if !caps[1].is_empty() || !is_unprintable(&caps[2], &caps[3]) {
            continue;
        }

        let self_closing = caps[3].trim_end().ends_with('/');
        let end = element_end(html, &caps[2], tag.end(), self_closing);
        out.push_str(&html[copied..tag.start()]);
        copied = end;
        search = end;
    }

    out.push_str(&html[copied..]);
    out
}

/// Byte offset just past the element whose opening tag ends at `from`.
///
/// An unclosed element ends with its opening tag.
fn element_end(html: &str, name: &str, from: usize, self_closing: bool) -> usize {
    if self_closing || VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name)) {
        return from;
    }

    let mut depth = 1usize;
    for caps in TAG.captures_iter(&html[from..]) {
        if !caps[2].eq_ignore_ascii_case(name) {
            continue;
        }
        if !caps[1].is_empty() {
            depth -= 1;
            if depth == 0 {
                return caps.get(0).map_or(from, |m| from + m.end());
            }
        } else if !caps[3].trim_end().ends_with('/') {
            depth += 1;
        }
    }
    from
}

/// Inline local images as base64 data URIs.
///
/// Remote URLs and data URIs are kept. Unreadable files keep their `src`.
fn embed_images(html: &str, base_dir: Option<&Path>) -> String {
    IMG_SRC
        .replace_all(html, |caps: &Captures<'_>| {
            let src = unescape_attr(&caps[2]);
            match local_path(&src, base_dir) {
                Some(path) => match data_uri(&path) {
                    Ok(uri) => format!("{}{uri}{}", &caps[1], &caps[3]),
                    Err(e) => {
                        tracing::warn!(error = %e, path = %path.display(), "Failed to embed image");
                        caps[0].to_owned()
                    }
                },
                None => caps[0].to_owned(),
            }
        })
        .into_owned()
}

fn local_path(src: &str, base_dir: Option<&Path>) -> Option<PathBuf> {
    if src.is_empty() || src.starts_with("data:") || src.starts_with("//") {
        return None;
    }
    let path = match src.strip_prefix("file://") {
        Some(path) => path,
        None if src.contains("://") => return None,
        None => src,
    };

    let path = Path::new(path);
    match base_dir {
        Some(dir) if path.is_relative() => Some(dir.join(path)),
        _ => Some(path.to_path_buf()),
    }
}

fn data_uri(path: &Path) -> std::io::Result<String> {
    let data = fs::read(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Ok(format!(
        "data:{};base64,{}",
        mime.essence_str(),
        BASE64_STANDARD.encode(&data)
    ))
}

fn unescape_attr(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_dark_class() {
        let html = r#"<section class="markdown-preview dark" style="x"><p class="dark">a</p><p class="darker">b</p></section>"#;
        assert_eq!(
            strip_class(html, "dark"),
            r#"<section class="markdown-preview" style="x"><p class="">a</p><p class="darker">b</p></section>"#
        );
    }

    #[test]
    fn test_remove_unprintable() {
        let html = concat!(
            "<p>keep</p>",
            r#"<div class="toolbar no-print"><div>nested</div><span>x</span></div>"#,
            "<button>Copy</button>",
            r#"<img class="no-print" src="a.png">"#,
            "<p>tail</p>",
        );
        assert_eq!(remove_unprintable(html), "<p>keep</p><p>tail</p>");
    }

    #[test]
    fn test_unclosed_unprintable_drops_open_tag_only() {
        let html = r#"<div class="no-print"><p>orphan</p>"#;
        assert_eq!(remove_unprintable(html), "<p>orphan</p>");
    }

    #[test]
    fn test_embed_local_image() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = b"\x89PNG\r\n\x1a\nfake";
        fs::write(dir.path().join("chart.png"), bytes).unwrap();

        let html = r#"<p><img src="chart.png" alt="chart"></p>"#;
        let embedded = embed_images(html, Some(dir.path()));
        assert_eq!(
            embedded,
            format!(
                r#"<p><img src="data:image/png;base64,{}" alt="chart"></p>"#,
                BASE64_STANDARD.encode(bytes)
            )
        );
    }

    #[test]
    fn test_remote_and_data_images_untouched() {
        let html = concat!(
            r#"<img src="https://example.com/a.png">"#,
            r#"<img src="data:image/gif;base64,R0lGOD">"#,
            r#"<img src="//cdn.example.com/b.png">"#,
        );
        assert_eq!(embed_images(html, None), html);
    }

    #[test]
    fn test_missing_image_keeps_src() {
        let dir = tempfile::tempdir().unwrap();
        let html = r#"<img src="missing.png">"#;
        assert_eq!(embed_images(html, Some(dir.path())), html);
    }

    #[test]
    fn test_build_page() {
        let content = r#"<section class="markdown-preview default-template dark"><p>hi</p></section>"#;
        let page = ExportDocument::new(content).title("Report <draft>").build();

        assert!(page.starts_with("<!DOCTYPE html>\n<html lang=\"zh-CN\">"));
        assert!(page.contains("<title>Report &lt;draft&gt;</title>"));
        assert!(page.contains(
            r#"<div id="preview-content" class="markdown-preview"><section class="markdown-preview default-template"><p>hi</p></section></div>"#
        ));
        assert!(page.contains("@media print"));
    }
}
