//! Inline extensions: spans that bypass markdown parsing.
//!
//! Before the markdown parser runs, [`InlineExtensionRegistry::protect`] scans
//! the text for extension tokens (math, for instance), renders each one and
//! swaps it for an opaque placeholder. The parser sees only the placeholder, so
//! `_` or `*` inside a formula is never read as emphasis. After rendering,
//! [`ProtectedMarkdown::restore`] puts the rendered fragments back.
//!
//! Scanning follows the same boundaries the inline parser would:
//!
//! - fenced and indented code blocks and backtick code spans are skipped,
//! - a backslash escapes the next character unless an extension claims it,
//! - a token never extends past the end of its paragraph (a blank line).
//!
//! A placeholder that lands inside a tag (image alt text, a link target) is
//! restored as its escaped source rather than as markup.

mod math;

use std::fmt::Write;
use std::ops::Range;
use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag};
use regex::Regex;

pub use math::{MathError, MathExtension, MathMlTypesetter, MathTypesetter};

use crate::parser_options;
use crate::preprocess::map_outside_fences;
use crate::state::escape_html;
use crate::util::code_span_end;

const PLACEHOLDER_OPEN: char = '\u{E000}';
const PLACEHOLDER_CLOSE: char = '\u{E001}';

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{E000}(\\d+)\u{E001}").unwrap());

static BLANK_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n[ \t]*\n").unwrap());

/// A recognized extension span.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionToken {
    /// Extension-defined kind, e.g. `"math"`.
    pub kind: &'static str,
    /// Exact source text consumed, delimiters included.
    pub raw: String,
    /// Significant inner text.
    pub text: String,
    /// Block-level display (display math).
    pub display: bool,
}

/// A tokenizer failure that aborts the whole parse.
#[derive(Debug, thiserror::Error)]
#[error("extension {name} failed: {message}")]
pub struct ExtensionError {
    pub name: &'static str,
    pub message: String,
}

/// A token rule plus its renderer.
pub trait InlineExtension: Send + Sync {
    fn name(&self) -> &'static str;

    /// Characters at which [`tokenize`](Self::tokenize) is attempted.
    fn triggers(&self) -> &'static [char];

    /// Try to recognize a token at the very start of `src`.
    ///
    /// `src` ends at the paragraph boundary. The returned token's `raw` must
    /// be a non-empty prefix of `src`.
    ///
    /// # Errors
    ///
    /// Returns an error only for failures that should abort the parse.
    /// Unrecognized input is `Ok(None)`.
    fn tokenize(&self, src: &str) -> Result<Option<ExtensionToken>, ExtensionError>;

    /// Render a token to HTML. Must not fail; errors become visible markup.
    fn render(&self, token: &ExtensionToken) -> String;
}

/// Ordered set of inline extensions.
#[derive(Default)]
pub struct InlineExtensionRegistry {
    extensions: Vec<Box<dyn InlineExtension>>,
}

impl InlineExtensionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the math extension using MathML output.
    #[must_use]
    pub fn with_math() -> Self {
        Self::new().with_extension(MathExtension::new(MathMlTypesetter))
    }

    /// Add an extension. Earlier extensions win at the same position.
    #[must_use]
    pub fn with_extension<E: InlineExtension + 'static>(mut self, extension: E) -> Self {
        self.extensions.push(Box::new(extension));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.extensions.iter().map(|e| e.name())
    }

    /// Replace every extension token in `markdown` with a placeholder.
    ///
    /// # Errors
    ///
    /// Returns the first [`ExtensionError`] raised by a tokenizer.
    pub fn protect(&self, markdown: &str) -> Result<ProtectedMarkdown, ExtensionError> {
        let mut fragments = Vec::new();
        if self.is_empty() {
            return Ok(ProtectedMarkdown {
                markdown: markdown.to_owned(),
                fragments,
            });
        }

        let mut failure = None;
        let mut protect_run = |run: &str| {
            if failure.is_some() {
                return run.to_owned();
            }
            match self.protect_run(run, &mut fragments) {
                Ok(text) => text,
                Err(e) => {
                    failure = Some(e);
                    run.to_owned()
                }
            }
        };

        let mut protected = String::with_capacity(markdown.len());
        let mut copied = 0;
        for code in indented_code_ranges(markdown) {
            let outside = &markdown[copied..code.start];
            protected.push_str(&map_outside_fences(outside, &mut protect_run));
            protected.push_str(&markdown[code.clone()]);
            copied = code.end;
        }
        protected.push_str(&map_outside_fences(&markdown[copied..], &mut protect_run));

        match failure {
            Some(e) => Err(e),
            None => Ok(ProtectedMarkdown {
                markdown: protected,
                fragments,
            }),
        }
    }

    fn protect_run(
        &self,
        run: &str,
        fragments: &mut Vec<Fragment>,
    ) -> Result<String, ExtensionError> {
        let mut out = String::with_capacity(run.len());
        let mut copied = 0;
        let mut i = 0;

        while let Some(c) = run[i..].chars().next() {
            if let Some((extension, token)) = self.tokenize_at(run, i, c)? {
                out.push_str(&run[copied..i]);
                let _ = write!(out, "{PLACEHOLDER_OPEN}{}{PLACEHOLDER_CLOSE}", fragments.len());
                i += token.raw.len();
                fragments.push(Fragment {
                    html: extension.render(&token),
                    source: token.raw,
                });
                copied = i;
                continue;
            }

            i = match c {
                '\\' => {
                    let escaped = run[i + 1..].chars().next().map_or(0, char::len_utf8);
                    i + 1 + escaped
                }
                '`' => code_span_end(run, i).unwrap_or_else(|| {
                    i + run[i..].bytes().take_while(|&b| b == b'`').count()
                }),
                _ => i + c.len_utf8(),
            };
        }

        out.push_str(&run[copied..]);
        Ok(out)
    }

    fn tokenize_at(
        &self,
        run: &str,
        at: usize,
        c: char,
    ) -> Result<Option<(&dyn InlineExtension, ExtensionToken)>, ExtensionError> {
        if !self.extensions.iter().any(|e| e.triggers().contains(&c)) {
            return Ok(None);
        }
        let limit = BLANK_LINE.find_at(run, at).map_or(run.len(), |m| m.start());
        let src = &run[at..limit];

        for extension in &self.extensions {
            if !extension.triggers().contains(&c) {
                continue;
            }
            if let Some(token) = extension.tokenize(src)?
                && !token.raw.is_empty()
                && src.starts_with(&token.raw)
            {
                return Ok(Some((extension.as_ref(), token)));
            }
        }
        Ok(None)
    }
}

/// Byte ranges of indented code blocks, which render their text literally.
fn indented_code_ranges(markdown: &str) -> Vec<Range<usize>> {
    Parser::new_ext(markdown, parser_options())
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Indented)) => Some(range),
            _ => None,
        })
        .collect()
}

#[derive(Clone, Debug)]
struct Fragment {
    html: String,
    /// Token source, used where markup is not allowed.
    source: String,
}

/// Markdown with extension tokens swapped for placeholders.
#[derive(Clone, Debug, Default)]
pub struct ProtectedMarkdown {
    markdown: String,
    fragments: Vec<Fragment>,
}

impl ProtectedMarkdown {
    /// Text to hand to the markdown parser.
    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    /// Number of protected tokens.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Replace placeholders in rendered HTML with their fragments.
    ///
    /// Inside a tag the escaped token source is used instead.
    #[must_use]
    pub fn restore(&self, html: &str) -> String {
        if self.fragments.is_empty() {
            return html.to_owned();
        }

        let mut out = String::with_capacity(html.len());
        let mut copied = 0;
        let mut in_tag = false;
        for m in PLACEHOLDER.find_iter(html) {
            let between = &html[copied..m.start()];
            if let Some(pos) = between.rfind(['<', '>']) {
                in_tag = between.as_bytes()[pos] == b'<';
            }
            out.push_str(between);

            let fragment = m
                .as_str()
                .trim_matches([PLACEHOLDER_OPEN, PLACEHOLDER_CLOSE])
                .parse::<usize>()
                .ok()
                .and_then(|n| self.fragments.get(n));
            match fragment {
                Some(fragment) if in_tag => out.push_str(&escape_html(&fragment.source)),
                Some(fragment) => out.push_str(&fragment.html),
                None => out.push_str(m.as_str()),
            }
            copied = m.end();
        }
        out.push_str(&html[copied..]);
        out
    }
}
