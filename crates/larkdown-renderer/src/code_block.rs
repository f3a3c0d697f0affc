//! Block extensions: processors for special fenced code blocks.
//!
//! A fenced block whose language a processor recognizes (a `mermaid` diagram,
//! for instance) bypasses syntax highlighting. The processor either emits
//! markup immediately or leaves a placeholder that it replaces in
//! [`post_process`](CodeBlockProcessor::post_process).
//!
//! Processors are checked in registration order; the first one returning a
//! non-`PassThrough` result wins.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use larkdown_renderer::{CodeBlockProcessor, ExtractedCodeBlock, ProcessResult};
//!
//! struct ChartProcessor {
//!     extracted: Vec<ExtractedCodeBlock>,
//! }
//!
//! impl CodeBlockProcessor for ChartProcessor {
//!     fn process(
//!         &mut self,
//!         language: &str,
//!         attrs: &HashMap<String, String>,
//!         source: &str,
//!         index: usize,
//!     ) -> ProcessResult {
//!         if language != "chart" {
//!             return ProcessResult::PassThrough;
//!         }
//!         self.extracted.push(ExtractedCodeBlock {
//!             index,
//!             language: language.to_owned(),
//!             source: source.to_owned(),
//!             attrs: attrs.clone(),
//!         });
//!         ProcessResult::Placeholder(format!("{{{{CHART_{index}}}}}"))
//!     }
//!
//!     fn extracted(&self) -> &[ExtractedCodeBlock] {
//!         &self.extracted
//!     }
//! }
//! ```

use std::collections::HashMap;

/// Result of processing a code block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessResult {
    /// Replace the block with a placeholder resolved in `post_process`.
    Placeholder(String),

    /// Replace the block with HTML immediately.
    Inline(String),

    /// Not handled here; render as a highlighted code block.
    PassThrough,
}

/// A code block captured for deferred processing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedCodeBlock {
    /// Zero-based index of this code block in the document.
    pub index: usize,
    /// Language identifier from the fence (e.g., "mermaid").
    pub language: String,
    /// Raw, unescaped source of the block.
    pub source: String,
    /// Attributes parsed from the fence (`theme=dark` → {"theme": "dark"}).
    pub attrs: HashMap<String, String>,
}

/// Processor for special fenced code blocks.
pub trait CodeBlockProcessor {
    /// Process a code block.
    ///
    /// # Arguments
    ///
    /// * `language` - Language identifier from fence info string
    /// * `attrs` - Attributes parsed from fence (key=value pairs)
    /// * `source` - Raw content of the code block
    /// * `index` - Zero-based index of the block in the document
    fn process(
        &mut self,
        language: &str,
        attrs: &HashMap<String, String>,
        source: &str,
        index: usize,
    ) -> ProcessResult;

    /// Replace placeholders after the document has been rendered.
    ///
    /// Default implementation is a no-op.
    fn post_process(&mut self, _html: &mut String) {}

    /// Blocks captured during rendering.
    fn extracted(&self) -> &[ExtractedCodeBlock] {
        &[]
    }

    /// Warnings generated during processing.
    fn warnings(&self) -> &[String] {
        &[]
    }
}

/// Parse fence info string into language and attributes.
///
/// Format: `language [key=value ...]`
#[must_use]
pub(crate) fn parse_fence_info(info: &str) -> (String, HashMap<String, String>) {
    let mut parts = info.split_whitespace();
    let language = parts.next().unwrap_or("").to_owned();

    let mut attrs = HashMap::new();
    for part in parts {
        if let Some((key, value)) = part.split_once('=') {
            let value = value.trim_matches('"').trim_matches('\'');
            attrs.insert(key.to_owned(), value.to_owned());
        }
    }

    (language, attrs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fence_info_language_only() {
        let (lang, attrs) = parse_fence_info("mermaid");
        assert_eq!(lang, "mermaid");
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_parse_fence_info_with_attrs() {
        let (lang, attrs) = parse_fence_info("mermaid theme=dark scale='2'");
        assert_eq!(lang, "mermaid");
        assert_eq!(attrs.get("theme"), Some(&"dark".to_owned()));
        assert_eq!(attrs.get("scale"), Some(&"2".to_owned()));
    }

    #[test]
    fn test_parse_fence_info_ignores_bare_words() {
        let (lang, attrs) = parse_fence_info("python title linenos=1");
        assert_eq!(lang, "python");
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_parse_fence_info_whitespace_only() {
        let (lang, attrs) = parse_fence_info("   ");
        assert_eq!(lang, "");
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_default_trait_implementations() {
        struct MinimalProcessor;

        impl CodeBlockProcessor for MinimalProcessor {
            fn process(
                &mut self,
                _language: &str,
                _attrs: &HashMap<String, String>,
                _source: &str,
                _index: usize,
            ) -> ProcessResult {
                ProcessResult::PassThrough
            }
        }

        let mut processor = MinimalProcessor;
        let mut html = "<p>x</p>".to_owned();
        processor.post_process(&mut html);
        assert_eq!(html, "<p>x</p>");
        assert!(processor.extracted().is_empty());
        assert!(processor.warnings().is_empty());
    }
}
