//! Text preprocessing: an ordered pipeline of string-to-string stages.
//!
//! Order matters. Color tags are expanded first so later stages never see
//! (and never rewrite) tag attribute contents. Every stage except line-ending
//! normalization skips fenced code blocks.

mod bullets;
mod color_tag;
mod emphasis;
mod fence;

use std::time::Instant;

pub use color_tag::tag_color;

pub(crate) use fence::map_outside_fences;

/// One named text-transform stage.
#[derive(Clone, Copy, Debug)]
pub struct Stage {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

/// The preprocessing stages, in the order they run.
pub const STAGES: [Stage; 4] = [
    Stage {
        name: "line-endings",
        apply: normalize_line_endings,
    },
    Stage {
        name: "color-tags",
        apply: expand_color_tags,
    },
    Stage {
        name: "strong",
        apply: normalize_strong,
    },
    Stage {
        name: "bullets",
        apply: normalize_bullets,
    },
];

/// Run every stage over `markdown`.
#[must_use]
pub fn preprocess(markdown: &str) -> String {
    let mut text = markdown.to_owned();
    for stage in &STAGES {
        let start = Instant::now();
        text = (stage.apply)(&text);
        tracing::debug!(
            stage = stage.name,
            elapsed_us = start.elapsed().as_micros(),
            "Preprocess stage done"
        );
    }
    text
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn expand_color_tags(text: &str) -> String {
    map_outside_fences(text, color_tag::expand_color_tags)
}

fn normalize_strong(text: &str) -> String {
    map_outside_fences(text, emphasis::normalize_strong)
}

fn normalize_bullets(text: &str) -> String {
    map_outside_fences(text, bullets::normalize_bullets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stage_order() {
        let names: Vec<_> = STAGES.iter().map(|s| s.name).collect();
        assert_eq!(names, ["line-endings", "color-tags", "strong", "bullets"]);
    }

    #[test]
    fn test_fenced_code_untouched() {
        let text = "```\n**a** • b <text_tag color='red'>x</text_tag>\n```\n";
        assert_eq!(preprocess(text), text);
    }

    #[test]
    fn test_crlf_normalized_before_fence_detection() {
        let out = preprocess("```\r\n**a**\r\n```\r\n**b**");
        assert_eq!(out, "```\n**a**\n```\n<strong>b</strong>");
    }

    #[test]
    fn test_color_tag_attributes_survive_later_stages() {
        let out = preprocess("<text_tag color='red'>**hi**</text_tag>");
        assert!(out.contains("font-family:"));
        assert!(out.contains("<strong>hi</strong></span>"));
    }

    #[test]
    fn test_bullets_and_strong_together() {
        assert_eq!(preprocess("• **重点：**内容"), "- <strong>重点：</strong>内容");
    }
}
