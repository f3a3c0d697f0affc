//! `<text_tag color='NAME'>...</text_tag>` expansion.

use std::sync::LazyLock;

use larkdown_style::FONT_FAMILY;
use regex::{Captures, Regex};

use crate::state::escape_html;

static TEXT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<text_tag\s+color\s*=\s*['"]([^'"]*)['"]\s*>(.*?)</text_tag>"#).unwrap()
});

/// Named tag colors.
const PALETTE: [(&str, &str); 8] = [
    ("purple", "#8b5cf6"),
    ("green", "#10b981"),
    ("blue", "#3b82f6"),
    ("red", "#ef4444"),
    ("yellow", "#f59e0b"),
    ("gray", "#6b7280"),
    ("indigo", "#6366f1"),
    ("pink", "#ec4899"),
];

/// Hex value for a palette name; other values are used as CSS colors as-is.
#[must_use]
pub fn tag_color(name: &str) -> &str {
    let name = name.trim();
    PALETTE
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map_or(name, |(_, hex)| hex)
}

/// Replace every color tag with a bold colored `<span>`.
///
/// Tag content is kept as-is, so markdown inside a tag still renders.
pub(crate) fn expand_color_tags(text: &str) -> String {
    TEXT_TAG
        .replace_all(text, |caps: &Captures<'_>| {
            let style = format!(
                "color: {}; font-weight: bold; font-family: {FONT_FAMILY}",
                tag_color(&caps[1])
            );
            format!(r#"<span style="{}">{}</span>"#, escape_html(&style), &caps[2])
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_color() {
        let html = expand_color_tags("<text_tag color='red'>alert</text_tag>");
        assert!(html.starts_with(r#"<span style="color: #ef4444; font-weight: bold; font-family: "#));
        assert!(html.ends_with(">alert</span>"));
    }

    #[test]
    fn test_double_quoted_attribute() {
        let html = expand_color_tags(r#"<text_tag color="blue">x</text_tag>"#);
        assert!(html.contains("color: #3b82f6"));
    }

    #[test]
    fn test_unknown_color_used_verbatim() {
        let html = expand_color_tags("<text_tag color='#123abc'>x</text_tag>");
        assert!(html.contains("color: #123abc;"));
    }

    #[test]
    fn test_multiple_and_multiline_tags() {
        let html = expand_color_tags(
            "<text_tag color='green'>a</text_tag> and <text_tag color='pink'>b\nc</text_tag>",
        );
        assert_eq!(html.matches("<span").count(), 2);
        assert!(html.contains(">b\nc</span>"));
    }

    #[test]
    fn test_unclosed_tag_left_alone() {
        let text = "<text_tag color='red'>open";
        assert_eq!(expand_color_tags(text), text);
    }

    #[test]
    fn test_tag_color_case_insensitive() {
        assert_eq!(tag_color("Purple"), "#8b5cf6");
        assert_eq!(tag_color(" teal "), "teal");
    }
}
