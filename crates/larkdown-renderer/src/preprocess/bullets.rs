//! Character bullet normalization.
//!
//! Text pasted from rich editors often uses `•` style bullets. They are turned
//! into `- ` list markers so lists get real list markup and CSS bullets.

use std::sync::LazyLock;

use regex::Regex;

static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^([ \t]*)[•·●▪][ \t]+").unwrap());

pub(crate) fn normalize_bullets(text: &str) -> String {
    BULLET.replace_all(text, "${1}- ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bullets_become_list_markers() {
        assert_eq!(normalize_bullets("• one\n  ● two"), "- one\n  - two");
    }

    #[test]
    fn test_mid_line_bullet_untouched() {
        assert_eq!(normalize_bullets("a • b"), "a • b");
    }

    #[test]
    fn test_bullet_without_space_untouched() {
        assert_eq!(normalize_bullets("•x"), "•x");
    }
}
