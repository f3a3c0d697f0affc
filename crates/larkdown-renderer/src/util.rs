//! Shared utility functions for markdown rendering.

use pulldown_cmark::HeadingLevel;

/// Convert heading level enum to number (1-6).
#[must_use]
pub(crate) fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// End of a code span opened by the backtick run at `start`, if it closes.
pub(crate) fn code_span_end(text: &str, start: usize) -> Option<usize> {
    let run = text[start..].bytes().take_while(|&b| b == b'`').count();
    let fence = &text[start..start + run];
    let body_start = start + run;

    let mut search = body_start;
    while let Some(pos) = text[search..].find(fence) {
        let at = search + pos;
        let closing_run = text[at..].bytes().take_while(|&b| b == b'`').count();
        if closing_run == run {
            return Some(at + run);
        }
        search = at + closing_run;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_to_num() {
        assert_eq!(heading_level_to_num(HeadingLevel::H1), 1);
        assert_eq!(heading_level_to_num(HeadingLevel::H4), 4);
        assert_eq!(heading_level_to_num(HeadingLevel::H6), 6);
    }

    #[test]
    fn test_code_span_end() {
        assert_eq!(code_span_end("`a` b", 0), Some(3));
        assert_eq!(code_span_end("``a`b`` c", 0), Some(7));
        assert_eq!(code_span_end("`open", 0), None);
    }
}
