//! Code fence tracking for line-based preprocessing.
//!
//! Text rewrites must never touch the inside of a fenced code block, so each
//! stage walks the document line by line and skips fenced regions.

/// Tracks code fence state during line-by-line processing.
///
/// Fences use backticks or tildes (three or more). A closing fence uses the
/// same character and is at least as long as the opening one.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    fence_char: Option<char>,
    fence_len: usize,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn in_fence(&self) -> bool {
        self.fence_char.is_some()
    }

    /// Feed one line. Returns `true` if the line opens or closes a fence.
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();

        match self.fence_char {
            Some(fence_char) => {
                if is_closing_fence(trimmed, fence_char, self.fence_len) {
                    self.fence_char = None;
                    self.fence_len = 0;
                    return true;
                }
                false
            }
            None => {
                if let Some((ch, len)) = detect_fence(trimmed) {
                    self.fence_char = Some(ch);
                    self.fence_len = len;
                    return true;
                }
                false
            }
        }
    }
}

fn detect_fence(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }

    let count = trimmed.chars().take_while(|&c| c == first).count();
    (count >= 3).then_some((first, count))
}

/// Same character, at least as long as the opener, nothing but whitespace after.
fn is_closing_fence(trimmed: &str, expected: char, min_len: usize) -> bool {
    if !trimmed.starts_with(expected) {
        return false;
    }

    let count = trimmed.chars().take_while(|&c| c == expected).count();
    count >= min_len && trimmed[count * expected.len_utf8()..].chars().all(char::is_whitespace)
}

/// Apply `f` to every run of lines outside fenced code blocks.
///
/// Fence markers and fenced content are copied verbatim. Runs are passed as
/// whole slices (newlines included) so a rewrite may span lines.
pub(crate) fn map_outside_fences(text: &str, mut f: impl FnMut(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    let mut tracker = FenceTracker::new();
    let mut run_start = 0;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let was_fenced = tracker.in_fence();
        let is_marker = tracker.update(line);
        let line_end = offset + line.len();

        if was_fenced || is_marker {
            if run_start < offset {
                out.push_str(&f(&text[run_start..offset]));
            }
            out.push_str(line);
            run_start = line_end;
        }
        offset = line_end;
    }

    if run_start < text.len() {
        out.push_str(&f(&text[run_start..]));
    }
    out
}
