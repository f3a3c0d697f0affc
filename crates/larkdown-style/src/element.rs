//! Element kinds addressed by the style model.

/// Block-level element kinds.
///
/// Each kind maps to the key used in [`StyleModel::block`](crate::StyleModel).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockElement {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Paragraph,
    Blockquote,
    /// The `<pre>` wrapper of a fenced code block.
    CodePre,
    /// The `<code>` element inside a fenced code block.
    Code,
    Image,
    OrderedList,
    UnorderedList,
    Footnotes,
    Table,
    TableHead,
    TableCell,
}

impl BlockElement {
    /// All block kinds, in template order.
    pub const ALL: [Self; 17] = [
        Self::H1,
        Self::H2,
        Self::H3,
        Self::H4,
        Self::H5,
        Self::H6,
        Self::Paragraph,
        Self::Blockquote,
        Self::CodePre,
        Self::Code,
        Self::Image,
        Self::OrderedList,
        Self::UnorderedList,
        Self::Footnotes,
        Self::Table,
        Self::TableHead,
        Self::TableCell,
    ];

    /// Key of this kind in the block style table.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::H5 => "h5",
            Self::H6 => "h6",
            Self::Paragraph => "p",
            Self::Blockquote => "blockquote",
            Self::CodePre => "code_pre",
            Self::Code => "code",
            Self::Image => "image",
            Self::OrderedList => "ol",
            Self::UnorderedList => "ul",
            Self::Footnotes => "footnotes",
            Self::Table => "table",
            Self::TableHead => "thead",
            Self::TableCell => "td",
        }
    }

    /// Heading kind for a level in `1..=6`.
    #[must_use]
    pub const fn heading(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::H1),
            2 => Some(Self::H2),
            3 => Some(Self::H3),
            4 => Some(Self::H4),
            5 => Some(Self::H5),
            6 => Some(Self::H6),
            _ => None,
        }
    }

    /// Parse a block style key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

/// Inline element kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InlineElement {
    ListItem,
    CodeSpan,
    Emphasis,
    Strikethrough,
    Link,
    Strong,
    /// Footnote reference marker.
    Footnote,
}

impl InlineElement {
    /// All inline kinds.
    pub const ALL: [Self; 7] = [
        Self::ListItem,
        Self::CodeSpan,
        Self::Emphasis,
        Self::Strikethrough,
        Self::Link,
        Self::Strong,
        Self::Footnote,
    ];

    /// Key of this kind in the inline style table.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::ListItem => "listitem",
            Self::CodeSpan => "codespan",
            Self::Emphasis => "em",
            Self::Strikethrough => "del",
            Self::Link => "link",
            Self::Strong => "strong",
            Self::Footnote => "footnote",
        }
    }

    /// Parse an inline style key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_keys_round_trip() {
        for kind in BlockElement::ALL {
            assert_eq!(BlockElement::from_key(kind.key()), Some(kind));
        }
        assert_eq!(BlockElement::from_key("marquee"), None);
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(BlockElement::heading(1), Some(BlockElement::H1));
        assert_eq!(BlockElement::heading(6), Some(BlockElement::H6));
        assert_eq!(BlockElement::heading(0), None);
        assert_eq!(BlockElement::heading(7), None);
    }

    #[test]
    fn test_inline_keys() {
        assert_eq!(InlineElement::Strikethrough.key(), "del");
        assert_eq!(InlineElement::from_key("codespan"), Some(InlineElement::CodeSpan));
        assert_eq!(InlineElement::from_key("blink"), None);
    }
}
