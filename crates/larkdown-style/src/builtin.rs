//! Built-in template definitions.

use crate::element::{BlockElement, InlineElement};
use crate::model::{StyleMap, StyleModel};
use crate::template::Template;

/// CJK-friendly font stack shared by the built-in templates.
pub const FONT_FAMILY: &str = "'Source Han Sans', -apple-system-font, BlinkMacSystemFont, \"Helvetica Neue\", \"PingFang SC\", \"Hiragino Sans GB\", \"Microsoft YaHei UI\", \"Microsoft YaHei\", Arial, sans-serif";

const CODE_FONT_FAMILY: &str = "Menlo, Operator Mono, Consolas, Monaco, monospace";

type Pairs = &'static [(&'static str, &'static str)];

fn model(
    base: Pairs,
    block: &[(BlockElement, Pairs)],
    inline: &[(InlineElement, Pairs)],
) -> StyleModel {
    let mut model = StyleModel {
        base: StyleMap::from_pairs(base),
        ..StyleModel::default()
    };
    for (kind, pairs) in block {
        *model.block_mut(*kind) = StyleMap::from_pairs(pairs);
    }
    for (kind, pairs) in inline {
        *model.inline_mut(*kind) = StyleMap::from_pairs(pairs);
    }
    model
}

/// The `default` template: neutral article styling.
pub(crate) fn default_template() -> Template {
    const TEXT: &str = "var(--text-color, #333)";

    let styles = model(
        &[
            ("themeColor", "var(--theme-color, #333)"),
            ("fontFamily", FONT_FAMILY),
            ("textAlign", "left"),
            ("lineHeight", "2"),
            ("padding", "1rem 1.5rem"),
            ("maxWidth", "100%"),
            ("margin", "0 auto"),
            ("wordBreak", "break-word"),
            ("whiteSpace", "pre-wrap"),
            ("fontSize", "15px"),
            ("color", TEXT),
        ],
        &[
            (
                BlockElement::H1,
                &[
                    ("display", "block"),
                    ("padding", "0 1em 0.5em 1em"),
                    ("borderBottom", "2px solid var(--theme-color)"),
                    ("margin", "2em auto 1em"),
                    ("color", "var(--theme-color)"),
                    ("fontSize", "1.2em"),
                    ("fontWeight", "bold"),
                    ("textAlign", "center"),
                    ("textDecoration", "none"),
                    ("pageBreakInside", "avoid"),
                ],
            ),
            (
                BlockElement::H2,
                &[
                    ("display", "block"),
                    ("padding", "0 0.2em 0.5em 0.2em"),
                    ("margin", "2em auto 2em"),
                    ("color", "var(--theme-color)"),
                    ("borderBottom", "2px solid var(--theme-color)"),
                    ("fontSize", "1.2em"),
                    ("fontWeight", "bold"),
                    ("textAlign", "center"),
                    ("textDecoration", "none"),
                    ("pageBreakInside", "avoid"),
                ],
            ),
            (
                BlockElement::H3,
                &[
                    ("paddingLeft", "12px"),
                    ("borderLeft", "4px solid var(--theme-color)"),
                    ("margin", "2em 8px 0.75em 0"),
                    ("color", "var(--theme-color)"),
                    ("fontSize", "1.1em"),
                    ("fontWeight", "bold"),
                    ("lineHeight", "1.2"),
                    ("pageBreakInside", "avoid"),
                ],
            ),
            (
                BlockElement::H4,
                &[
                    ("margin", "2em 8px 0.5em"),
                    ("color", "var(--theme-color)"),
                    ("fontSize", "1em"),
                    ("fontWeight", "bold"),
                    ("pageBreakInside", "avoid"),
                ],
            ),
            (
                BlockElement::H5,
                &[
                    ("margin", "1.5em 8px 0.5em"),
                    ("color", "var(--theme-color)"),
                    ("fontSize", "1em"),
                    ("fontWeight", "bold"),
                    ("pageBreakInside", "avoid"),
                ],
            ),
            (
                BlockElement::H6,
                &[
                    ("margin", "1.5em 8px 0.5em"),
                    ("fontSize", "1em"),
                    ("color", "var(--theme-color)"),
                    ("pageBreakInside", "avoid"),
                ],
            ),
            (
                BlockElement::Paragraph,
                &[
                    ("fontSize", "var(--font-size, 15px)"),
                    ("margin", "1.5em 8px"),
                    ("letterSpacing", "0.1em"),
                    ("color", TEXT),
                    ("textAlign", "justify"),
                    ("pageBreakInside", "avoid"),
                ],
            ),
            (
                BlockElement::Blockquote,
                &[
                    ("fontStyle", "normal"),
                    ("padding", "1em"),
                    ("borderLeft", "4px solid var(--theme-color)"),
                    ("borderRadius", "6px"),
                    ("color", "rgba(0,0,0,0.5)"),
                    ("background", "var(--blockquote-background, #f8f9fa)"),
                    ("margin", "0 0 1em 0"),
                    ("pageBreakInside", "avoid"),
                ],
            ),
            (BlockElement::CodePre, CODE_PRE),
            (BlockElement::Code, CODE),
            (BlockElement::Image, IMAGE),
            (
                BlockElement::OrderedList,
                &[
                    ("paddingLeft", "1em"),
                    ("color", TEXT),
                    ("listStyleType", "decimal"),
                ],
            ),
            (
                BlockElement::UnorderedList,
                &[
                    ("listStyleType", "circle"),
                    ("paddingLeft", "1em"),
                    ("color", TEXT),
                ],
            ),
            (
                BlockElement::Footnotes,
                &[("margin", "0.5em 8px"), ("fontSize", "80%"), ("color", TEXT)],
            ),
            (
                BlockElement::Table,
                &[("textAlign", "center"), ("margin", "1em 8px"), ("color", TEXT)],
            ),
            (
                BlockElement::TableHead,
                &[
                    ("background", "rgba(0, 0, 0, 0.05)"),
                    ("fontWeight", "bold"),
                    ("color", TEXT),
                ],
            ),
            (BlockElement::TableCell, TABLE_CELL),
        ],
        &[
            (
                InlineElement::ListItem,
                &[
                    ("display", "list-item"),
                    ("margin", "0.2em 8px"),
                    ("color", TEXT),
                    ("pageBreakInside", "avoid"),
                ],
            ),
            (InlineElement::CodeSpan, CODE_SPAN),
            (
                InlineElement::Emphasis,
                &[("fontStyle", "italic"), ("fontSize", "inherit")],
            ),
            (InlineElement::Link, &[("color", "#576b95")]),
            (
                InlineElement::Strong,
                &[
                    ("color", "var(--theme-color)"),
                    ("fontWeight", "bold"),
                    ("fontSize", "inherit"),
                ],
            ),
            (
                InlineElement::Footnote,
                &[("fontSize", "12px"), ("color", TEXT)],
            ),
        ],
    );

    Template::new("default", "默认", styles)
        .description("默认文章样式")
        .class_name("default-template")
        .theme_variable("theme-color")
}

/// The `wechat` template: official-account article styling.
pub(crate) fn wechat_template() -> Template {
    const TEXT: &str = "hsl(var(--foreground))";

    let styles = model(
        &[
            ("themeColor", "var(--themeColor, rgb(0, 0, 0))"),
            ("fontFamily", FONT_FAMILY),
            ("textAlign", "left"),
            ("lineHeight", "2"),
            ("padding", "1rem 1.5rem"),
            ("maxWidth", "100%"),
            ("margin", "0 auto"),
            ("wordBreak", "break-word"),
            ("whiteSpace", "pre-wrap"),
            ("fontSize", "15px"),
            ("color", "#333"),
        ],
        &[
            (
                BlockElement::H1,
                &[
                    ("display", "block"),
                    ("padding", "0 1em 0.5em 1em"),
                    ("borderBottom", "2px solid var(--themeColor)"),
                    ("margin", "2em auto 1em"),
                    ("color", "var(--themeColor)"),
                    ("fontSize", "1.2em"),
                    ("fontWeight", "bold"),
                    ("textAlign", "center"),
                    ("textDecoration", "none"),
                    ("pageBreakInside", "avoid"),
                ],
            ),
            (
                BlockElement::H2,
                &[
                    ("display", "block"),
                    ("padding", "0 0.2em 0.5em 0.2em"),
                    ("margin", "2em auto 2em"),
                    ("color", "var(--themeColor)"),
                    ("borderBottom", "2px solid var(--themeColor)"),
                    ("fontSize", "1.2em"),
                    ("fontWeight", "bold"),
                    ("textAlign", "center"),
                    ("textDecoration", "none"),
                    ("pageBreakInside", "avoid"),
                ],
            ),
            (
                BlockElement::H3,
                &[
                    ("paddingLeft", "12px"),
                    ("borderLeft", "4px solid var(--themeColor)"),
                    ("margin", "2em 8px 0.75em 0"),
                    ("color", "var(--themeColor)"),
                    ("fontSize", "1.1em"),
                    ("fontWeight", "bold"),
                    ("lineHeight", "1.2"),
                    ("pageBreakInside", "avoid"),
                ],
            ),
            (
                BlockElement::H4,
                &[
                    ("margin", "2em 8px 0.5em"),
                    ("color", "var(--themeColor)"),
                    ("fontSize", "1em"),
                    ("fontWeight", "bold"),
                    ("pageBreakInside", "avoid"),
                ],
            ),
            (
                BlockElement::H5,
                &[
                    ("margin", "1.5em 8px 0.5em"),
                    ("color", "var(--themeColor)"),
                    ("fontSize", "1em"),
                    ("fontWeight", "bold"),
                    ("pageBreakInside", "avoid"),
                ],
            ),
            (
                BlockElement::H6,
                &[
                    ("margin", "1.5em 8px 0.5em"),
                    ("fontSize", "1em"),
                    ("color", "var(--themeColor)"),
                    ("pageBreakInside", "avoid"),
                ],
            ),
            (
                BlockElement::Paragraph,
                &[
                    ("fontSize", "var(--fontSize)"),
                    ("margin", "1.5em 8px"),
                    ("letterSpacing", "0.1em"),
                    ("color", TEXT),
                    ("textAlign", "justify"),
                    ("pageBreakInside", "avoid"),
                ],
            ),
            (
                BlockElement::Blockquote,
                &[
                    ("fontStyle", "normal"),
                    ("padding", "1em"),
                    ("borderLeft", "4px solid var(--themeColor)"),
                    ("borderRadius", "6px"),
                    ("color", "rgba(0,0,0,0.5)"),
                    ("background", "var(--blockquote-background)"),
                    ("margin", "0 0 1em 0"),
                    ("pageBreakInside", "avoid"),
                ],
            ),
            (BlockElement::CodePre, CODE_PRE),
            (BlockElement::Code, CODE),
            (BlockElement::Image, IMAGE),
            (
                BlockElement::OrderedList,
                &[("paddingLeft", "1em"), ("color", TEXT)],
            ),
            (
                BlockElement::UnorderedList,
                &[
                    ("listStyle", "circle"),
                    ("paddingLeft", "1em"),
                    ("color", TEXT),
                ],
            ),
            (
                BlockElement::Footnotes,
                &[("margin", "0.5em 8px"), ("fontSize", "80%"), ("color", TEXT)],
            ),
            (
                BlockElement::Table,
                &[("textAlign", "center"), ("margin", "1em 8px"), ("color", TEXT)],
            ),
            (
                BlockElement::TableHead,
                &[
                    ("background", "rgba(0, 0, 0, 0.05)"),
                    ("fontWeight", "bold"),
                    ("color", TEXT),
                ],
            ),
            (BlockElement::TableCell, TABLE_CELL),
        ],
        &[
            (
                InlineElement::ListItem,
                &[
                    ("display", "block"),
                    ("margin", "0.2em 8px"),
                    ("color", TEXT),
                    ("pageBreakInside", "avoid"),
                ],
            ),
            (InlineElement::CodeSpan, CODE_SPAN),
            (
                InlineElement::Emphasis,
                &[("fontStyle", "italic"), ("fontSize", "inherit")],
            ),
            (InlineElement::Link, &[("color", "#576b95")]),
            (
                InlineElement::Strong,
                &[
                    ("color", "var(--themeColor)"),
                    ("fontWeight", "bold"),
                    ("fontSize", "inherit"),
                ],
            ),
            (
                InlineElement::Footnote,
                &[("fontSize", "12px"), ("color", TEXT)],
            ),
        ],
    );

    Template::new("wechat", "默认主题", styles)
        .description("微信公众号文章样式")
        .class_name("wechat-template")
        .theme_variable("themeColor")
}

const CODE_PRE: Pairs = &[
    ("fontSize", "14px"),
    ("overflowX", "auto"),
    ("borderRadius", "8px"),
    ("padding", "1em"),
    ("lineHeight", "1.5"),
    ("margin", "10px 8px"),
    ("pageBreakInside", "avoid"),
];

const CODE: Pairs = &[("margin", "0"), ("fontFamily", CODE_FONT_FAMILY)];

const IMAGE: Pairs = &[
    ("display", "block"),
    ("width", "100% !important"),
    ("margin", "0.1em auto 0.5em"),
    ("borderRadius", "4px"),
];

const TABLE_CELL: Pairs = &[
    ("border", "1px solid #dfdfdf"),
    ("padding", "0.25em 0.5em"),
    ("color", "#3f3f3f"),
];

const CODE_SPAN: Pairs = &[
    ("fontSize", "90%"),
    ("color", "#333333"),
    ("background", "rgba(27,31,35,.05)"),
    ("padding", "3px 5px"),
    ("borderRadius", "4px"),
];
