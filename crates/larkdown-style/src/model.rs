//! Style model: per-element CSS property maps.
//!
//! A [`StyleMap`] is an ordered property-name to value mapping. Property names
//! are stored in kebab-case, so `fontSize` and `font-size` address the same
//! entry. A [`StyleModel`] groups the root (`base`) properties with one map per
//! block and inline element kind.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::element::{BlockElement, InlineElement};

/// Ordered mapping of CSS property names to values.
///
/// Values are passed through verbatim; this is a formatting layer, not a
/// validator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "IndexMap<String, String>",
    into = "IndexMap<String, String>"
)]
pub struct StyleMap {
    properties: IndexMap<String, String>,
}

impl StyleMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from `(name, value)` pairs, later pairs replacing earlier ones.
    #[must_use]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut map = Self::new();
        for (name, value) in pairs {
            map.insert(name, *value);
        }
        map
    }

    /// Set a property, replacing any existing value.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.properties
            .insert(property_name(name).into_owned(), value.into());
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a property only when it is not already present.
    pub fn insert_if_absent(&mut self, name: &str, value: impl Into<String>) {
        self.properties
            .entry(property_name(name).into_owned())
            .or_insert_with(|| value.into());
    }

    /// Remove a property, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.properties.shift_remove(property_name(name).as_ref())
    }

    /// Look up a property value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .get(property_name(name).as_ref())
            .map(String::as_str)
    }

    /// Whether the property is set.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(property_name(name).as_ref())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Iterate over `(kebab-case name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Right-biased merge: keys from `overrides` replace keys in `self`.
    ///
    /// Keys present on only one side are kept. Neither input is modified.
    #[must_use]
    pub fn merge(&self, overrides: &Self) -> Self {
        let mut merged = self.clone();
        for (name, value) in &overrides.properties {
            merged.properties.insert(name.clone(), value.clone());
        }
        merged
    }

    /// Serialize to an inline `style` attribute value.
    ///
    /// Entries are joined as `name: value` with `"; "`. An empty map yields an
    /// empty string; callers omit the attribute in that case.
    #[must_use]
    pub fn to_inline_style(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.properties {
            if !out.is_empty() {
                out.push_str("; ");
            }
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
        }
        out
    }

    /// Rewrite values in place. `f` returns `Some` to replace a value.
    pub fn rewrite_values(&mut self, mut f: impl FnMut(&str) -> Option<String>) {
        for value in self.properties.values_mut() {
            if let Some(replacement) = f(value) {
                *value = replacement;
            }
        }
    }
}

impl From<IndexMap<String, String>> for StyleMap {
    fn from(raw: IndexMap<String, String>) -> Self {
        let mut map = Self::new();
        for (name, value) in raw {
            map.insert(&name, value);
        }
        map
    }
}

impl From<StyleMap> for IndexMap<String, String> {
    fn from(map: StyleMap) -> Self {
        map.properties
    }
}

/// Convert a camelCase property name to kebab-case.
///
/// A hyphen is inserted between a lowercase letter or digit and the uppercase
/// letter following it, then the whole name is lowercased. Custom properties
/// (`--name`) are case-sensitive and returned unchanged.
#[must_use]
pub fn camel_to_kebab(name: &str) -> String {
    property_name(name).into_owned()
}

fn property_name(name: &str) -> Cow<'_, str> {
    if name.starts_with("--") || !name.chars().any(|c| c.is_ascii_uppercase()) {
        return Cow::Borrowed(name);
    }

    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for c in name.chars() {
        if c.is_ascii_uppercase()
            && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
        {
            out.push('-');
        }
        out.extend(c.to_lowercase());
        prev = Some(c);
    }
    Cow::Owned(out)
}

/// Serialize a property mapping to an inline style string.
///
/// Free-function form of [`StyleMap::to_inline_style`].
#[must_use]
pub fn to_inline_style_string(map: &StyleMap) -> String {
    map.to_inline_style()
}

/// Complete visual styling for one rendering pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleModel {
    /// Root container properties. `themeColor` is the accent used by headings,
    /// strong text and blockquote borders.
    pub base: StyleMap,
    /// Block element styles keyed by [`BlockElement::key`].
    pub block: IndexMap<String, StyleMap>,
    /// Inline element styles keyed by [`InlineElement::key`].
    pub inline: IndexMap<String, StyleMap>,
}

/// Property name of the theme accent color in `base`.
pub const THEME_COLOR: &str = "themeColor";

impl StyleModel {
    /// Right-biased merge of two models.
    ///
    /// `base`, every block kind and every inline kind are merged key by key
    /// with [`StyleMap::merge`]. Element kinds present on only one side are kept.
    #[must_use]
    pub fn merge(&self, overrides: &Self) -> Self {
        Self {
            base: self.base.merge(&overrides.base),
            block: merge_tables(&self.block, &overrides.block),
            inline: merge_tables(&self.inline, &overrides.inline),
        }
    }

    /// Style for a block kind, if the model defines one.
    #[must_use]
    pub fn block_style(&self, kind: BlockElement) -> Option<&StyleMap> {
        self.block.get(kind.key())
    }

    /// Style for an inline kind, if the model defines one.
    #[must_use]
    pub fn inline_style(&self, kind: InlineElement) -> Option<&StyleMap> {
        self.inline.get(kind.key())
    }

    /// Mutable style for a block kind, created empty when missing.
    pub fn block_mut(&mut self, kind: BlockElement) -> &mut StyleMap {
        self.block.entry(kind.key().to_owned()).or_default()
    }

    /// Mutable style for an inline kind, created empty when missing.
    pub fn inline_mut(&mut self, kind: InlineElement) -> &mut StyleMap {
        self.inline.entry(kind.key().to_owned()).or_default()
    }

    /// The theme accent color from `base`, if set.
    #[must_use]
    pub fn theme_color(&self) -> Option<&str> {
        self.base.get(THEME_COLOR)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
            && self.block.values().all(StyleMap::is_empty)
            && self.inline.values().all(StyleMap::is_empty)
    }

    /// Replace every `var(--name)` or `var(--name, fallback)` reference in all
    /// property values with `replacement`.
    pub fn substitute_var(&mut self, name: &str, replacement: &str) {
        let mut rewrite = |value: &str| replace_css_var(value, name, replacement);
        self.base.rewrite_values(&mut rewrite);
        for map in self.block.values_mut().chain(self.inline.values_mut()) {
            map.rewrite_values(&mut rewrite);
        }
    }

    /// Replace every occurrence of the literal `pattern` in all property values.
    pub fn replace_value(&mut self, pattern: &str, replacement: &str) {
        let mut rewrite = |value: &str| {
            value
                .contains(pattern)
                .then(|| value.replace(pattern, replacement))
        };
        self.base.rewrite_values(&mut rewrite);
        for map in self.block.values_mut().chain(self.inline.values_mut()) {
            map.rewrite_values(&mut rewrite);
        }
    }
}

fn merge_tables(
    base: &IndexMap<String, StyleMap>,
    overrides: &IndexMap<String, StyleMap>,
) -> IndexMap<String, StyleMap> {
    let mut merged = base.clone();
    for (kind, map) in overrides {
        let entry = merged.entry(kind.clone()).or_default();
        *entry = entry.merge(map);
    }
    merged
}

/// Replace `var(--name[, fallback])` occurrences in a CSS value.
///
/// Returns `None` when the value holds no such reference.
fn replace_css_var(value: &str, name: &str, replacement: &str) -> Option<String> {
    let needle = format!("var(--{name}");
    if !value.contains(&needle) {
        return None;
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    let mut replaced = false;

    while let Some(start) = rest.find(&needle) {
        let after = &rest[start + needle.len()..];
        // `var(--theme-color-dark)` is a different variable
        let boundary = after
            .chars()
            .next()
            .is_some_and(|c| c == ')' || c == ',' || c.is_whitespace());
        let end = boundary.then(|| closing_paren(after)).flatten();

        let Some(end) = end else {
            out.push_str(&rest[..start + needle.len()]);
            rest = after;
            continue;
        };

        out.push_str(&rest[..start]);
        out.push_str(replacement);
        rest = &after[end + 1..];
        replaced = true;
    }
    out.push_str(rest);

    replaced.then_some(out)
}

/// Byte index of the parenthesis closing an already-open `var(`.
fn closing_paren(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return Some(i),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}
