//! Table cell values to markdown text.
//!
//! Text fields arrive either as plain strings or as arrays of rich-text
//! segments (`{"type": "text", "text": ".."}`, `{"type": "url", "text": "..",
//! "link": ".."}`). Lookup and formula fields wrap the same shapes in a
//! `value` key.

use serde_json::Value;

/// Flatten a cell value into markdown.
///
/// Segments are concatenated in order; link segments become `[text](link)`.
/// Arrays of plain values are joined with `", "`. Anything unrecognized
/// renders as an empty string.
#[must_use]
pub fn cell_to_markdown(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => {
            if items.iter().any(Value::is_object) {
                items.iter().map(cell_to_markdown).collect()
            } else {
                items
                    .iter()
                    .map(cell_to_markdown)
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }
        Value::Object(map) => {
            let text = map.get("text").and_then(Value::as_str);
            let link = map
                .get("link")
                .and_then(Value::as_str)
                .filter(|l| !l.is_empty());
            match (text, link) {
                (Some(text), Some(link)) => format!("[{text}]({link})"),
                (Some(text), None) => text.to_owned(),
                (None, _) => map.get("value").map(cell_to_markdown).unwrap_or_default(),
            }
        }
    }
}
