use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::Params;
use crate::escape::escape_html;

/// `{{ name }}` placeholder; names may contain letters, digits, `_`, `-`, `.`.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}").unwrap());

/// Substitute parameters into a raw HTML template.
///
/// Missing parameters become the empty string, objects and arrays their JSON
/// text, booleans `true`/`false`. Substituted values are HTML-escaped; the
/// template itself is emitted as authored.
pub(crate) fn fill_template(template: &str, params: Params<'_>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            params.get(&caps[1]).map_or_else(String::new, |value| {
                escape_html(&placeholder_text(value))
            })
        })
        .into_owned()
}

fn placeholder_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
