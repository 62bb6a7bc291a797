//! Escaping and sanitizing of user-controlled strings.
//!
//! Every string that comes from website JSON or component parameters passes
//! through one of these helpers before it is interpolated into HTML or CSS.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Replacement for URLs that must not be emitted.
const BLOCKED_URL: &str = "#";

/// Escape HTML special characters.
///
/// Safe for both text content and double- or single-quoted attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape text and turn line breaks into `<br>`.
#[must_use]
pub fn escape_multiline(s: &str) -> String {
    escape_html(s)
        .replace("\r\n", "\n")
        .replace('\n', "<br>")
}

/// Neutralize dangerous URL schemes.
///
/// - `javascript:` and `vbscript:` become `#`
/// - `data:image/*` passes through unchanged
/// - other `data:` URIs pass only if they carry a valid base64 payload
///   (`data:<type>;base64,<payload>`), else become `#`
/// - everything else passes through (trimmed)
///
/// Scheme detection ignores case, whitespace and control characters, so
/// `" Java\tScript:alert(1)"` is blocked too. The result still needs
/// [`escape_html`] before going into an attribute.
#[must_use]
pub fn sanitize_url(url: &str) -> String {
    let trimmed = url.trim();
    let normalized: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();

    if normalized.starts_with("javascript:") || normalized.starts_with("vbscript:") {
        return BLOCKED_URL.to_owned();
    }

    if normalized.starts_with("data:") {
        if normalized.starts_with("data:image/") || is_base64_data_uri(trimmed) {
            return trimmed.to_owned();
        }
        return BLOCKED_URL.to_owned();
    }

    trimmed.to_owned()
}

/// Check for `data:<type>;base64,<payload>` with exactly two parts.
fn is_base64_data_uri(uri: &str) -> bool {
    let Some((meta, payload)) = uri.split_once(',') else {
        return false;
    };
    if payload.is_empty() || payload.contains(',') {
        return false;
    }
    meta.to_ascii_lowercase().ends_with(";base64") && STANDARD.decode(payload).is_ok()
}

/// Sanitize a URL and escape it for use in an attribute.
#[must_use]
pub fn url_attr(url: &str) -> String {
    escape_html(&sanitize_url(url))
}

/// Accept a value for use inside a `style` attribute, or fall back.
///
/// Rejects values that could close the declaration or pull in external
/// resources (`;`, braces, quotes, angle brackets, backslashes, entities,
/// `url(`, `expression(`).
#[must_use]
pub fn css_value<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() {
        return fallback;
    }
    let forbidden = value
        .chars()
        .any(|c| matches!(c, ';' | '{' | '}' | '<' | '>' | '"' | '\'' | '\\' | '&'));
    let lowered = value.to_ascii_lowercase();
    if forbidden || lowered.contains("url(") || lowered.contains("expression(") {
        return fallback;
    }
    value
}

/// Reduce a string to characters valid in a CSS class name.
#[must_use]
pub fn class_name(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect()
}
