use std::fmt::Write as _;

use crate::escape::{css_value, escape_html, url_attr};
use crate::{ComponentError, Params};

pub(super) fn render(params: Params<'_>) -> Result<String, ComponentError> {
    let label = params
        .first_text(&["text", "label", "buttonText"])
        .unwrap_or_else(|| "Click me".to_owned());
    let href = params.first_text(&["customUrl", "url", "link", "pageRoute"]);
    let variant = match params.text_or("variant", "primary").as_str() {
        "secondary" => "secondary",
        "outline" => "outline",
        _ => "primary",
    };
    let (padding, font_size) = match params.text_or("size", "medium").as_str() {
        "small" => ("6px 12px", "14px"),
        "large" => ("14px 28px", "18px"),
        _ => ("10px 20px", "16px"),
    };
    let default_background = if variant == "secondary" { "#6b7280" } else { "#3b82f6" };
    let background = params.text_or("backgroundColor", default_background);
    let background = css_value(&background, default_background);
    let text_color = params.text_or("textColor", "#ffffff");
    let text_color = css_value(&text_color, "#ffffff");
    let radius = params.length("borderRadius", "6px");
    let width = if params.flag("fullWidth", false) { "100%" } else { "auto" };

    let colors = if variant == "outline" {
        format!("background-color: transparent; color: {background}; border: 2px solid {background};")
    } else {
        format!("background-color: {background}; color: {text_color}; border: none;")
    };
    let style = format!(
        "display: inline-flex; align-items: center; justify-content: center; {colors} padding: {padding}; font-size: {font_size}; border-radius: {radius}; width: {width}; cursor: pointer; text-decoration: none; box-sizing: border-box;",
        radius = css_value(&radius, "6px"),
    );
    let icon = params
        .text("icon")
        .map(|icon| {
            format!(
                r#"<i class="pi {}" aria-hidden="true" style="margin-right: 8px;"></i>"#,
                crate::escape::class_name(&icon)
            )
        })
        .unwrap_or_default();

    let mut html = String::from(
        r#"<div class="sf-button-wrapper" style="display: flex; align-items: center; justify-content: center; width: 100%; height: 100%;">"#,
    );
    let _ = match href {
        Some(href) => {
            let target = if params.flag("openInNewTab", false) {
                r#" target="_blank" rel="noopener noreferrer""#
            } else {
                ""
            };
            write!(
                html,
                r#"<a class="sf-button sf-button-{variant} p-button" href="{href}"{target} style="{style}">{icon}{label}</a>"#,
                href = url_attr(&href),
                label = escape_html(&label),
            )
        }
        None => write!(
            html,
            r#"<button type="button" class="sf-button sf-button-{variant} p-button" style="{style}">{icon}{label}</button>"#,
            label = escape_html(&label),
        ),
    };
    html.push_str("</div>");
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render_json(value: serde_json::Value) -> String {
        let serde_json::Value::Object(map) = value else {
            panic!("expected object");
        };
        render(Params::new(&map)).unwrap()
    }

    #[test]
    fn test_script_url_becomes_hash() {
        let html = render_json(json!({"text": "Go", "customUrl": "javascript:alert(1)"}));
        assert!(html.contains(r##"href="#""##));
        assert!(!html.contains("javascript"));
    }

    #[test]
    fn test_link_button() {
        let html = render_json(json!({"text": "Shop <now>", "customUrl": "/shop", "openInNewTab": true}));
        assert!(html.contains(r#"href="/shop""#));
        assert!(html.contains(r#"target="_blank""#));
        assert!(html.contains("Shop &lt;now&gt;"));
    }

    #[test]
    fn test_plain_button_without_url() {
        let html = render_json(json!({}));
        assert!(html.contains(r#"<button type="button""#));
        assert!(html.contains("Click me"));
        assert!(html.contains("sf-button-primary"));
    }

    #[test]
    fn test_outline_variant_uses_background_as_border() {
        let html = render_json(json!({"variant": "outline", "backgroundColor": "#10b981"}));
        assert!(html.contains("border: 2px solid #10b981;"));
        assert!(html.contains("background-color: transparent;"));
    }
}
