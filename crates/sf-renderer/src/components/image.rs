use std::fmt::Write as _;

use super::image_source;
use crate::escape::{css_value, escape_html, url_attr};
use crate::{ComponentError, Params};

const OBJECT_FITS: [&str; 5] = ["cover", "contain", "fill", "none", "scale-down"];

pub(super) fn render(params: Params<'_>) -> Result<String, ComponentError> {
    let Some(src) = params.first_text(&["src", "imageUrl", "url"]) else {
        return Ok(concat!(
            r#"<div class="sf-image sf-image-empty" style="display: flex; align-items: center; justify-content: center; width: 100%; height: 100%; background: #f3f4f6; color: #9ca3af;">"#,
            r#"<i class="pi pi-image" aria-hidden="true"></i><span style="margin-left: 8px;">No image selected</span></div>"#
        )
        .to_owned());
    };

    let alt = params.text_or("alt", "");
    let fit = params.text_or("objectFit", "cover");
    let fit = if OBJECT_FITS.contains(&fit.as_str()) {
        fit.as_str()
    } else {
        "cover"
    };
    let radius = params.length("borderRadius", "0");

    let img = format!(
        r#"<img {source} alt="{alt}" style="width: 100%; height: 100%; object-fit: {fit}; border-radius: {radius}; display: block;">"#,
        source = image_source(&src, params.flag("lazy", true)),
        alt = escape_html(&alt),
        radius = css_value(&radius, "0"),
    );
    let img = match params.text("link") {
        Some(link) => format!(
            r#"<a href="{}" class="sf-image-link" style="display: block; width: 100%; height: 100%;">{img}</a>"#,
            url_attr(&link)
        ),
        None => img,
    };

    let mut html = String::from(r#"<figure class="sf-image" style="margin: 0; width: 100%; height: 100%; position: relative;">"#);
    html.push_str(&img);
    if let Some(caption) = params.text("caption") {
        let _ = write!(
            html,
            r#"<figcaption class="sf-image-caption" style="position: absolute; bottom: 0; left: 0; right: 0; padding: 4px 8px; background: rgba(0, 0, 0, 0.5); color: #ffffff; font-size: 14px;">{}</figcaption>"#,
            escape_html(&caption)
        );
    }
    html.push_str("</figure>");
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
    fn test_defaults() {
        let html = render_json(json!({"src": "https://cdn.example.com/a.png", "alt": "A \"cat\""}));
        assert!(html.contains(r#"data-src="https://cdn.example.com/a.png""#));
        assert!(html.contains(r#"src="data:image/gif;base64,"#));
        assert!(html.contains(r#"alt="A &quot;cat&quot;""#));
        assert!(html.contains("object-fit: cover;"));
        assert!(html.contains(r#"loading="lazy""#));
    }

    #[test]
    fn test_blocks_script_source_and_link() {
        let html = render_json(json!({"src": "javascript:alert(1)", "link": "vbscript:x"}));
        assert!(html.contains(r##"src="#""##));
        assert!(html.contains(r##"href="#""##));
        assert!(!html.contains("javascript"));
    }

    #[test]
    fn test_placeholder_without_source() {
        let html = render_json(json!({"alt": "nothing"}));
        assert!(html.contains("No image selected"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_object_fit_and_eager_loading() {
        let html = render_json(json!({"src": "/a.png", "objectFit": "contain", "lazy": false}));
        assert!(html.contains("object-fit: contain;"));
        assert!(html.contains(r#"<img src="/a.png" loading="eager""#));
        assert!(!html.contains("data-src"));
        let html = render_json(json!({"src": "/a.png", "objectFit": "bogus"}));
        assert!(html.contains("object-fit: cover;"));
    }
}
