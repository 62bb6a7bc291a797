use std::fmt::Write as _;

use super::image_source;
use crate::escape::{escape_html, escape_multiline, url_attr};
use crate::{ComponentError, Params};

pub(super) fn render(params: Params<'_>) -> Result<String, ComponentError> {
    let mut html = String::from(
        r#"<div class="sf-card p-card p-component" style="height: 100%; display: flex; flex-direction: column; overflow: hidden; box-sizing: border-box;">"#,
    );

    if let Some(image) = params.first_text(&["imageUrl", "image"]) {
        let alt = params.text("imageAlt").or_else(|| params.text("title")).unwrap_or_default();
        let _ = write!(
            html,
            r#"<div class="p-card-header"><img {} alt="{}" style="width: 100%; max-height: 200px; object-fit: cover; display: block;"></div>"#,
            image_source(&image, true),
            escape_html(&alt)
        );
    }

    html.push_str(r#"<div class="p-card-body" style="padding: 16px; display: flex; flex-direction: column; gap: 8px; flex: 1;">"#);
    if let Some(title) = params.text("title") {
        let _ = write!(html, r#"<div class="p-card-title">{}</div>"#, escape_html(&title));
    }
    if let Some(subtitle) = params.text("subtitle") {
        let _ = write!(
            html,
            r#"<div class="p-card-subtitle">{}</div>"#,
            escape_html(&subtitle)
        );
    }
    if let Some(content) = params.first_text(&["content", "text", "description"]) {
        let _ = write!(
            html,
            r#"<div class="p-card-content"><p style="margin: 0;">{}</p></div>"#,
            escape_multiline(&content)
        );
    }
    if let Some(label) = params.text("buttonText") {
        let href = params.first_text(&["buttonUrl", "buttonLink"]).unwrap_or_else(|| "#".to_owned());
        let _ = write!(
            html,
            r#"<div class="p-card-footer"><a class="p-button p-component" href="{}"><span class="p-button-label">{}</span></a></div>"#,
            url_attr(&href),
            escape_html(&label)
        );
    }
    html.push_str("</div></div>");
    Ok(html)
}
