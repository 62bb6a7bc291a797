use std::fmt::Write as _;

use crate::escape::{css_value, escape_html, escape_multiline};
use crate::{ComponentError, Params};

const ALIGNMENTS: [&str; 4] = ["left", "center", "right", "justify"];

pub(super) fn render(params: Params<'_>) -> Result<String, ComponentError> {
    let title = params.text("title");
    let content = params.first_text(&["content", "text"]).unwrap_or_default();
    let align = params.text_or("textAlign", "left");
    let align = if ALIGNMENTS.contains(&align.as_str()) {
        align.as_str()
    } else {
        "left"
    };
    let font_size = params.length("fontSize", "16px");
    let title_size = params.length("titleSize", "24px");
    let padding = params.length("padding", "16px");
    let background = params.text_or("backgroundColor", "transparent");
    let text_color = params.text_or("textColor", "#374151");
    let title_color = params.text_or("titleColor", "#111827");

    let mut html = format!(
        r#"<div class="sf-text-block" style="text-align: {align}; padding: {padding}; background-color: {background}; color: {color}; font-size: {font_size}; height: 100%; box-sizing: border-box; overflow: hidden;">"#,
        padding = css_value(&padding, "16px"),
        background = css_value(&background, "transparent"),
        color = css_value(&text_color, "#374151"),
        font_size = css_value(&font_size, "16px"),
    );
    if let Some(title) = title {
        let _ = write!(
            html,
            r#"<h2 class="sf-text-block-title" style="margin: 0 0 8px; font-size: {size}; color: {color};">{}</h2>"#,
            escape_html(&title),
            size = css_value(&title_size, "24px"),
            color = css_value(&title_color, "#111827"),
        );
    }
    let _ = write!(
        html,
        r#"<div class="sf-text-block-content" style="line-height: 1.6;">{}</div>"#,
        escape_multiline(&content)
    );
    html.push_str("</div>");
    Ok(html)
}
