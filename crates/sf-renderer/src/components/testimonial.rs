use std::fmt::Write as _;

use super::image_source;
use crate::escape::{css_value, escape_html, escape_multiline};
use crate::{ComponentError, Params};

const MAX_RATING: u8 = 5;

pub(super) fn render(params: Params<'_>) -> Result<String, ComponentError> {
    let quote = params.first_text(&["quote", "text", "content"]).unwrap_or_default();
    let author = params
        .first_text(&["author", "authorName", "name"])
        .unwrap_or_else(|| "Anonymous".to_owned());
    let role = match (params.text("role"), params.text("company")) {
        (Some(role), Some(company)) => Some(format!("{role}, {company}")),
        (role, company) => role.or(company),
    };
    let rating = rating(params.number("rating")?);
    let background = params.text_or("backgroundColor", "#ffffff");
    let text_color = params.text_or("textColor", "#1f2937");

    let mut html = format!(
        r#"<blockquote class="sf-testimonial" style="margin: 0; padding: 24px; background-color: {bg}; color: {fg}; border-radius: 8px; box-shadow: 0 1px 3px rgba(0, 0, 0, 0.1); height: 100%; box-sizing: border-box; display: flex; flex-direction: column; gap: 12px;">"#,
        bg = css_value(&background, "#ffffff"),
        fg = css_value(&text_color, "#1f2937"),
    );

    if let Some(rating) = rating {
        let _ = write!(
            html,
            r#"<div class="sf-testimonial-rating" role="img" aria-label="{rating} out of {MAX_RATING} stars" style="color: #f59e0b;">"#
        );
        for star in 1..=MAX_RATING {
            let icon = if star <= rating { "pi-star-fill" } else { "pi-star" };
            let _ = write!(html, r#"<i class="pi {icon}" aria-hidden="true"></i>"#);
        }
        html.push_str("</div>");
    }

    let _ = write!(
        html,
        r#"<p class="sf-testimonial-quote" style="margin: 0; font-style: italic; line-height: 1.6;">&ldquo;{}&rdquo;</p>"#,
        escape_multiline(&quote)
    );

    html.push_str(r#"<footer class="sf-testimonial-author" style="display: flex; align-items: center; gap: 12px;">"#);
    if let Some(avatar) = params.first_text(&["avatarUrl", "avatar", "image"]) {
        let _ = write!(
            html,
            r#"<img {} alt="{}" style="width: 48px; height: 48px; border-radius: 50%; object-fit: cover;">"#,
            image_source(&avatar, true),
            escape_html(&author)
        );
    }
    let _ = write!(
        html,
        r#"<div><cite style="font-style: normal; font-weight: 600;">{}</cite>"#,
        escape_html(&author)
    );
    if let Some(role) = role {
        let _ = write!(
            html,
            r#"<div class="sf-testimonial-role" style="font-size: 14px; opacity: 0.7;">{}</div>"#,
            escape_html(&role)
        );
    }
    html.push_str("</div></footer></blockquote>");
    Ok(html)
}

/// Round and clamp to `0..=5`; zero means "no rating shown".
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rating(value: Option<f64>) -> Option<u8> {
    let value = value?.round().clamp(0.0, f64::from(MAX_RATING));
    (value >= 1.0).then_some(value as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn render_json(value: Value) -> Result<String, ComponentError> {
        let Value::Object(map) = value else {
            panic!("expected object");
        };
        render(Params::new(&map))
    }

    #[test]
    fn test_rating_stars() {
        let html = render_json(json!({"quote": "Great", "author": "Sam", "rating": 4})).unwrap();
        assert_eq!(html.matches("pi-star-fill").count(), 4);
        assert_eq!(html.matches(r#""pi pi-star""#).count(), 1);
        assert!(html.contains("4 out of 5 stars"));
    }

    #[test]
    fn test_rating_clamped_and_optional() {
        assert_eq!(rating(Some(9.0)), Some(5));
        assert_eq!(rating(Some(-2.0)), None);
        assert_eq!(rating(Some(3.6)), Some(4));
        assert_eq!(rating(None), None);

        let html = render_json(json!({"quote": "Fine"})).unwrap();
        assert!(!html.contains("sf-testimonial-rating"));
        assert!(html.contains("Anonymous"));
    }

    #[test]
    fn test_rating_must_be_numeric() {
        let err = render_json(json!({"rating": "five"})).unwrap_err();
        assert_eq!(err.to_string(), "parameter `rating` must be a number");
    }

    #[test]
    fn test_role_and_company() {
        let html = render_json(json!({"author": "<Ann>", "role": "CEO", "company": "Acme"})).unwrap();
        assert!(html.contains("&lt;Ann&gt;"));
        assert!(html.contains("CEO, Acme"));
    }
}
