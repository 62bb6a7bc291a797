use std::fmt::Write as _;

use serde_json::Value;

use crate::escape::{class_name, css_value, escape_html, url_attr};
use crate::params::object_text;
use crate::{ComponentError, Params};

pub(super) fn render(params: Params<'_>) -> Result<String, ComponentError> {
    let company = params.first_text(&["companyName", "company"]);
    let copyright = params.text("copyrightText").unwrap_or_else(|| {
        let owner = company.as_deref().unwrap_or("All rights reserved");
        match params.text("year") {
            Some(year) if company.is_some() => format!("© {year} {owner}. All rights reserved."),
            Some(year) => format!("© {year} {owner}."),
            None if company.is_some() => format!("© {owner}. All rights reserved."),
            None => format!("© {owner}."),
        }
    });
    let background = params.text_or("backgroundColor", "#1f2937");
    let text_color = params.text_or("textColor", "#f9fafb");
    let links = links(params.list("links")?, "links")?;
    let social = social_links(params.list("socialLinks")?)?;

    let mut html = format!(
        r#"<footer class="sf-footer" style="background-color: {bg}; color: {fg}; padding: 24px; width: 100%; height: 100%; box-sizing: border-box; display: flex; flex-direction: column; gap: 12px; justify-content: center;">"#,
        bg = css_value(&background, "#1f2937"),
        fg = css_value(&text_color, "#f9fafb"),
    );

    if let Some(company) = &company {
        let _ = write!(
            html,
            r#"<div class="sf-footer-company" style="font-weight: 600; font-size: 18px;">{}</div>"#,
            escape_html(company)
        );
    }

    let contact: Vec<String> = ["address", "email", "phone"]
        .iter()
        .filter_map(|name| params.text(name).map(|value| (*name, value)))
        .map(|(name, value)| match name {
            "email" => format!(
                r#"<a href="mailto:{}" style="color: inherit;">{}</a>"#,
                escape_html(&value),
                escape_html(&value)
            ),
            "phone" => format!(
                r#"<a href="tel:{}" style="color: inherit;">{}</a>"#,
                escape_html(&value.replace(' ', "")),
                escape_html(&value)
            ),
            _ => escape_html(&value),
        })
        .collect();
    if !contact.is_empty() {
        let _ = write!(
            html,
            r#"<div class="sf-footer-contact" style="display: flex; flex-wrap: wrap; gap: 16px; font-size: 14px;">{}</div>"#,
            contact
                .iter()
                .map(|item| format!("<span>{item}</span>"))
                .collect::<String>()
        );
    }

    if !links.is_empty() {
        html.push_str(r#"<nav class="sf-footer-links" aria-label="Footer" style="display: flex; flex-wrap: wrap; gap: 16px;">"#);
        for (label, url) in &links {
            let _ = write!(
                html,
                r#"<a href="{}" style="color: inherit; text-decoration: none;">{}</a>"#,
                url_attr(url),
                escape_html(label)
            );
        }
        html.push_str("</nav>");
    }

    if !social.is_empty() {
        html.push_str(r#"<div class="sf-footer-social" style="display: flex; gap: 12px;">"#);
        for (platform, url) in &social {
            let _ = write!(
                html,
                r#"<a href="{}" aria-label="{}" target="_blank" rel="noopener noreferrer" style="color: inherit;"><i class="pi pi-{}" aria-hidden="true"></i></a>"#,
                url_attr(url),
                escape_html(platform),
                class_name(&platform.to_ascii_lowercase())
            );
        }
        html.push_str("</div>");
    }

    let _ = write!(
        html,
        r#"<div class="sf-footer-copyright" style="font-size: 13px; opacity: 0.8;">{}</div>"#,
        escape_html(&copyright)
    );
    html.push_str("</footer>");
    Ok(html)
}

/// Extract `(label, url)` pairs from an array of link objects.
fn links<'v>(items: &'v [Value], name: &str) -> Result<Vec<(&'v str, &'v str)>, ComponentError> {
    items
        .iter()
        .map(|item| {
            if !item.is_object() {
                return Err(ComponentError::invalid(name, "an array of link objects"));
            }
            let label = object_text(item, &["label", "text", "title"]).unwrap_or("Link");
            let url = object_text(item, &["url", "href", "route"]).unwrap_or("#");
            Ok((label, url))
        })
        .collect()
}

fn social_links(items: &[Value]) -> Result<Vec<(&str, &str)>, ComponentError> {
    items
        .iter()
        .map(|item| {
            if !item.is_object() {
                return Err(ComponentError::invalid("socialLinks", "an array of link objects"));
            }
            let platform = object_text(item, &["platform", "icon", "label"]).unwrap_or("link");
            let url = object_text(item, &["url", "href"]).unwrap_or("#");
            Ok((platform, url))
        })
        .collect()
}
