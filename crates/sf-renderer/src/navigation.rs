//! Top navigation bar, its CSS and script, and breadcrumbs.

use std::fmt::Write as _;

use sf_model::{HOME_PAGE_ID, LogoType, NavigationConfig, ProcessedPage};

use crate::escape::{css_value, escape_html, url_attr};

/// Viewport width (px) at and above which the desktop menu is shown.
pub const DEFAULT_BREAKPOINT: u32 = 768;

const MOBILE_MENU_ID: &str = "sf-mobile-menu";

/// Pages listed in the navigation menu, in page order.
///
/// The home page is always listed; any other page only if it is deletable.
#[must_use]
pub fn navigation_pages(pages: &[ProcessedPage]) -> Vec<&ProcessedPage> {
    pages
        .iter()
        .filter(|page| page.is_home() || page.is_deletable)
        .collect()
}

/// Renders the navigation bar and breadcrumbs.
#[derive(Clone, Copy, Debug)]
pub struct NavigationRenderer {
    breakpoint: u32,
}

impl Default for NavigationRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_BREAKPOINT)
    }
}

impl NavigationRenderer {
    /// Create a renderer switching to the desktop menu at `breakpoint` px.
    #[must_use]
    pub fn new(breakpoint: u32) -> Self {
        Self { breakpoint }
    }

    /// Render the `<nav>` block.
    ///
    /// # Arguments
    ///
    /// * `config` - Logo and color settings
    /// * `pages` - All pages; filtered with [`navigation_pages`]
    /// * `active_page_id` - Page to mark active. Falls back to the page
    ///   flagged `is_active` when `None`.
    #[must_use]
    pub fn render_top_navigation(
        &self,
        config: &NavigationConfig,
        pages: &[ProcessedPage],
        active_page_id: Option<&str>,
    ) -> String {
        let active = active_page_id.or_else(|| {
            pages
                .iter()
                .find(|page| page.is_active)
                .map(|page| page.id.as_str())
        });
        let entries = navigation_pages(pages);
        let home_route = pages
            .iter()
            .find(|page| page.is_home())
            .map_or("/", |page| page.route.as_str());

        let mut html = format!(
            r#"<nav class="sf-nav" role="navigation" aria-label="Main navigation" data-breakpoint="{}" data-active-page="{}">"#,
            self.breakpoint,
            escape_html(active.unwrap_or_default())
        );
        html.push_str(r#"<div class="sf-nav-container">"#);
        let _ = write!(
            html,
            r#"<a class="sf-nav-logo" href="{}">{}</a>"#,
            url_attr(home_route),
            render_logo(config)
        );

        html.push_str(r#"<ul class="sf-nav-menu">"#);
        html.push_str(&menu_items(&entries, active));
        html.push_str("</ul>");

        let _ = write!(
            html,
            r#"<button class="sf-nav-toggle" type="button" aria-label="Toggle menu" aria-expanded="false" aria-controls="{MOBILE_MENU_ID}"><span class="sf-nav-toggle-bar"></span><span class="sf-nav-toggle-bar"></span><span class="sf-nav-toggle-bar"></span></button>"#
        );
        html.push_str("</div>");

        let _ = write!(
            html,
            r#"<div class="sf-mobile-menu" id="{MOBILE_MENU_ID}" hidden><ul>{}</ul></div>"#,
            menu_items(&entries, active)
        );
        html.push_str("</nav>");
        html
    }

    /// Stylesheet for the navigation bar.
    #[must_use]
    pub fn render_css(&self, config: &NavigationConfig) -> String {
        let background = css_value(&config.background_color, "#ffffff");
        let text = css_value(&config.text_color, "#1f2937");
        let shadow = if config.show_shadow {
            "0 1px 3px rgba(0, 0, 0, 0.1)"
        } else {
            "none"
        };
        let size = config.logo_size.pixels();
        let radius = config.logo_shape.border_radius();
        let desktop_min = self.breakpoint;
        let mobile_max = self.breakpoint.saturating_sub(1);

        format!(
            r".sf-nav {{ position: sticky; top: 0; z-index: 1000; background-color: {background}; color: {text}; box-shadow: {shadow}; font-family: inherit; }}
.sf-nav-container {{ display: flex; align-items: center; justify-content: space-between; max-width: 1200px; margin: 0 auto; padding: 12px 24px; }}
.sf-nav-logo {{ display: flex; align-items: center; color: inherit; text-decoration: none; font-weight: 700; font-size: 20px; }}
.sf-nav-logo-image {{ width: {size}px; height: {size}px; object-fit: cover; border-radius: {radius}; }}
.sf-nav-menu, .sf-mobile-menu ul {{ list-style: none; margin: 0; padding: 0; }}
.sf-nav-menu {{ display: flex; gap: 24px; }}
.sf-nav-link {{ color: inherit; text-decoration: none; padding: 6px 0; border-bottom: 2px solid transparent; transition: border-color 0.2s ease; }}
.sf-nav-link:hover, .sf-nav-link.active {{ border-bottom-color: currentColor; }}
.sf-nav-toggle {{ display: none; flex-direction: column; gap: 4px; background: none; border: none; padding: 8px; cursor: pointer; color: inherit; }}
.sf-nav-toggle-bar {{ display: block; width: 24px; height: 2px; background-color: currentColor; }}
.sf-mobile-menu {{ padding: 8px 24px 16px; border-top: 1px solid rgba(0, 0, 0, 0.08); }}
.sf-mobile-menu .sf-nav-link {{ display: block; padding: 10px 0; }}
.sf-mobile-menu[hidden] {{ display: none; }}
@media (max-width: {mobile_max}px) {{ .sf-nav-menu {{ display: none; }} .sf-nav-toggle {{ display: flex; }} }}
@media (min-width: {desktop_min}px) {{ .sf-mobile-menu {{ display: none !important; }} }}
"
        )
    }

    /// Script toggling the mobile menu and tracking the active link.
    #[must_use]
    pub fn render_script(&self) -> String {
        let breakpoint = self.breakpoint;
        format!(
            r"(function () {{
  var nav = document.querySelector('.sf-nav');
  if (!nav) {{ return; }}
  var toggle = nav.querySelector('.sf-nav-toggle');
  var menu = document.getElementById('{MOBILE_MENU_ID}');
  function setOpen(open) {{
    if (!menu || !toggle) {{ return; }}
    menu.hidden = !open;
    toggle.setAttribute('aria-expanded', open ? 'true' : 'false');
  }}
  function setActive(pageId) {{
    nav.setAttribute('data-active-page', pageId || '');
    nav.querySelectorAll('.sf-nav-link').forEach(function (link) {{
      var active = link.getAttribute('data-page-id') === pageId;
      link.classList.toggle('active', active);
      if (active) {{ link.setAttribute('aria-current', 'page'); }} else {{ link.removeAttribute('aria-current'); }}
    }});
  }}
  if (toggle) {{
    toggle.addEventListener('click', function () {{ setOpen(menu && menu.hidden); }});
  }}
  nav.querySelectorAll('.sf-nav-link').forEach(function (link) {{
    link.addEventListener('click', function () {{
      setActive(link.getAttribute('data-page-id'));
      setOpen(false);
    }});
  }});
  window.addEventListener('resize', function () {{
    if (window.innerWidth >= {breakpoint}) {{ setOpen(false); }}
    setActive(nav.getAttribute('data-active-page'));
  }});
  setActive(nav.getAttribute('data-active-page'));
}})();
"
        )
    }

    /// Breadcrumb trail from the home page to `current`.
    ///
    /// The home page itself gets a single, current crumb.
    #[must_use]
    pub fn render_breadcrumbs(&self, current: &ProcessedPage, pages: &[ProcessedPage]) -> String {
        let home = pages
            .iter()
            .find(|page| page.id == HOME_PAGE_ID)
            .or_else(|| pages.iter().find(|page| page.route == "/"));

        let mut html = String::from(
            r#"<nav class="sf-breadcrumbs" aria-label="Breadcrumb"><ol class="sf-breadcrumb-list">"#,
        );
        if let Some(home) = home.filter(|home| home.id != current.id) {
            let _ = write!(
                html,
                r#"<li class="sf-breadcrumb-item"><a href="{}">{}</a></li><li class="sf-breadcrumb-separator" aria-hidden="true">/</li>"#,
                url_attr(&home.route),
                escape_html(&home.name)
            );
        }
        let _ = write!(
            html,
            r#"<li class="sf-breadcrumb-item" aria-current="page">{}</li>"#,
            escape_html(&current.name)
        );
        html.push_str("</ol></nav>");
        html
    }
}

fn render_logo(config: &NavigationConfig) -> String {
    let text = config
        .logo_text
        .as_deref()
        .filter(|text| !text.trim().is_empty());

    if config.logo_type == LogoType::Image
        && let Some(src) = config.logo_image.as_deref().filter(|src| !src.trim().is_empty())
    {
        return format!(
            r#"<img class="sf-nav-logo-image sf-logo-{} sf-logo-{}" src="{}" alt="{}">"#,
            config.logo_shape.as_str(),
            config.logo_size.as_str(),
            url_attr(src),
            escape_html(text.unwrap_or("Logo"))
        );
    }

    format!(
        r#"<span class="sf-nav-logo-text">{}</span>"#,
        escape_html(text.unwrap_or("Home"))
    )
}

fn menu_items(pages: &[&ProcessedPage], active: Option<&str>) -> String {
    let mut html = String::new();
    for page in pages {
        let is_active = active == Some(page.id.as_str());
        let _ = write!(
            html,
            r#"<li><a class="sf-nav-link{}" href="{}" data-page-id="{}"{}>{}</a></li>"#,
            if is_active { " active" } else { "" },
            url_attr(&page.route),
            escape_html(&page.id),
            if is_active { r#" aria-current="page""# } else { "" },
            escape_html(&page.name)
        );
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sf_model::{LogoShape, LogoSize};

    fn page(id: &str, route: &str, is_deletable: bool) -> ProcessedPage {
        ProcessedPage {
            id: id.to_owned(),
            name: id.to_uppercase(),
            route: route.to_owned(),
            is_deletable,
            is_active: false,
            components: Vec::new(),
        }
    }

    fn pages() -> Vec<ProcessedPage> {
        vec![
            page(HOME_PAGE_ID, "/", false),
            page("about", "/about", true),
            page("secret", "/secret", false),
        ]
    }

    #[test]
    fn test_navigation_pages_filter() {
        let pages = pages();
        let ids: Vec<&str> = navigation_pages(&pages).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["home", "about"]);
    }

    #[test]
    fn test_menu_excludes_non_deletable_pages() {
        let html = NavigationRenderer::default().render_top_navigation(
            &NavigationConfig::default(),
            &pages(),
            Some("about"),
        );
        assert!(html.contains(r#"href="/about""#));
        assert!(!html.contains("/secret"));
        assert!(html.contains(
            r#"<a class="sf-nav-link active" href="/about" data-page-id="about" aria-current="page">ABOUT</a>"#
        ));
        assert_eq!(html.matches("data-page-id=\"home\"").count(), 2);
        assert!(html.contains(r#"id="sf-mobile-menu" hidden"#));
    }

    #[test]
    fn test_active_falls_back_to_flagged_page() {
        let mut pages = pages();
        pages[0].is_active = true;
        let html = NavigationRenderer::default().render_top_navigation(
            &NavigationConfig::default(),
            &pages,
            None,
        );
        assert!(html.contains(r#"data-active-page="home""#));
        assert!(html.contains(r#"<a class="sf-nav-link active" href="/""#));
    }

    #[test]
    fn test_text_logo_is_escaped() {
        let config = NavigationConfig {
            logo_text: Some("<b>Shop</b>".to_owned()),
            ..NavigationConfig::default()
        };
        let html = NavigationRenderer::default().render_top_navigation(&config, &pages(), None);
        assert!(html.contains(r#"<span class="sf-nav-logo-text">&lt;b&gt;Shop&lt;/b&gt;</span>"#));
    }

    #[test]
    fn test_image_logo_presets() {
        let config = NavigationConfig {
            logo_type: LogoType::Image,
            logo_text: Some("Acme".to_owned()),
            logo_image: Some("javascript:alert(1)".to_owned()),
            logo_shape: LogoShape::Circle,
            logo_size: LogoSize::Large,
            ..NavigationConfig::default()
        };
        let html = NavigationRenderer::default().render_top_navigation(&config, &pages(), None);
        assert!(html.contains("sf-logo-circle sf-logo-large"));
        assert!(html.contains(r##"src="#""##));
        assert!(html.contains(r#"alt="Acme""#));
    }

    #[test]
    fn test_image_logo_without_image_falls_back_to_text() {
        let config = NavigationConfig {
            logo_type: LogoType::Image,
            logo_text: Some("Acme".to_owned()),
            ..NavigationConfig::default()
        };
        let html = NavigationRenderer::default().render_top_navigation(&config, &pages(), None);
        assert!(html.contains(r#"<span class="sf-nav-logo-text">Acme</span>"#));
    }

    #[test]
    fn test_css_uses_config_and_breakpoint() {
        let config = NavigationConfig {
            background_color: "#000000".to_owned(),
            show_shadow: false,
            logo_size: LogoSize::Small,
            ..NavigationConfig::default()
        };
        let css = NavigationRenderer::new(900).render_css(&config);
        assert!(css.contains("background-color: #000000;"));
        assert!(css.contains("box-shadow: none;"));
        assert!(css.contains("width: 32px; height: 32px;"));
        assert!(css.contains("@media (max-width: 899px)"));
        assert!(css.contains("@media (min-width: 900px)"));
    }

    #[test]
    fn test_css_rejects_injected_color() {
        let config = NavigationConfig {
            text_color: "red; } body { display: none".to_owned(),
            ..NavigationConfig::default()
        };
        let css = NavigationRenderer::default().render_css(&config);
        assert!(css.contains("color: #1f2937;"));
        assert!(!css.contains("body {"));
    }

    #[test]
    fn test_script_uses_breakpoint() {
        let script = NavigationRenderer::new(1024).render_script();
        assert!(script.contains("window.innerWidth >= 1024"));
        assert!(script.contains("getElementById('sf-mobile-menu')"));
    }

    #[test]
    fn test_breadcrumbs() {
        let pages = pages();
        let renderer = NavigationRenderer::default();

        let html = renderer.render_breadcrumbs(&pages[1], &pages);
        assert!(html.contains(r#"<a href="/">HOME</a>"#));
        assert!(html.contains(r#"<li class="sf-breadcrumb-item" aria-current="page">ABOUT</li>"#));

        let html = renderer.render_breadcrumbs(&pages[0], &pages);
        assert!(!html.contains("<a href"));
        assert!(html.contains(r#"aria-current="page">HOME</li>"#));
    }
}
