//! Standalone HTML document assembly.

use std::fmt::Write as _;

use sf_config::{AssetsConfig, EngineConfig};
use sf_model::ProcessedPage;
use sf_renderer::escape_html;

/// Document-level settings taken from [`EngineConfig`].
#[derive(Clone, Debug)]
pub(crate) struct DocumentSettings {
    lang: String,
    title_suffix: Option<String>,
    assets: AssetsConfig,
}

impl From<&EngineConfig> for DocumentSettings {
    fn from(config: &EngineConfig) -> Self {
        Self {
            lang: config.document.lang.clone(),
            title_suffix: config
                .document
                .title_suffix
                .clone()
                .filter(|suffix| !suffix.trim().is_empty()),
            assets: config.assets.clone(),
        }
    }
}

/// Navigation output to embed.
pub(crate) struct NavigationParts {
    pub html: String,
    pub css: String,
    pub script: String,
}

/// Everything that goes into one page document.
pub(crate) struct DocumentParts<'a> {
    pub page: &'a ProcessedPage,
    pub site_name: &'a str,
    pub navigation: Option<NavigationParts>,
    pub body: &'a str,
    pub custom_css: Option<&'a str>,
}

/// Styles for icon and widget classes, used until (or if never) the external
/// stylesheets load.
const FALLBACK_CSS: &str = r#".pi { display: inline-block; font-family: "primeicons", sans-serif; font-style: normal; font-weight: normal; line-height: 1; speak: none; -webkit-font-smoothing: antialiased; }
.pi-star::before { content: "\2606"; }
.pi-star-fill::before { content: "\2605"; }
.pi-image::before { content: "\1F5BC"; }
.pi-exclamation-triangle::before { content: "\26A0"; }
.pi-facebook::before { content: "f"; }
.pi-twitter::before { content: "t"; }
.pi-instagram::before { content: "i"; }
.pi-linkedin::before { content: "in"; }
.pi-youtube::before { content: "\25B6"; }
.pi-github::before { content: "gh"; }
.p-component { font-family: inherit; font-size: 1rem; }
.p-button { display: inline-flex; align-items: center; justify-content: center; gap: 0.5rem; padding: 0.75rem 1.25rem; border: 1px solid #3b82f6; border-radius: 6px; background: #3b82f6; color: #ffffff; font-size: 1rem; cursor: pointer; text-decoration: none; transition: background-color 0.2s, box-shadow 0.2s; }
.p-button:hover { background: #2563eb; border-color: #2563eb; }
.p-button:focus-visible { outline: 2px solid #93c5fd; outline-offset: 2px; }
.p-button-label { font-weight: 600; }
.p-card { background: #ffffff; color: #1f2937; border-radius: 6px; box-shadow: 0 2px 1px -1px rgba(0, 0, 0, 0.2), 0 1px 1px 0 rgba(0, 0, 0, 0.14), 0 1px 3px 0 rgba(0, 0, 0, 0.12); }
.p-card-title { font-size: 1.5rem; font-weight: 700; margin-bottom: 0.5rem; }
.p-card-subtitle { color: #6b7280; font-weight: 400; margin-bottom: 0.5rem; }
.p-card-content { padding: 0.5rem 0; }
.p-card-footer { padding-top: 0.75rem; }
"#;

const PAGE_SCRIPT: &str = r"(function () {
  var main = document.querySelector('main.sf-page');
  function loadImage(img) {
    img.src = img.getAttribute('data-src');
    img.removeAttribute('data-src');
  }
  var lazy = document.querySelectorAll('img[data-src]');
  if ('IntersectionObserver' in window) {
    var observer = new IntersectionObserver(function (entries) {
      entries.forEach(function (entry) {
        if (entry.isIntersecting) {
          loadImage(entry.target);
          observer.unobserve(entry.target);
        }
      });
    }, { rootMargin: '200px' });
    lazy.forEach(function (img) { observer.observe(img); });
  } else {
    lazy.forEach(loadImage);
  }
  function fit() {
    if (!main) { return; }
    var width = parseFloat(main.getAttribute('data-canvas-width')) || 0;
    var scale = width > 0 && window.innerWidth < width ? window.innerWidth / width : 1;
    main.style.transform = scale < 1 ? 'scale(' + scale + ')' : '';
    main.style.transformOrigin = 'top left';
  }
  var pending;
  window.addEventListener('resize', function () {
    window.clearTimeout(pending);
    pending = window.setTimeout(fit, 100);
  });
  fit();
  var announcer = document.getElementById('sf-announcer');
  if (announcer) {
    window.setTimeout(function () {
      announcer.textContent = announcer.getAttribute('data-message') || '';
    }, 100);
  }
})();
";

/// Assemble a complete HTML document.
pub(crate) fn render_document(settings: &DocumentSettings, parts: &DocumentParts<'_>) -> String {
    let page = parts.page;
    let title = match &settings.title_suffix {
        Some(suffix) => format!("{} | {suffix}", page.name),
        None => page.name.clone(),
    };
    let description = format!("{} - {}", page.name, parts.site_name);

    let mut html = String::with_capacity(parts.body.len() + FALLBACK_CSS.len() + 4096);
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n<meta charset=\"utf-8\">\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n<title>{}</title>\n<meta name=\"description\" content=\"{}\">\n",
        escape_html(&settings.lang),
        escape_html(&title),
        escape_html(&description)
    );

    let assets = &settings.assets;
    for (primary, fallback) in [
        (&assets.font_url, &assets.font_fallback_url),
        (&assets.icon_css_url, &assets.icon_css_fallback_url),
        (&assets.theme_css_url, &assets.theme_css_fallback_url),
    ] {
        html.push_str(&stylesheet_link(primary, fallback));
    }

    let _ = write!(html, "<style>\n{FALLBACK_CSS}</style>\n");
    let _ = write!(html, "<style>\n{}", page_css(page));
    if let Some(navigation) = &parts.navigation {
        html.push_str(&navigation.css);
    }
    if let Some(custom) = parts.custom_css.filter(|css| !css.trim().is_empty()) {
        html.push_str(&style_text(custom));
        html.push('\n');
    }
    html.push_str("</style>\n</head>\n<body>\n");

    if let Some(navigation) = &parts.navigation {
        html.push_str(&navigation.html);
        html.push('\n');
    }
    let _ = write!(
        html,
        "<main class=\"sf-page\" data-page-id=\"{}\" data-canvas-width=\"{}\">{}</main>\n",
        escape_html(&page.id),
        canvas_width(page),
        parts.body
    );
    let _ = write!(
        html,
        "<div id=\"sf-announcer\" class=\"sf-visually-hidden\" aria-live=\"polite\" data-message=\"{}\"></div>\n",
        escape_html(&format!("{} page loaded", page.name))
    );
    let _ = write!(html, "<script>\n{PAGE_SCRIPT}</script>\n");
    if let Some(navigation) = &parts.navigation {
        let _ = write!(html, "<script>\n{}</script>\n", navigation.script);
    }
    html.push_str("</body>\n</html>\n");
    html
}

/// `<link>` to a stylesheet that swaps to `fallback` if loading fails.
fn stylesheet_link(primary: &str, fallback: &str) -> String {
    match (primary.is_empty(), fallback.is_empty()) {
        (true, true) => String::new(),
        (true, false) => format!(
            "<link rel=\"stylesheet\" href=\"{}\">\n",
            escape_html(fallback)
        ),
        (false, true) => format!(
            "<link rel=\"stylesheet\" href=\"{}\">\n",
            escape_html(primary)
        ),
        (false, false) => format!(
            "<link rel=\"stylesheet\" href=\"{}\" onerror=\"this.onerror=null;this.href='{}';\">\n",
            escape_html(primary),
            escape_html(&js_string(fallback))
        ),
    }
}

/// Escape for a single-quoted JavaScript string literal.
fn js_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Keep text from closing the surrounding `<style>` element.
fn style_text(css: &str) -> String {
    css.replace("</", "<\\/")
}

fn page_css(page: &ProcessedPage) -> String {
    format!(
        r#"*, *::before, *::after {{ box-sizing: border-box; }}
body {{ margin: 0; font-family: "Inter", system-ui, -apple-system, "Segoe UI", Roboto, sans-serif; color: #1f2937; background: #ffffff; }}
main.sf-page {{ position: relative; width: 100%; max-width: {width}px; min-height: {height}px; margin: 0 auto; }}
.sf-component {{ overflow: hidden; }}
.sf-component img {{ max-width: 100%; }}
img[data-src] {{ opacity: 0; transition: opacity 0.3s ease; }}
.sf-visually-hidden {{ position: absolute; width: 1px; height: 1px; margin: -1px; padding: 0; overflow: hidden; clip: rect(0, 0, 0, 0); white-space: nowrap; border: 0; }}
"#,
        width = canvas_width(page).max(1.0),
        height = page.canvas_height(),
    )
}

/// Largest right edge among the page's components.
fn canvas_width(page: &ProcessedPage) -> f64 {
    page.components
        .iter()
        .map(|c| c.geometry.x + c.geometry.width)
        .fold(0.0, f64::max)
}
