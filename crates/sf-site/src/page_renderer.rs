//! Full page rendering.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use sf_cache::{PageKey, RenderCache, content_digest};
use sf_config::EngineConfig;
use sf_model::{ComponentInstance, DefinitionIndex, NavigationConfig, ProcessedPage};
use sf_renderer::{
    ComponentRenderOptions, ComponentRenderer, NavigationRenderer, missing_component_fragment,
    navigation_pages,
};

use crate::document::{DocumentParts, DocumentSettings, NavigationParts, render_document};

/// Options for rendering a page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRenderOptions {
    /// Render the top navigation bar.
    pub include_navigation: bool,
    /// Position components absolutely on the page canvas.
    pub include_wrapper: bool,
    /// Extra CSS appended to the page styles.
    pub custom_css: Option<String>,
}

impl Default for PageRenderOptions {
    fn default() -> Self {
        Self {
            include_navigation: true,
            include_wrapper: true,
            custom_css: None,
        }
    }
}

/// Non-fatal problem found while rendering a page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderWarning {
    /// A component failed and was replaced by an error fragment.
    ComponentFailed {
        component_id: String,
        component_type: String,
        message: String,
    },
    /// No definition matches the instance type; a placeholder was rendered.
    MissingDefinition {
        component_id: String,
        component_type: String,
    },
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ComponentFailed {
                component_id,
                component_type,
                message,
            } => write!(f, "component {component_id} ({component_type}) failed: {message}"),
            Self::MissingDefinition {
                component_id,
                component_type,
            } => write!(f, "component {component_id}: no definition for type {component_type}"),
        }
    }
}

/// Result of rendering a page.
#[derive(Clone, Debug)]
pub struct RenderedPage {
    /// Page id.
    pub page_id: String,
    /// Complete HTML document.
    pub html: String,
    /// Whether the document came from the page cache.
    pub from_cache: bool,
    /// Problems replaced by fragments. Empty for cached documents.
    pub warnings: Vec<RenderWarning>,
}

/// Page-level inputs that determine the document.
#[derive(Serialize)]
struct PageKeyMaterial<'a> {
    name: &'a str,
    route: &'a str,
    components: &'a [ComponentInstance],
    options: &'a PageRenderOptions,
    navigation: Option<(&'a NavigationConfig, Vec<(&'a str, &'a str, &'a str)>)>,
}

/// Renders processed pages to standalone HTML documents.
pub struct PageRenderer {
    cache: Arc<dyn RenderCache>,
    components: ComponentRenderer,
    navigation: NavigationRenderer,
    document: DocumentSettings,
    site_name: String,
}

impl PageRenderer {
    /// Create a renderer for one website.
    ///
    /// # Arguments
    ///
    /// * `cache` - Cache shared by page and component output
    /// * `config` - Engine configuration (breakpoint, assets, document settings)
    /// * `site_name` - Website name, used in page descriptions
    #[must_use]
    pub fn new(cache: Arc<dyn RenderCache>, config: &EngineConfig, site_name: impl Into<String>) -> Self {
        Self {
            components: ComponentRenderer::new(Arc::clone(&cache)),
            cache,
            navigation: NavigationRenderer::new(config.navigation.mobile_breakpoint),
            document: DocumentSettings::from(config),
            site_name: site_name.into(),
        }
    }

    /// Navigation renderer used for the top bar and breadcrumbs.
    #[must_use]
    pub fn navigation(&self) -> &NavigationRenderer {
        &self.navigation
    }

    /// Render a page to a complete HTML document.
    ///
    /// Components are drawn in ascending `z_index` order; ties keep document
    /// order. Instances without a definition become a placeholder and
    /// component failures an error fragment; both are reported as warnings.
    #[must_use]
    pub fn render_page(
        &self,
        page: &ProcessedPage,
        navigation: &NavigationConfig,
        all_pages: &[ProcessedPage],
        definitions: &DefinitionIndex,
        options: &PageRenderOptions,
    ) -> RenderedPage {
        let key = Self::cache_key(page, navigation, all_pages, options);
        if let Some(html) = self.cache.get_page(&key) {
            tracing::debug!(page_id = %page.id, "Page cache hit");
            return RenderedPage {
                page_id: page.id.clone(),
                html,
                from_cache: true,
                warnings: Vec::new(),
            };
        }

        let mut ordered: Vec<&ComponentInstance> = page.components.iter().collect();
        ordered.sort_by_key(|instance| instance.geometry.z_index);

        let component_options = ComponentRenderOptions {
            include_wrapper: options.include_wrapper,
            ..ComponentRenderOptions::for_page(&page.id)
        };
        let mut body = String::new();
        let mut warnings = Vec::new();
        for instance in ordered {
            let html = match definitions.get(&instance.component_type) {
                Some(definition) => {
                    let output =
                        self.components
                            .render_output(instance, definition, &component_options);
                    if let Some(message) = output.error {
                        warnings.push(RenderWarning::ComponentFailed {
                            component_id: instance.id.clone(),
                            component_type: instance.component_type.clone(),
                            message,
                        });
                    }
                    output.html
                }
                None => {
                    tracing::debug!(
                        page_id = %page.id,
                        component_id = %instance.id,
                        component_type = %instance.component_type,
                        "No definition for component type"
                    );
                    warnings.push(RenderWarning::MissingDefinition {
                        component_id: instance.id.clone(),
                        component_type: instance.component_type.clone(),
                    });
                    missing_component_fragment(instance, &component_options)
                }
            };
            body.push_str(&html);
            body.push('\n');
        }

        let navigation_parts = options.include_navigation.then(|| NavigationParts {
            html: self
                .navigation
                .render_top_navigation(navigation, all_pages, Some(&page.id)),
            css: self.navigation.render_css(navigation),
            script: self.navigation.render_script(),
        });

        let html = render_document(
            &self.document,
            &DocumentParts {
                page,
                site_name: &self.site_name,
                navigation: navigation_parts,
                body: &body,
                custom_css: options.custom_css.as_deref(),
            },
        );

        self.cache.set_page(key, html.clone());
        tracing::debug!(
            page_id = %page.id,
            components = page.components.len(),
            warnings = warnings.len(),
            "Rendered page"
        );

        RenderedPage {
            page_id: page.id.clone(),
            html,
            from_cache: false,
            warnings,
        }
    }

    /// Content-addressed cache key for a page render.
    ///
    /// Covers the page's components, the render options and, when the
    /// navigation bar is included, the navigation settings and menu entries.
    #[must_use]
    pub fn cache_key(
        page: &ProcessedPage,
        navigation: &NavigationConfig,
        all_pages: &[ProcessedPage],
        options: &PageRenderOptions,
    ) -> PageKey {
        let material = PageKeyMaterial {
            name: &page.name,
            route: &page.route,
            components: &page.components,
            options,
            navigation: options.include_navigation.then(|| {
                let entries = navigation_pages(all_pages)
                    .into_iter()
                    .map(|p| (p.id.as_str(), p.name.as_str(), p.route.as_str()))
                    .collect();
                (navigation, entries)
            }),
        };
        PageKey::new(&page.id, content_digest(&material))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use sf_cache::MemoryCache;
    use sf_model::{ComponentDefinition, Geometry, Parameters};

    fn instance(id: &str, component_type: &str, z_index: u32, title: &str) -> ComponentInstance {
        let mut parameters = Parameters::new();
        parameters.insert("title".to_owned(), json!(title));
        ComponentInstance {
            id: id.to_owned(),
            component_type: component_type.to_owned(),
            geometry: Geometry {
                x: 0.0,
                y: 0.0,
                width: 100.0,
                height: 50.0,
                z_index,
            },
            parameters,
        }
    }

    fn page(components: Vec<ComponentInstance>) -> ProcessedPage {
        ProcessedPage {
            id: "home".to_owned(),
            name: "Home".to_owned(),
            route: "/".to_owned(),
            is_deletable: false,
            is_active: true,
            components,
        }
    }

    fn definitions() -> DefinitionIndex {
        let definition = Arc::new(ComponentDefinition {
            id: "def-text".to_owned(),
            component_type: Some("text-block".to_owned()),
            ..Default::default()
        });
        DefinitionIndex::from([
            ("def-text".to_owned(), Arc::clone(&definition)),
            ("text-block".to_owned(), definition),
        ])
    }

    fn renderer() -> (Arc<MemoryCache>, PageRenderer) {
        let cache = Arc::new(MemoryCache::new("ws"));
        let renderer = PageRenderer::new(Arc::<MemoryCache>::clone(&cache), &EngineConfig::default(), "Shop");
        (cache, renderer)
    }

    #[test]
    fn test_components_render_in_z_order() {
        let (_, renderer) = renderer();
        let page = page(vec![
            instance("a", "text-block", 3, "FIRST-IN-DOC"),
            instance("b", "text-block", 1, "SECOND-IN-DOC"),
            instance("c", "text-block", 2, "THIRD-IN-DOC"),
        ]);
        let pages = vec![page.clone()];

        let result = renderer.render_page(
            &page,
            &NavigationConfig::default(),
            &pages,
            &definitions(),
            &PageRenderOptions::default(),
        );

        let b = result.html.find("SECOND-IN-DOC").unwrap();
        let c = result.html.find("THIRD-IN-DOC").unwrap();
        let a = result.html.find("FIRST-IN-DOC").unwrap();
        assert!(b < c && c < a);
    }

    #[test]
    fn test_images_are_deferred_to_page_script() {
        let (_, renderer) = renderer();
        let mut image = instance("hero", "image", 0, "");
        image.parameters.insert("src".to_owned(), json!("/hero.png"));
        let page = page(vec![image]);
        let pages = vec![page.clone()];
        let definition = Arc::new(ComponentDefinition {
            id: "def-image".to_owned(),
            component_type: Some("image".to_owned()),
            ..Default::default()
        });
        let definitions = DefinitionIndex::from([("image".to_owned(), definition)]);

        let html = renderer
            .render_page(&page, &NavigationConfig::default(), &pages, &definitions, &PageRenderOptions::default())
            .html;

        assert!(html.contains(r#"data-src="/hero.png""#));
        assert!(!html.contains(r#" src="/hero.png""#));
        assert!(html.contains("querySelectorAll('img[data-src]')"));
    }

    #[test]
    fn test_equal_z_index_keeps_document_order() {
        let (_, renderer) = renderer();
        let page = page(vec![
            instance("a", "text-block", 1, "ALPHA"),
            instance("b", "text-block", 0, "BRAVO"),
            instance("c", "text-block", 1, "CHARLIE"),
        ]);
        let pages = vec![page.clone()];

        let html = renderer
            .render_page(&page, &NavigationConfig::default(), &pages, &definitions(), &PageRenderOptions::default())
            .html;

        let positions: Vec<usize> = ["BRAVO", "ALPHA", "CHARLIE"]
            .iter()
            .map(|s| html.find(s).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_missing_definition_is_placeholder() {
        let (_, renderer) = renderer();
        let page = page(vec![instance("g1", "ghost-widget", 0, "x")]);
        let pages = vec![page.clone()];

        let result = renderer.render_page(
            &page,
            &NavigationConfig::default(),
            &pages,
            &definitions(),
            &PageRenderOptions::default(),
        );

        assert!(result.html.contains("Component not found: ghost-widget"));
        assert_eq!(
            result.warnings,
            vec![RenderWarning::MissingDefinition {
                component_id: "g1".to_owned(),
                component_type: "ghost-widget".to_owned(),
            }]
        );
    }

    #[test]
    fn test_second_render_comes_from_cache() {
        let (cache, renderer) = renderer();
        let page = page(vec![instance("a", "text-block", 0, "Hello")]);
        let pages = vec![page.clone()];
        let render = || {
            renderer.render_page(
                &page,
                &NavigationConfig::default(),
                &pages,
                &definitions(),
                &PageRenderOptions::default(),
            )
        };

        let first = render();
        let second = render();

        assert!(!first.from_cache);
        assert!(second.from_cache);
        assert_eq!(first.html, second.html);
        assert_eq!(cache.stats().pages, 1);
    }

    #[test]
    fn test_navigation_optional() {
        let (_, renderer) = renderer();
        let page = page(Vec::new());
        let pages = vec![page.clone()];

        let with_nav = renderer.render_page(
            &page,
            &NavigationConfig::default(),
            &pages,
            &definitions(),
            &PageRenderOptions::default(),
        );
        let without_nav = renderer.render_page(
            &page,
            &NavigationConfig::default(),
            &pages,
            &definitions(),
            &PageRenderOptions {
                include_navigation: false,
                ..PageRenderOptions::default()
            },
        );

        assert!(with_nav.html.contains(r#"<nav class="sf-nav""#));
        assert!(!without_nav.html.contains(r#"<nav class="sf-nav""#));
        assert!(!without_nav.from_cache);
    }

    #[test]
    fn test_component_failure_is_warning() {
        let (_, renderer) = renderer();
        let mut broken = instance("f1", "footer", 0, "x");
        broken.parameters.insert("links".to_owned(), json!(42));
        let mut definitions = definitions();
        definitions.insert(
            "footer".to_owned(),
            Arc::new(ComponentDefinition {
                id: "def-footer".to_owned(),
                component_type: Some("footer".to_owned()),
                ..Default::default()
            }),
        );
        let page = page(vec![broken, instance("t1", "text-block", 1, "Still here")]);
        let pages = vec![page.clone()];

        let result = renderer.render_page(
            &page,
            &NavigationConfig::default(),
            &pages,
            &definitions,
            &PageRenderOptions::default(),
        );

        assert!(result.html.contains("sf-component-error"));
        assert!(result.html.contains("Still here"));
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(
            result.warnings[0].to_string(),
            "component f1 (footer) failed: parameter `links` must be an array"
        );
    }

    #[test]
    fn test_cache_key_ignores_active_flag() {
        let page = page(vec![instance("a", "text-block", 0, "x")]);
        let mut inactive = page.clone();
        inactive.is_active = false;
        let pages = vec![page.clone()];
        let options = PageRenderOptions::default();
        let nav = NavigationConfig::default();

        assert_eq!(
            PageRenderer::cache_key(&page, &nav, &pages, &options),
            PageRenderer::cache_key(&inactive, &nav, &pages, &options)
        );
    }
}
