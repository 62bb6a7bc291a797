//! Component fragment rendering with caching.

use std::sync::Arc;

use serde::Serialize;
use sf_cache::{ComponentKey, RenderCache, content_digest};
use sf_model::{ComponentDefinition, ComponentInstance, Geometry, Parameters};

use crate::escape::{class_name, escape_html};
use crate::{ComponentError, ComponentKind, Params, merge_parameters};

/// Options for rendering one component.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRenderOptions {
    /// Wrap the fragment in an absolutely positioned container.
    pub include_wrapper: bool,
    /// Extra CSS classes for the wrapper.
    pub custom_classes: Vec<String>,
    /// Page being rendered. Only used to scope cache invalidation; not part
    /// of the cache key.
    #[serde(skip)]
    pub page_id: Option<String>,
}

impl Default for ComponentRenderOptions {
    fn default() -> Self {
        Self {
            include_wrapper: true,
            custom_classes: Vec::new(),
            page_id: None,
        }
    }
}

impl ComponentRenderOptions {
    /// Options for rendering as part of a page.
    #[must_use]
    pub fn for_page(page_id: &str) -> Self {
        Self {
            page_id: Some(page_id.to_owned()),
            ..Self::default()
        }
    }
}

/// Result of rendering one component.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentOutput {
    /// Final fragment (error fragment if rendering failed).
    pub html: String,
    /// Whether the fragment came from the cache.
    pub from_cache: bool,
    /// Error message if the error fragment was produced.
    pub error: Option<String>,
}

/// Everything that determines a component's output.
#[derive(Serialize)]
struct KeyMaterial<'a> {
    definition: &'a str,
    parameters: &'a Parameters,
    geometry: Option<&'a Geometry>,
    options: &'a ComponentRenderOptions,
}

/// Renders component instances to HTML fragments.
///
/// Fragments are cached by content: two instances of the same type and id
/// with identical parameters, geometry and options share one cache entry.
pub struct ComponentRenderer {
    cache: Arc<dyn RenderCache>,
}

impl ComponentRenderer {
    /// Create a renderer backed by `cache`.
    #[must_use]
    pub fn new(cache: Arc<dyn RenderCache>) -> Self {
        Self { cache }
    }

    /// Render a component to HTML.
    ///
    /// Never fails: rendering errors produce a visible error fragment.
    #[must_use]
    pub fn render(
        &self,
        instance: &ComponentInstance,
        definition: &ComponentDefinition,
        options: &ComponentRenderOptions,
    ) -> String {
        self.render_output(instance, definition, options).html
    }

    /// Render a component and report where the output came from.
    ///
    /// Successful fragments are stored in the cache under the page in
    /// `options.page_id`. Error fragments are not cached, so the failure is
    /// reported again on the next render.
    #[must_use]
    pub fn render_output(
        &self,
        instance: &ComponentInstance,
        definition: &ComponentDefinition,
        options: &ComponentRenderOptions,
    ) -> ComponentOutput {
        let key = Self::cache_key(instance, definition, options);
        if let Some(html) = self.cache.get_component(&key) {
            tracing::debug!(component_id = %instance.id, "Component cache hit");
            return ComponentOutput {
                html,
                from_cache: true,
                error: None,
            };
        }

        match render_fragment(instance, definition, options) {
            Ok(html) => {
                self.cache
                    .set_component(options.page_id.as_deref(), key, html.clone());
                ComponentOutput {
                    html,
                    from_cache: false,
                    error: None,
                }
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(
                    component_id = %instance.id,
                    component_type = %instance.component_type,
                    error = %message,
                    "Component render failed"
                );
                let fragment = error_fragment(instance, &message);
                ComponentOutput {
                    html: maybe_wrap(instance, options, &fragment),
                    from_cache: false,
                    error: Some(message),
                }
            }
        }
    }

    /// Content-addressed cache key for a component render.
    #[must_use]
    pub fn cache_key(
        instance: &ComponentInstance,
        definition: &ComponentDefinition,
        options: &ComponentRenderOptions,
    ) -> ComponentKey {
        let material = KeyMaterial {
            definition: &definition.id,
            parameters: &instance.parameters,
            geometry: options.include_wrapper.then_some(&instance.geometry),
            options,
        };
        ComponentKey::new(
            &instance.component_type,
            &instance.id,
            content_digest(&material),
        )
    }
}

fn render_fragment(
    instance: &ComponentInstance,
    definition: &ComponentDefinition,
    options: &ComponentRenderOptions,
) -> Result<String, ComponentError> {
    let parameters = merge_parameters(Some(definition), &instance.parameters)?;
    let inner = ComponentKind::from_type(&instance.component_type).render(
        Params::new(&parameters),
        Some(definition),
        &instance.component_type,
    )?;
    Ok(maybe_wrap(instance, options, &inner))
}

fn maybe_wrap(
    instance: &ComponentInstance,
    options: &ComponentRenderOptions,
    inner: &str,
) -> String {
    if options.include_wrapper {
        wrap(instance, &options.custom_classes, inner)
    } else {
        inner.to_owned()
    }
}

/// Wrap a fragment in a container positioned by the instance geometry.
fn wrap(instance: &ComponentInstance, custom_classes: &[String], inner: &str) -> String {
    let mut classes = format!(
        "sf-component sf-component-{}",
        class_name(&instance.component_type)
    );
    for class in custom_classes.iter().map(|c| class_name(c)) {
        if !class.is_empty() {
            classes.push(' ');
            classes.push_str(&class);
        }
    }
    let Geometry {
        x,
        y,
        width,
        height,
        z_index,
    } = instance.geometry;
    format!(
        r#"<div class="{classes}" data-component-id="{id}" data-component-type="{component_type}" style="position: absolute; left: {x}px; top: {y}px; width: {width}px; height: {height}px; z-index: {z_index};">{inner}</div>"#,
        id = escape_html(&instance.id),
        component_type = escape_html(&instance.component_type),
    )
}

/// Visible fragment shown in place of a component that failed to render.
fn error_fragment(instance: &ComponentInstance, message: &str) -> String {
    format!(
        r#"<div class="sf-component-error" role="alert" style="width: 100%; height: 100%; box-sizing: border-box; padding: 8px; border: 1px dashed #dc2626; background: #fef2f2; color: #991b1b; font-size: 13px; overflow: auto;"><strong>Component error</strong><div>Type: {component_type}</div><div>ID: {id}</div><div>Message: {message}</div></div>"#,
        component_type = escape_html(&instance.component_type),
        id = escape_html(&instance.id),
        message = escape_html(message),
    )
}

/// Placeholder for an instance whose type has no definition.
#[must_use]
pub fn missing_component_fragment(
    instance: &ComponentInstance,
    options: &ComponentRenderOptions,
) -> String {
    let inner = format!(
        r#"<div class="sf-component-missing" style="width: 100%; height: 100%; box-sizing: border-box; display: flex; align-items: center; justify-content: center; border: 1px dashed #9ca3af; background: #f9fafb; color: #6b7280; font-size: 13px;"><i class="pi pi-exclamation-triangle" aria-hidden="true" style="margin-right: 6px;"></i>Component not found: {}</div>"#,
        escape_html(&instance.component_type)
    );
    maybe_wrap(instance, options, &inner)
}
