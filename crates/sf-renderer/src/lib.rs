//! HTML generators for storefront components and navigation.
//!
//! This crate turns the data model from `sf-model` into HTML fragments:
//! - [`ComponentRenderer`]: One fragment per component instance, cached by content
//! - [`NavigationRenderer`]: Top navigation bar, its CSS/JS and breadcrumbs
//!
//! Built-in component types are selected through [`ComponentKind`]; any
//! unknown type falls back to filling the definition's HTML template.
//!
//! All user-controlled strings are escaped with [`escape_html`] and all URLs
//! pass through [`sanitize_url`] before they reach the output.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use sf_cache::MemoryCache;
//! use sf_model::{ComponentDefinition, ComponentInstance, Geometry};
//! use sf_renderer::{ComponentRenderOptions, ComponentRenderer};
//!
//! let renderer = ComponentRenderer::new(Arc::new(MemoryCache::new("ws-1")));
//! let definition = ComponentDefinition {
//!     id: "def-1".to_owned(),
//!     component_type: Some("text-block".to_owned()),
//!     ..Default::default()
//! };
//! let mut instance = ComponentInstance {
//!     id: "c1".to_owned(),
//!     component_type: "text-block".to_owned(),
//!     geometry: Geometry { width: 200.0, height: 80.0, ..Default::default() },
//!     parameters: Default::default(),
//! };
//! instance.parameters.insert("title".to_owned(), "Welcome".into());
//!
//! let html = renderer.render(&instance, &definition, &ComponentRenderOptions::default());
//! assert!(html.contains("Welcome"));
//! assert!(html.contains(r#"data-component-id="c1""#));
//! ```

mod component;
mod components;
mod error;
pub mod escape;
mod navigation;
mod params;

pub use component::{
    ComponentOutput, ComponentRenderOptions, ComponentRenderer, missing_component_fragment,
};
pub use components::ComponentKind;
pub use error::ComponentError;
pub use escape::{escape_html, sanitize_url};
pub use navigation::{DEFAULT_BREAKPOINT, NavigationRenderer, navigation_pages};
pub use params::{Params, merge_parameters};
