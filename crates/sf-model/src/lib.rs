//! Data model for the storefront website renderer.
//!
//! This crate provides the types shared by every stage of the rendering
//! pipeline:
//! - [`IncomingData`]: Raw website payload handed over by the data-access layer
//! - [`ComponentDefinition`] / [`ComponentInstance`]: Catalogue entries and their placements
//! - [`ProcessedPage`] / [`NavigationConfig`]: Page list and top navigation settings
//! - [`ParsedWebsiteData`]: Fully processed aggregate used for rendering
//!
//! Wire names follow the JSON produced by the business API (`camelCase`).
//!
//! # Example
//!
//! ```
//! use sf_model::WebsiteDocument;
//!
//! let json = r#"{"pages": [{"id": "home", "name": "Home", "route": "/"}]}"#;
//! let document: WebsiteDocument = serde_json::from_str(json).unwrap();
//! assert_eq!(document.pages[0].route, "/");
//! assert!(document.built_in_navigation.is_none());
//! ```

mod component;
mod incoming;
mod navigation;
mod page;
mod website;

pub use component::{ComponentDefinition, ComponentInstance, Geometry, decode_json_object};
pub use incoming::{IncomingData, PageDocument, WebsiteDocument};
pub use navigation::{LogoShape, LogoSize, LogoType, NavigationConfig};
pub use page::{HOME_PAGE_ID, ProcessedPage};
pub use website::{DefinitionIndex, ParsedWebsiteData};

/// JSON object used for component parameters.
pub type Parameters = serde_json::Map<String, serde_json::Value>;

/// Deserialize a field, treating an explicit `null` like a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    let value = <Option<T> as serde::Deserialize>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}
