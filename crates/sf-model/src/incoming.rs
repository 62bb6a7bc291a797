//! Raw payload handed to the renderer by the data-access layer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::component::ComponentInstance;
use crate::null_as_default;

/// Website payload as fetched from the business API.
///
/// Every field defaults so that a partially filled payload still
/// deserializes; the validator reports what is missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IncomingData {
    /// Workspace (business) the website belongs to.
    pub workspace_id: String,
    /// Website name.
    pub name: String,
    /// JSON-encoded [`WebsiteDocument`].
    pub website_json: String,
    /// Component catalogue; expected to be an array of
    /// [`ComponentDefinition`](crate::ComponentDefinition) objects.
    pub components: Value,
}

/// Decoded contents of [`IncomingData::website_json`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WebsiteDocument {
    /// Top navigation settings; absent fields take their defaults.
    pub built_in_navigation: Option<Value>,
    /// Pages in display order.
    pub pages: Vec<PageDocument>,
}

/// Page entry inside [`WebsiteDocument`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDocument {
    /// Page identifier.
    #[serde(default)]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Route, starting with `/`.
    #[serde(default)]
    pub route: String,
    /// Whether the page may be deleted by the site owner (absent means deletable).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deletable: Option<bool>,
    /// Placed components; `null` counts as none.
    #[serde(default, deserialize_with = "null_as_default")]
    pub components: Vec<ComponentInstance>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_null_components_is_empty() {
        let page: PageDocument = serde_json::from_value(json!({
            "id": "home", "name": "Home", "route": "/", "isDeletable": null, "components": null
        }))
        .unwrap();

        assert!(page.components.is_empty());
        assert_eq!(page.is_deletable, None);
    }
}
