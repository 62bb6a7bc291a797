//! Turning validated incoming data into [`ParsedWebsiteData`].

use std::sync::Arc;

use serde_json::Value;
use sf_model::{
    ComponentDefinition, DefinitionIndex, IncomingData, NavigationConfig, PageDocument,
    ParsedWebsiteData, ProcessedPage, WebsiteDocument,
};

use crate::SiteError;

/// Parse and process incoming data.
///
/// Expects data that passed [`validate_incoming_data`](crate::validate_incoming_data).
/// The first page is marked active.
///
/// # Errors
///
/// Returns [`SiteError::WebsiteJson`] or [`SiteError::ComponentCatalogue`] if
/// decoding fails, and [`SiteError::ParameterJson`] if a definition's default
/// parameters are not a JSON object.
pub(crate) fn parse_website_data(data: &IncomingData) -> Result<ParsedWebsiteData, SiteError> {
    let document: WebsiteDocument =
        serde_json::from_str(&data.website_json).map_err(SiteError::WebsiteJson)?;
    let catalogue: Vec<ComponentDefinition> =
        serde_json::from_value(data.components.clone()).map_err(SiteError::ComponentCatalogue)?;

    let definitions = index_definitions(catalogue);
    let navigation = build_navigation(document.built_in_navigation, &data.name)?;
    let mut pages = document
        .pages
        .into_iter()
        .map(|page| process_page(page, &definitions))
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(first) = pages.first_mut() {
        first.is_active = true;
    }

    Ok(ParsedWebsiteData {
        workspace_id: data.workspace_id.clone(),
        name: data.name.clone(),
        navigation,
        pages,
        definitions,
    })
}

/// Index definitions under their id and their type alias.
///
/// Aliases are inserted after ids, so an instance type always resolves to the
/// definition declaring that type.
fn index_definitions(catalogue: Vec<ComponentDefinition>) -> DefinitionIndex {
    let definitions: Vec<Arc<ComponentDefinition>> = catalogue.into_iter().map(Arc::new).collect();
    let mut index = DefinitionIndex::with_capacity(definitions.len() * 2);
    for definition in &definitions {
        index.insert(definition.id.clone(), Arc::clone(definition));
    }
    for definition in &definitions {
        if let Some(alias) = definition.type_alias() {
            index.insert(alias.to_owned(), Arc::clone(definition));
        }
    }
    index
}

/// Navigation settings with defaults for absent fields.
///
/// The logo text defaults to the website name.
fn build_navigation(raw: Option<Value>, site_name: &str) -> Result<NavigationConfig, SiteError> {
    let mut navigation = match raw {
        None => NavigationConfig::default(),
        Some(value) => NavigationConfig::from_json(value).map_err(SiteError::WebsiteJson)?,
    };
    if navigation
        .logo_text
        .as_deref()
        .is_none_or(|text| text.trim().is_empty())
    {
        navigation.logo_text = Some(site_name.to_owned());
    }
    Ok(navigation)
}

/// Merge every instance's parameters against its definition.
///
/// Instances without a definition keep their own parameters; they render as
/// a placeholder later.
fn process_page(
    page: PageDocument,
    definitions: &DefinitionIndex,
) -> Result<ProcessedPage, SiteError> {
    let mut components = page.components;
    for instance in &mut components {
        let Some(definition) = definitions.get(&instance.component_type) else {
            continue;
        };
        let mut merged =
            definition
                .default_parameter_values()
                .map_err(|source| SiteError::ParameterJson {
                    component: definition.id.clone(),
                    source,
                })?;
        merged.extend(std::mem::take(&mut instance.parameters));
        instance.parameters = merged;
    }

    Ok(ProcessedPage {
        id: page.id,
        name: page.name,
        route: page.route,
        is_deletable: page.is_deletable.unwrap_or(true),
        is_active: false,
        components,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn incoming(website: Value, components: Value) -> IncomingData {
        IncomingData {
            workspace_id: "ws-1".to_owned(),
            name: "Corner Shop".to_owned(),
            website_json: website.to_string(),
            components,
        }
    }

    #[test]
    fn test_parse_merges_parameters_and_activates_first_page() {
        let data = incoming(
            json!({"pages": [
                {"id": "home", "name": "Home", "route": "/", "components": [
                    {"id": "c1", "type": "text-block", "width": 100, "height": 50,
                     "parameters": {"title": "Mine"}}
                ]},
                {"id": "about", "name": "About", "route": "/about", "isDeletable": false}
            ]}),
            json!([{"id": "def-1", "componentType": "text-block",
                    "parameters": "{\"title\": \"Default\", \"textAlign\": \"center\"}"}]),
        );

        let parsed = parse_website_data(&data).unwrap();

        assert!(parsed.pages[0].is_active);
        assert!(!parsed.pages[1].is_active);
        assert!(parsed.pages[0].is_deletable);
        assert!(!parsed.pages[1].is_deletable);
        let params = &parsed.pages[0].components[0].parameters;
        assert_eq!(params.get("title"), Some(&json!("Mine")));
        assert_eq!(params.get("textAlign"), Some(&json!("center")));
    }

    #[test]
    fn test_definitions_indexed_by_id_and_alias() {
        let data = incoming(
            json!({"pages": [{"id": "home", "name": "Home", "route": "/"}]}),
            json!([
                {"id": "def-1", "componentType": "text-block"},
                {"id": "def-2", "componentId": "legacy-card"}
            ]),
        );

        let parsed = parse_website_data(&data).unwrap();

        assert_eq!(parsed.definitions.len(), 4);
        assert!(Arc::ptr_eq(
            parsed.definition("def-1").unwrap(),
            parsed.definition("text-block").unwrap()
        ));
        assert_eq!(parsed.definition("legacy-card").unwrap().id, "def-2");
    }

    #[test]
    fn test_navigation_defaults() {
        let data = incoming(
            json!({"builtInNavigation": {"logoShape": "circle"},
                   "pages": [{"id": "home", "name": "Home", "route": "/"}]}),
            json!([]),
        );

        let parsed = parse_website_data(&data).unwrap();

        assert_eq!(parsed.navigation.logo_text.as_deref(), Some("Corner Shop"));
        assert_eq!(parsed.navigation.background_color, "#ffffff");
        assert_eq!(parsed.navigation.logo_shape, sf_model::LogoShape::Circle);
    }

    #[test]
    fn test_invalid_default_parameters() {
        let data = incoming(
            json!({"pages": [{"id": "home", "name": "Home", "route": "/", "components": [
                {"id": "c1", "type": "text-block", "width": 10, "height": 10}
            ]}]}),
            json!([{"id": "def-1", "componentType": "text-block", "parameters": "[1, 2]"}]),
        );

        let err = parse_website_data(&data).unwrap_err();

        assert!(matches!(err, SiteError::ParameterJson { ref component, .. } if component == "def-1"));
    }

    #[test]
    fn test_undecodable_website_json() {
        let mut data = incoming(json!({}), json!([]));
        data.website_json = r#""not an object""#.to_owned();
        assert!(matches!(
            parse_website_data(&data).unwrap_err(),
            SiteError::WebsiteJson(_)
        ));
    }
}
