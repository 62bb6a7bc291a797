//! Validation of incoming website data.
//!
//! Works on the raw JSON so that every problem can be reported with its
//! location, instead of stopping at the first deserialization error.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};
use sf_model::{IncomingData, decode_json_object};

const LOGO_TYPES: [&str; 2] = ["text", "image"];
const LOGO_SHAPES: [&str; 3] = ["square", "rounded", "circle"];
const LOGO_SIZES: [&str; 3] = ["small", "medium", "large"];
const DEFINITION_JSON_FIELDS: [&str; 3] = ["parametersSchema", "parameters", "defaultParameters"];

/// Outcome of [`validate_incoming_data`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Every problem found, in check order.
    pub errors: Vec<String>,
}

/// Check incoming website data.
///
/// Checks, in order: required top-level fields, the component catalogue
/// shape, that `websiteJson` parses, the navigation settings, every page and
/// its components, then every component definition. Never mutates the input
/// and never fails; all problems are collected.
#[must_use]
pub fn validate_incoming_data(data: &IncomingData) -> ValidationResult {
    let mut v = Validator::default();

    if data.workspace_id.trim().is_empty() {
        v.error("workspaceId is required");
    }
    if data.name.trim().is_empty() {
        v.error("name is required");
    }
    if data.website_json.trim().is_empty() {
        v.error("websiteJson is required");
    }
    let definitions = match &data.components {
        Value::Array(items) => Some(items),
        _ => {
            v.error("components must be an array");
            None
        }
    };

    if !data.website_json.trim().is_empty() {
        match serde_json::from_str::<Value>(&data.website_json) {
            Ok(Value::Object(document)) => v.website(&document),
            Ok(_) => v.error("websiteJson must be a JSON object"),
            Err(e) => v.error(format!("websiteJson is not valid JSON: {e}")),
        }
    }

    if let Some(items) = definitions {
        v.definitions(items);
    }

    ValidationResult {
        is_valid: v.errors.is_empty(),
        errors: v.errors,
    }
}

#[derive(Default)]
struct Validator {
    errors: Vec<String>,
}

impl Validator {
    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn website(&mut self, document: &Map<String, Value>) {
        match document.get("builtInNavigation") {
            None | Some(Value::Null) => {}
            Some(Value::Object(nav)) => self.navigation(nav),
            Some(_) => self.error("builtInNavigation must be an object"),
        }

        match document.get("pages") {
            Some(Value::Array(pages)) if pages.is_empty() => {
                self.error("pages must contain at least one page");
            }
            Some(Value::Array(pages)) => self.pages(pages),
            _ => self.error("pages must be an array"),
        }
    }

    fn navigation(&mut self, nav: &Map<String, Value>) {
        let logo_type = self.one_of(nav, "logoType", &LOGO_TYPES);
        self.one_of(nav, "logoShape", &LOGO_SHAPES);
        self.one_of(nav, "logoSize", &LOGO_SIZES);

        for field in ["logoText", "logoImage"] {
            if !matches!(nav.get(field), None | Some(Value::Null | Value::String(_))) {
                self.error(format!("builtInNavigation.{field} must be a string"));
            }
        }
        if logo_type == Some("image") && non_empty_str(nav.get("logoImage")).is_none() {
            self.error("builtInNavigation.logoImage is required when logoType is image");
        }

        for field in ["backgroundColor", "textColor"] {
            match nav.get(field) {
                None | Some(Value::Null) => {}
                Some(Value::String(color)) if is_css_color(color) => {}
                Some(Value::String(color)) => self.error(format!(
                    "builtInNavigation.{field} is not a valid CSS color: {color}"
                )),
                Some(_) => self.error(format!("builtInNavigation.{field} must be a string")),
            }
        }

        if !matches!(nav.get("showShadow"), None | Some(Value::Null | Value::Bool(_))) {
            self.error("builtInNavigation.showShadow must be a boolean");
        }
    }

    /// Check an optional enum field; returns its value if valid.
    fn one_of<'a>(
        &mut self,
        object: &'a Map<String, Value>,
        field: &str,
        allowed: &[&str],
    ) -> Option<&'a str> {
        match object.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::String(value)) if allowed.contains(&value.as_str()) => Some(value.as_str()),
            Some(_) => {
                self.error(format!(
                    "builtInNavigation.{field} must be one of: {}",
                    allowed.join(", ")
                ));
                None
            }
        }
    }

    fn pages(&mut self, pages: &[Value]) {
        let mut ids = HashSet::new();
        let mut routes = HashSet::new();

        for (i, page) in pages.iter().enumerate() {
            let path = format!("pages[{i}]");
            let Some(page) = page.as_object() else {
                self.error(format!("{path} must be an object"));
                continue;
            };

            match non_empty_str(page.get("id")) {
                Some(id) => {
                    if !ids.insert(id) {
                        self.error(format!("duplicate page id: {id}"));
                    }
                }
                None => self.error(format!("{path}.id is required")),
            }
            if non_empty_str(page.get("name")).is_none() {
                self.error(format!("{path}.name is required"));
            }
            match non_empty_str(page.get("route")) {
                Some(route) if !route.starts_with('/') => {
                    self.error(format!("{path}.route must start with '/': {route}"));
                }
                Some(route) => {
                    if !routes.insert(route) {
                        self.error(format!("duplicate page route: {route}"));
                    }
                }
                None => self.error(format!("{path}.route is required")),
            }
            if !matches!(page.get("isDeletable"), None | Some(Value::Null | Value::Bool(_))) {
                self.error(format!("{path}.isDeletable must be a boolean"));
            }

            match page.get("components") {
                None | Some(Value::Null) => {}
                Some(Value::Array(components)) => self.page_components(&path, components),
                Some(_) => self.error(format!("{path}.components must be an array")),
            }
        }
    }

    fn page_components(&mut self, page_path: &str, components: &[Value]) {
        let mut ids = HashSet::new();

        for (j, component) in components.iter().enumerate() {
            let path = format!("{page_path}.components[{j}]");
            let Some(component) = component.as_object() else {
                self.error(format!("{path} must be an object"));
                continue;
            };

            match non_empty_str(component.get("id")) {
                Some(id) => {
                    if !ids.insert(id) {
                        self.error(format!("{page_path}: duplicate component id: {id}"));
                    }
                }
                None => self.error(format!("{path}.id is required")),
            }
            if non_empty_str(component.get("type")).is_none() {
                self.error(format!("{path}.type is required"));
            }

            for field in ["x", "y"] {
                match component.get(field) {
                    None | Some(Value::Null) => {}
                    Some(value) => match value.as_f64() {
                        Some(n) if n >= 0.0 => {}
                        Some(_) => self.error(format!("{path}.{field} must not be negative")),
                        None => self.error(format!("{path}.{field} must be a number")),
                    },
                }
            }
            for field in ["width", "height"] {
                match component.get(field).and_then(Value::as_f64) {
                    Some(n) if n > 0.0 => {}
                    Some(_) => self.error(format!("{path}.{field} must be positive")),
                    None => self.error(format!("{path}.{field} is required")),
                }
            }
            match component.get("zIndex") {
                None | Some(Value::Null) => {}
                Some(value) if value.as_u64().is_some_and(|z| u32::try_from(z).is_ok()) => {}
                Some(_) => self.error(format!("{path}.zIndex must be a non-negative integer")),
            }
            if !matches!(component.get("parameters"), None | Some(Value::Null | Value::Object(_))) {
                self.error(format!("{path}.parameters must be an object"));
            }
        }
    }

    fn definitions(&mut self, definitions: &[Value]) {
        let mut ids = HashSet::new();

        for (i, definition) in definitions.iter().enumerate() {
            let path = format!("components[{i}]");
            let Some(definition) = definition.as_object() else {
                self.error(format!("{path} must be an object"));
                continue;
            };

            match non_empty_str(definition.get("id")) {
                Some(id) => {
                    if !ids.insert(id) {
                        self.error(format!("duplicate component definition id: {id}"));
                    }
                }
                None => self.error(format!("{path}.id is required")),
            }
            for field in ["name", "componentType", "componentId", "htmlTemplate"] {
                if !matches!(definition.get(field), None | Some(Value::Null | Value::String(_))) {
                    self.error(format!("{path}.{field} must be a string"));
                }
            }
            if non_empty_str(definition.get("componentType")).is_none()
                && non_empty_str(definition.get("componentId")).is_none()
            {
                self.error(format!("{path} requires componentType or componentId"));
            }

            for field in ["defaultWidth", "defaultHeight"] {
                match definition.get(field) {
                    None | Some(Value::Null) => {}
                    Some(value) => match value.as_f64() {
                        Some(n) if n > 0.0 => {}
                        _ => self.error(format!("{path}.{field} must be a positive number")),
                    },
                }
            }

            for field in DEFINITION_JSON_FIELDS {
                if let Err(e) = decode_json_object(definition.get(field)) {
                    self.error(format!("{path}.{field} is not valid JSON: {e}"));
                }
            }
        }
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn is_css_color(value: &str) -> bool {
    value.parse::<csscolorparser::Color>().is_ok()
}
