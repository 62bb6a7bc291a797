//! Component catalogue entries and their placements on pages.

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Parameters, null_as_default};

/// Reusable building block from the component catalogue.
///
/// Immutable once loaded and shared by every instance of its type. The
/// JSON-bearing fields (`parametersSchema`, `parameters`,
/// `defaultParameters`) may arrive either as JSON-encoded strings or as
/// already decoded objects.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    /// Catalogue identifier.
    #[serde(default)]
    pub id: String,
    /// Type alias instances refer to (e.g. `text-block`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_type: Option<String>,
    /// Legacy alias used by older catalogues when `componentType` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    /// Human readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Parameter schema (JSON text or object).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters_schema: Option<Value>,
    /// Default parameters (JSON text or object). Wins over `defaultParameters`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    /// Default parameters (JSON text or object).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_parameters: Option<Value>,
    /// Raw HTML template with `{{name}}` placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_template: Option<String>,
    /// Default width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_width: Option<f64>,
    /// Default height in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_height: Option<f64>,
}

impl ComponentDefinition {
    /// Type alias of this definition: `componentType`, else `componentId`.
    #[must_use]
    pub fn type_alias(&self) -> Option<&str> {
        self.component_type
            .as_deref()
            .or(self.component_id.as_deref())
            .filter(|alias| !alias.is_empty())
    }

    /// Decode the definition's default parameters.
    ///
    /// `parameters` takes precedence over `defaultParameters` when both are
    /// present. Missing defaults decode to an empty object.
    pub fn default_parameter_values(&self) -> Result<Parameters, serde_json::Error> {
        let source = self.parameters.as_ref().or(self.default_parameters.as_ref());
        Ok(decode_json_object(source)?.unwrap_or_default())
    }
}

/// Decode a JSON-bearing field into an object.
///
/// Strings are parsed as JSON text; an empty or whitespace-only string counts
/// as absent. Objects are used as they are. Any other JSON value, or text
/// that does not parse to an object, is an error.
pub fn decode_json_object(value: Option<&Value>) -> Result<Option<Parameters>, serde_json::Error> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text)? {
            Value::Object(map) => Ok(Some(map)),
            Value::Null => Ok(None),
            other => Err(serde_json::Error::custom(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        },
        Some(Value::Object(map)) => Ok(Some(map.clone())),
        Some(other) => Err(serde_json::Error::custom(format!(
            "expected a JSON object or JSON text, found {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Absolute placement of a component instance on the page canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Geometry {
    /// Left offset in pixels.
    #[serde(deserialize_with = "null_as_default")]
    pub x: f64,
    /// Top offset in pixels.
    #[serde(deserialize_with = "null_as_default")]
    pub y: f64,
    /// Width in pixels.
    #[serde(deserialize_with = "null_as_default")]
    pub width: f64,
    /// Height in pixels.
    #[serde(deserialize_with = "null_as_default")]
    pub height: f64,
    /// Stacking order; lower values render first.
    #[serde(deserialize_with = "null_as_default")]
    pub z_index: u32,
}

impl Geometry {
    /// Bottom edge of the component (`y + height`).
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// One placement of a [`ComponentDefinition`] on a page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInstance {
    /// Instance identifier, unique within its page.
    pub id: String,
    /// Definition lookup key.
    #[serde(rename = "type")]
    pub component_type: String,
    /// Position and size.
    #[serde(flatten)]
    pub geometry: Geometry,
    /// Per-instance overrides of the definition defaults. `null` counts as
    /// no overrides.
    #[serde(default, deserialize_with = "null_as_default")]
    pub parameters: Parameters,
}
