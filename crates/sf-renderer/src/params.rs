//! Effective parameter resolution and typed access.

use serde_json::Value;
use sf_model::{ComponentDefinition, Parameters};

use crate::ComponentError;

/// Merge definition defaults with instance overrides.
///
/// Shallow merge: every top-level key present on the instance replaces the
/// default wholesale, nested objects are not merged.
///
/// # Errors
///
/// Returns [`ComponentError::DefaultParameters`] if the definition's defaults
/// are not a JSON object (or JSON text encoding one).
pub fn merge_parameters(
    definition: Option<&ComponentDefinition>,
    overrides: &Parameters,
) -> Result<Parameters, ComponentError> {
    let mut merged = match definition {
        Some(definition) => definition.default_parameter_values().map_err(|source| {
            ComponentError::DefaultParameters {
                definition: definition.id.clone(),
                source,
            }
        })?,
        None => Parameters::new(),
    };
    for (name, value) in overrides {
        merged.insert(name.clone(), value.clone());
    }
    Ok(merged)
}

/// Read-only view over effective parameters with lenient typed getters.
///
/// `null` is treated the same as a missing key everywhere. Text getters treat
/// the empty string as missing too, so `text_or` falls back to its default.
#[derive(Clone, Copy)]
pub struct Params<'a> {
    values: &'a Parameters,
}

impl<'a> Params<'a> {
    #[must_use]
    pub fn new(values: &'a Parameters) -> Self {
        Self { values }
    }

    /// Raw value, `None` for missing or `null`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.values.get(name).filter(|value| !value.is_null())
    }

    /// Text value. Numbers and booleans are converted to their JSON text.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<String> {
        match self.get(name)? {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Array(_) | Value::Object(_) | Value::Null => None,
        }
    }

    /// Text value or a default.
    #[must_use]
    pub fn text_or(&self, name: &str, default: &str) -> String {
        self.text(name).unwrap_or_else(|| default.to_owned())
    }

    /// First non-empty text among several alternative names.
    #[must_use]
    pub fn first_text(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|name| self.text(name))
    }

    /// Boolean flag. Accepts `true`/`false` and their string forms.
    #[must_use]
    pub fn flag(&self, name: &str, default: bool) -> bool {
        match self.get(name) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => true,
            Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => false,
            _ => default,
        }
    }

    /// Numeric value. Accepts numbers and numeric strings.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::InvalidParameter`] for any other value.
    pub fn number(&self, name: &str) -> Result<Option<f64>, ComponentError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ComponentError::invalid(name, "a number")),
            Some(_) => Err(ComponentError::invalid(name, "a number")),
        }
    }

    /// CSS length: bare numbers get a `px` suffix, strings pass as written.
    #[must_use]
    pub fn length(&self, name: &str, default: &str) -> String {
        match self.get(name) {
            Some(Value::Number(n)) => format!("{n}px"),
            Some(Value::String(s)) if !s.trim().is_empty() => {
                if s.trim().parse::<f64>().is_ok() {
                    format!("{}px", s.trim())
                } else {
                    s.trim().to_owned()
                }
            }
            _ => default.to_owned(),
        }
    }

    /// Array value. Missing or `null` is an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::InvalidParameter`] if the value is not an
    /// array.
    pub fn list(&self, name: &str) -> Result<&'a [Value], ComponentError> {
        match self.get(name) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(ComponentError::invalid(name, "an array")),
        }
    }
}

/// Text field of a JSON object, ignoring empty strings.
pub(crate) fn object_text<'v>(value: &'v Value, names: &[&str]) -> Option<&'v str> {
    names
        .iter()
        .find_map(|name| value.get(name).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
}
