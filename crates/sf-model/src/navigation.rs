//! Top navigation settings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How the navigation logo is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoType {
    /// Escaped text span (requires `logoText`).
    #[default]
    Text,
    /// Image (requires `logoImage`).
    Image,
}

/// Logo image clipping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoShape {
    Square,
    #[default]
    Rounded,
    Circle,
}

impl LogoShape {
    /// CSS `border-radius` for this shape.
    #[must_use]
    pub fn border_radius(self) -> &'static str {
        match self {
            Self::Square => "0",
            Self::Rounded => "8px",
            Self::Circle => "50%",
        }
    }

    /// Wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Rounded => "rounded",
            Self::Circle => "circle",
        }
    }
}

/// Logo size preset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl LogoSize {
    /// Logo image height in pixels.
    #[must_use]
    pub fn pixels(self) -> u32 {
        match self {
            Self::Small => 32,
            Self::Medium => 40,
            Self::Large => 56,
        }
    }

    /// Wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

/// Built-in top navigation configuration.
///
/// Every field has a default, so a partially specified (or absent)
/// `builtInNavigation` object still yields a complete configuration.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigationConfig {
    /// Logo mode.
    pub logo_type: LogoType,
    /// Logo text (text mode).
    pub logo_text: Option<String>,
    /// Logo image URL (image mode).
    pub logo_image: Option<String>,
    /// Logo image clipping.
    pub logo_shape: LogoShape,
    /// Logo size preset.
    pub logo_size: LogoSize,
    /// Bar background color (CSS color).
    pub background_color: String,
    /// Link and logo text color (CSS color).
    pub text_color: String,
    /// Draw a drop shadow under the bar.
    pub show_shadow: bool,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            logo_type: LogoType::Text,
            logo_text: None,
            logo_image: None,
            logo_shape: LogoShape::default(),
            logo_size: LogoSize::default(),
            background_color: "#ffffff".to_owned(),
            text_color: "#1f2937".to_owned(),
            show_shadow: true,
        }
    }
}

impl NavigationConfig {
    /// Decode a `builtInNavigation` value.
    ///
    /// `null`, and any field set to `null`, take the defaults.
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(mut fields) => {
                fields.retain(|_, field| !field.is_null());
                serde_json::from_value(Value::Object(fields))
            }
            other => serde_json::from_value(other),
        }
    }
}
