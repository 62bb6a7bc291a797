//! Error types for component rendering.

/// Error while producing one component fragment.
///
/// Never escapes [`ComponentRenderer::render`](crate::ComponentRenderer::render):
/// it is turned into a visible error fragment there.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ComponentError {
    /// The definition's default parameters are not a JSON object.
    #[error("invalid default parameters for definition {definition}")]
    DefaultParameters {
        /// Definition id.
        definition: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A parameter has a value of the wrong shape.
    #[error("parameter `{name}` must be {expected}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Human readable description of the accepted shape.
        expected: &'static str,
    },

    /// A template component has no HTML template to fill.
    #[error("component definition {0} has no HTML template")]
    MissingTemplate(String),
}

impl ComponentError {
    pub(crate) fn invalid(name: &str, expected: &'static str) -> Self {
        Self::InvalidParameter {
            name: name.to_owned(),
            expected,
        }
    }
}
