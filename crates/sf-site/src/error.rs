//! Error types and the rendering error log record.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

/// Error returned by [`Website`](crate::Website) operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SiteError {
    /// Incoming data failed validation. Holds every problem found.
    #[error("invalid website data: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// `websiteJson` could not be decoded into pages and navigation.
    #[error("invalid website JSON: {0}")]
    WebsiteJson(#[source] serde_json::Error),

    /// `components` could not be decoded into component definitions.
    #[error("invalid component catalogue: {0}")]
    ComponentCatalogue(#[source] serde_json::Error),

    /// A definition's default parameters are not valid JSON.
    #[error("invalid parameters for component {component}: {source}")]
    ParameterJson {
        /// Definition id.
        component: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// No page with this id.
    #[error("page not found: {0}")]
    PageNotFound(String),

    /// No website has been initialized yet.
    #[error("website is not initialized")]
    NotInitialized,

    /// Another initialization is running.
    #[error("website initialization already in progress")]
    AlreadyInitializing,
}

/// Category of a logged failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Validation,
    Initialization,
    Component,
    PageRender,
}

/// Entry of the rendering error log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderingError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
}

impl RenderingError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            page_id: None,
            component_id: None,
            timestamp_ms: now_ms(),
        }
    }

    #[must_use]
    pub fn with_page(mut self, page_id: impl Into<String>) -> Self {
        self.page_id = Some(page_id.into());
        self
    }

    #[must_use]
    pub fn with_component(mut self, component_id: impl Into<String>) -> Self {
        self.component_id = Some(component_id.into());
        self
    }
}

/// Current time in milliseconds since the Unix epoch.
pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_all_errors() {
        let err = SiteError::Validation(vec!["workspaceId is required".to_owned(), "name is required".to_owned()]);
        assert_eq!(
            err.to_string(),
            "invalid website data: workspaceId is required; name is required"
        );
    }

    #[test]
    fn test_rendering_error_serializes_camel_case() {
        let record = RenderingError {
            kind: ErrorKind::PageRender,
            message: "page not found: x".to_owned(),
            page_id: Some("x".to_owned()),
            component_id: None,
            timestamp_ms: 1,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "page-render");
        assert_eq!(json["pageId"], "x");
        assert_eq!(json["timestampMs"], 1);
        assert!(json.get("componentId").is_none());
    }
}
