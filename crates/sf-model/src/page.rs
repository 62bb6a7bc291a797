//! Processed pages.

use serde::{Deserialize, Serialize};

use crate::component::ComponentInstance;

/// Identifier of the page that is always listed in the navigation menu.
pub const HOME_PAGE_ID: &str = "home";

/// Page ready for rendering.
///
/// Component parameters are already merged against their definitions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedPage {
    /// Page identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Route, starting with `/`.
    pub route: String,
    /// Whether the page may be deleted by the site owner.
    pub is_deletable: bool,
    /// Whether this is the current page. At most one page is active.
    pub is_active: bool,
    /// Placed components in document order.
    pub components: Vec<ComponentInstance>,
}

impl ProcessedPage {
    /// Whether this is the home page.
    #[must_use]
    pub fn is_home(&self) -> bool {
        self.id == HOME_PAGE_ID
    }

    /// Canvas height needed to show every component (largest bottom edge).
    #[must_use]
    pub fn canvas_height(&self) -> f64 {
        self.components
            .iter()
            .map(|c| c.geometry.bottom())
            .fold(0.0, f64::max)
    }
}
