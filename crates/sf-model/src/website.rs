//! Fully processed website aggregate.

use std::collections::HashMap;
use std::sync::Arc;

use crate::component::ComponentDefinition;
use crate::navigation::NavigationConfig;
use crate::page::ProcessedPage;

/// Component type (or catalogue id) to definition.
///
/// A definition is indexed under both its `id` and its type alias, so two
/// keys may share one [`Arc`].
pub type DefinitionIndex = HashMap<String, Arc<ComponentDefinition>>;

/// Website after validation, parsing and parameter merging.
#[derive(Clone, Debug)]
pub struct ParsedWebsiteData {
    /// Workspace the website belongs to.
    pub workspace_id: String,
    /// Website name.
    pub name: String,
    /// Top navigation settings.
    pub navigation: NavigationConfig,
    /// Pages in display order.
    pub pages: Vec<ProcessedPage>,
    /// Component catalogue index.
    pub definitions: DefinitionIndex,
}

impl ParsedWebsiteData {
    /// Get page by id.
    #[must_use]
    pub fn page(&self, id: &str) -> Option<&ProcessedPage> {
        self.pages.iter().find(|page| page.id == id)
    }

    /// Get page by route (e.g. `/shop`).
    #[must_use]
    pub fn page_by_route(&self, route: &str) -> Option<&ProcessedPage> {
        self.pages.iter().find(|page| page.route == route)
    }

    /// Get the active page, if any.
    #[must_use]
    pub fn active_page(&self) -> Option<&ProcessedPage> {
        self.pages.iter().find(|page| page.is_active)
    }

    /// Look up a definition by component type or catalogue id.
    #[must_use]
    pub fn definition(&self, component_type: &str) -> Option<&Arc<ComponentDefinition>> {
        self.definitions.get(component_type)
    }

    /// Return a copy with exactly one page (`page_id`) marked active.
    ///
    /// Returns `None` if no page has that id.
    #[must_use]
    pub fn with_active_page(&self, page_id: &str) -> Option<Self> {
        self.page(page_id)?;
        let mut next = self.clone();
        for page in &mut next.pages {
            page.is_active = page.id == page_id;
        }
        Some(next)
    }
}
