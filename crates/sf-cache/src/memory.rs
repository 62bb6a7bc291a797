//! In-memory cache implementation.
//!
//! [`MemoryCache`] keeps its three maps in [`IndexMap`]s so that entries
//! remember their insertion order, which is what [`RenderCache::optimize`]
//! evicts by.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use sf_model::ComponentInstance;

use crate::{CacheStats, ComponentKey, PageKey, RenderCache};

/// In-memory [`RenderCache`] owned by one website session.
///
/// All maps live behind a single mutex, so every individual read or write is
/// atomic with respect to the others.
pub struct MemoryCache {
    workspace_id: String,
    inner: Mutex<Maps>,
}

#[derive(Default)]
struct Maps {
    pages: IndexMap<PageKey, String>,
    components: IndexMap<ComponentKey, String>,
    component_lists: IndexMap<String, Vec<ComponentInstance>>,
    /// Component keys stored while rendering each page.
    page_components: HashMap<String, HashSet<ComponentKey>>,
    hits: u64,
    misses: u64,
}

impl Maps {
    fn record<T>(&mut self, found: Option<T>) -> Option<T> {
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    /// Drop ownership records for components no longer cached.
    fn prune_ownership(&mut self) {
        let Self {
            components,
            page_components,
            ..
        } = self;
        page_components.retain(|_, keys| {
            keys.retain(|key| components.contains_key(key));
            !keys.is_empty()
        });
    }
}

impl MemoryCache {
    /// Create an empty cache for a workspace.
    #[must_use]
    pub fn new(workspace_id: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            inner: Mutex::new(Maps::default()),
        }
    }

    fn maps(&self) -> MutexGuard<'_, Maps> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RenderCache for MemoryCache {
    fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    fn get_page(&self, key: &PageKey) -> Option<String> {
        let mut maps = self.maps();
        let found = maps.pages.get(key).cloned();
        maps.record(found)
    }

    fn set_page(&self, key: PageKey, html: String) {
        self.maps().pages.insert(key, html);
    }

    fn remove_page(&self, key: &PageKey) -> bool {
        self.maps().pages.shift_remove(key).is_some()
    }

    fn get_component(&self, key: &ComponentKey) -> Option<String> {
        let mut maps = self.maps();
        let found = maps.components.get(key).cloned();
        maps.record(found)
    }

    fn set_component(&self, page_id: Option<&str>, key: ComponentKey, html: String) {
        let mut maps = self.maps();
        if let Some(page_id) = page_id {
            maps.page_components
                .entry(page_id.to_owned())
                .or_default()
                .insert(key.clone());
        }
        maps.components.insert(key, html);
    }

    fn remove_component(&self, key: &ComponentKey) -> bool {
        let mut maps = self.maps();
        let removed = maps.components.shift_remove(key).is_some();
        if removed {
            maps.prune_ownership();
        }
        removed
    }

    fn get_component_list(&self, page_id: &str) -> Option<Vec<ComponentInstance>> {
        let mut maps = self.maps();
        let found = maps.component_lists.get(page_id).cloned();
        maps.record(found)
    }

    fn set_component_list(&self, page_id: &str, components: Vec<ComponentInstance>) {
        self.maps()
            .component_lists
            .insert(page_id.to_owned(), components);
    }

    fn remove_component_list(&self, page_id: &str) -> bool {
        self.maps().component_lists.shift_remove(page_id).is_some()
    }

    fn clear_page(&self, page_id: &str) {
        let mut maps = self.maps();
        maps.pages.retain(|key, _| key.page_id != page_id);
        maps.component_lists.shift_remove(page_id);

        let mut owned = maps.page_components.remove(page_id).unwrap_or_default();
        // Identical content rendered on another page shares the key
        for keys in maps.page_components.values() {
            owned.retain(|key| !keys.contains(key));
        }
        maps.components.retain(|key, _| !owned.contains(key));

        tracing::debug!(
            page_id,
            components = owned.len(),
            "Cleared page cache"
        );
    }

    fn clear_component_type(&self, component_type: &str) {
        let mut maps = self.maps();
        let before = maps.components.len();
        maps.components
            .retain(|key, _| key.component_type != component_type);
        let removed = before - maps.components.len();
        maps.pages.clear();
        maps.prune_ownership();

        tracing::debug!(
            component_type,
            removed,
            "Cleared component cache and all rendered pages"
        );
    }

    fn clear_website(&self, workspace_id: &str) {
        if workspace_id != self.workspace_id {
            return;
        }
        let mut maps = self.maps();
        maps.pages.clear();
        maps.components.clear();
        maps.component_lists.clear();
        maps.page_components.clear();
        tracing::debug!(workspace_id, "Cleared website cache");
    }

    fn clear_all(&self) {
        *self.maps() = Maps::default();
        tracing::debug!(workspace_id = %self.workspace_id, "Cleared all caches");
    }

    fn optimize(&self, max_items: usize) {
        let mut maps = self.maps();

        let page_excess = maps.pages.len().saturating_sub(max_items);
        maps.pages.drain(..page_excess);

        let component_limit = max_items.saturating_mul(2);
        let component_excess = maps.components.len().saturating_sub(component_limit);
        maps.components.drain(..component_excess);

        if page_excess > 0 || component_excess > 0 {
            maps.prune_ownership();
            tracing::debug!(
                pages = page_excess,
                components = component_excess,
                "Evicted oldest cache entries"
            );
        }
    }

    fn stats(&self) -> CacheStats {
        let maps = self.maps();
        CacheStats {
            hits: maps.hits,
            misses: maps.misses,
            pages: maps.pages.len(),
            components: maps.components.len(),
            component_lists: maps.component_lists.len(),
        }
    }
}
