//! Rendering cache for the storefront renderer.
//!
//! This crate provides the [`RenderCache`] trait that decouples the renderers
//! from the storage holding their output. A cache keeps three independent
//! maps:
//!
//! - rendered page documents, keyed by [`PageKey`]
//! - rendered component fragments, keyed by [`ComponentKey`]
//! - per-page component lists, keyed by page id
//!
//! plus running hit/miss statistics ([`CacheStats`]).
//!
//! # Implementations
//!
//! - [`NullCache`]: No-op implementation (always misses)
//! - [`MemoryCache`]: In-memory maps with insertion-order eviction
//!
//! # Example
//!
//! ```
//! use sf_cache::{ComponentKey, MemoryCache, RenderCache};
//!
//! let cache = MemoryCache::new("ws-1");
//! let key = ComponentKey::new("text-block", "c1", "abc123");
//! assert_eq!(cache.get_component(&key), None);
//!
//! cache.set_component(Some("home"), key.clone(), "<p>hi</p>".to_owned());
//! assert_eq!(cache.get_component(&key).as_deref(), Some("<p>hi</p>"));
//! assert_eq!(cache.stats().hits, 1);
//! ```

mod keys;
mod memory;
mod stats;

pub use keys::{ComponentKey, PageKey, content_digest};
pub use memory::MemoryCache;
pub use stats::CacheStats;

use sf_model::ComponentInstance;

/// Storage for rendered output.
///
/// Reads count towards [`CacheStats`]; writes and removals do not. All
/// methods take `&self` so one cache can be shared between concurrent
/// page renders.
pub trait RenderCache: Send + Sync {
    /// Workspace this cache was created for.
    fn workspace_id(&self) -> &str;

    /// Retrieve a rendered page document.
    fn get_page(&self, key: &PageKey) -> Option<String>;

    /// Store a rendered page document.
    fn set_page(&self, key: PageKey, html: String);

    /// Remove a rendered page document. Returns `true` if it existed.
    fn remove_page(&self, key: &PageKey) -> bool;

    /// Retrieve a rendered component fragment.
    fn get_component(&self, key: &ComponentKey) -> Option<String>;

    /// Store a rendered component fragment.
    ///
    /// # Arguments
    ///
    /// * `page_id` - Page being rendered when the fragment was produced, if
    ///   any. Used only to scope [`clear_page`](Self::clear_page); it is not
    ///   part of the key.
    /// * `key` - Content-addressed component key
    /// * `html` - Rendered fragment
    fn set_component(&self, page_id: Option<&str>, key: ComponentKey, html: String);

    /// Remove a rendered component fragment. Returns `true` if it existed.
    fn remove_component(&self, key: &ComponentKey) -> bool;

    /// Retrieve the component list stored for a page.
    fn get_component_list(&self, page_id: &str) -> Option<Vec<ComponentInstance>>;

    /// Store the component list for a page.
    fn set_component_list(&self, page_id: &str, components: Vec<ComponentInstance>);

    /// Remove the component list for a page. Returns `true` if it existed.
    fn remove_component_list(&self, page_id: &str) -> bool;

    /// Drop everything rendered for one page.
    ///
    /// Removes the page's documents, its component list, and every component
    /// fragment stored while rendering that page. Fragments another page also
    /// stored are kept.
    fn clear_page(&self, page_id: &str);

    /// Drop every fragment of one component type.
    ///
    /// Also drops **all** page documents, since any page may embed that type.
    fn clear_component_type(&self, component_type: &str);

    /// Drop everything if `workspace_id` is the cache's workspace.
    fn clear_website(&self, workspace_id: &str);

    /// Drop everything and reset statistics.
    fn clear_all(&self);

    /// Evict the oldest-inserted entries.
    ///
    /// Pages are trimmed to `max_items`, component fragments to
    /// `2 * max_items`. This is insertion-order eviction, not LRU: reading
    /// an entry does not make it younger, and overwriting an existing key
    /// keeps its original position.
    fn optimize(&self, max_items: usize);

    /// Current statistics snapshot.
    fn stats(&self) -> CacheStats;
}

/// No-op [`RenderCache`] that never stores or retrieves data.
///
/// Use when caching is disabled. Every lookup returns `None`, every write is
/// discarded, and statistics stay at zero.
pub struct NullCache {
    workspace_id: String,
}

impl NullCache {
    /// Create a null cache for a workspace.
    #[must_use]
    pub fn new(workspace_id: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
        }
    }
}

impl RenderCache for NullCache {
    fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    fn get_page(&self, _key: &PageKey) -> Option<String> {
        None
    }

    fn set_page(&self, _key: PageKey, _html: String) {}

    fn remove_page(&self, _key: &PageKey) -> bool {
        false
    }

    fn get_component(&self, _key: &ComponentKey) -> Option<String> {
        None
    }

    fn set_component(&self, _page_id: Option<&str>, _key: ComponentKey, _html: String) {}

    fn remove_component(&self, _key: &ComponentKey) -> bool {
        false
    }

    fn get_component_list(&self, _page_id: &str) -> Option<Vec<ComponentInstance>> {
        None
    }

    fn set_component_list(&self, _page_id: &str, _components: Vec<ComponentInstance>) {}

    fn remove_component_list(&self, _page_id: &str) -> bool {
        false
    }

    fn clear_page(&self, _page_id: &str) {}

    fn clear_component_type(&self, _component_type: &str) {}

    fn clear_website(&self, _workspace_id: &str) {}

    fn clear_all(&self) {}

    fn optimize(&self, _max_items: usize) {}

    fn stats(&self) -> CacheStats {
        CacheStats::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_cache_always_misses() {
        let cache = NullCache::new("ws-1");
        let key = ComponentKey::new("image", "c1", "d1");

        assert_eq!(cache.get_component(&key), None);

        cache.set_component(Some("home"), key.clone(), "<img>".to_owned());
        assert_eq!(cache.get_component(&key), None);
        assert!(!cache.remove_component(&key));
    }

    #[test]
    fn test_null_cache_stats_stay_empty() {
        let cache = NullCache::new("ws-1");
        let key = PageKey::new("home", "d1");

        cache.set_page(key.clone(), "<html></html>".to_owned());
        assert_eq!(cache.get_page(&key), None);
        assert_eq!(cache.stats(), CacheStats::default());
        assert_eq!(cache.workspace_id(), "ws-1");
    }
}
