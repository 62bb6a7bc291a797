//! Website orchestrator.
//!
//! [`Website`] owns the lifecycle of one website session: validation,
//! parsing, the render cache, page rendering, and the event and error logs.
//!
//! # Thread Safety
//!
//! `Website` is `Send + Sync` and meant to be shared behind an [`Arc`]:
//! - the current session is an `Arc<Session>` behind a `RwLock`, so readers
//!   only hold the lock long enough to clone it
//! - renders run without any website-level lock held
//! - [`render_all_pages`](Website::render_all_pages) renders pages on the
//!   rayon pool against one session snapshot

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use rayon::prelude::*;
use sf_cache::{CacheStats, MemoryCache, NullCache, RenderCache};
use sf_config::EngineConfig;
use sf_model::{ComponentDefinition, ComponentInstance, IncomingData, ParsedWebsiteData, ProcessedPage};
use tokio::sync::{broadcast, watch};

use crate::error::{ErrorKind, RenderingError, SiteError};
use crate::event::{EventKind, EventLog, RenderingEvent};
use crate::loader::parse_website_data;
use crate::page_renderer::{PageRenderOptions, PageRenderer, RenderWarning, RenderedPage};
use crate::validator::validate_incoming_data;

/// Observable lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WebsiteState {
    /// No website loaded.
    Uninitialized,
    /// `initialize_website` is running.
    Initializing,
    /// A website is loaded and idle.
    Ready,
    /// A website is loaded and at least one page render is in flight.
    Rendering,
}

/// Outcome of one page in [`Website::render_all_pages_settled`].
#[derive(Debug)]
pub struct PageOutcome {
    /// Page id.
    pub page_id: String,
    /// Rendered page or the error that stopped it.
    pub result: Result<RenderedPage, SiteError>,
}

/// Everything built by one successful initialization.
struct Session {
    data: Arc<ParsedWebsiteData>,
    cache: Arc<dyn RenderCache>,
    renderer: Arc<PageRenderer>,
}

enum Lifecycle {
    Uninitialized,
    Initializing,
    Ready(Arc<Session>),
}

/// Counts in-flight renders for [`WebsiteState::Rendering`].
struct RenderGuard<'a>(&'a AtomicUsize);

impl<'a> RenderGuard<'a> {
    fn new(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(counter)
    }
}

impl Drop for RenderGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Website rendering engine.
pub struct Website {
    config: EngineConfig,
    lifecycle: RwLock<Lifecycle>,
    active_renders: AtomicUsize,
    errors: Mutex<Vec<RenderingError>>,
    events: Mutex<EventLog>,
    event_tx: broadcast::Sender<RenderingEvent>,
    data_tx: watch::Sender<Option<Arc<ParsedWebsiteData>>>,
    page_tx: watch::Sender<Option<String>>,
}

impl Website {
    /// Create an uninitialized engine.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let buffer_size = config.events.buffer_size.max(1);
        let (event_tx, _) = broadcast::channel(buffer_size);
        let (data_tx, _) = watch::channel(None);
        let (page_tx, _) = watch::channel(None);
        Self {
            lifecycle: RwLock::new(Lifecycle::Uninitialized),
            active_renders: AtomicUsize::new(0),
            errors: Mutex::new(Vec::new()),
            events: Mutex::new(EventLog::new(buffer_size)),
            event_tx,
            data_tx,
            page_tx,
            config,
        }
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current lifecycle state.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn state(&self) -> WebsiteState {
        match *self.lifecycle.read().unwrap() {
            Lifecycle::Uninitialized => WebsiteState::Uninitialized,
            Lifecycle::Initializing => WebsiteState::Initializing,
            Lifecycle::Ready(_) if self.active_renders.load(Ordering::Acquire) > 0 => {
                WebsiteState::Rendering
            }
            Lifecycle::Ready(_) => WebsiteState::Ready,
        }
    }

    /// Load a website.
    ///
    /// Validates and parses `data`, builds a fresh cache and renderer, and
    /// marks the first page active. When `cache.warm_on_init` is set, every
    /// page is rendered once so later renders are cache hits. Any previously
    /// loaded website is replaced.
    ///
    /// On failure the engine returns to [`WebsiteState::Uninitialized`] and
    /// the error is appended to the error log.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] with every problem found,
    /// [`SiteError::AlreadyInitializing`] if another initialization is
    /// running, or a JSON decoding error from parsing.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn initialize_website(&self, data: &IncomingData) -> Result<Arc<ParsedWebsiteData>, SiteError> {
        {
            let mut lifecycle = self.lifecycle.write().unwrap();
            if matches!(*lifecycle, Lifecycle::Initializing) {
                return Err(SiteError::AlreadyInitializing);
            }
            *lifecycle = Lifecycle::Initializing;
        }
        tracing::info!(workspace_id = %data.workspace_id, name = %data.name, "Initializing website");
        self.emit(RenderingEvent::new(EventKind::InitializationStarted));

        match self.build_session(data) {
            Ok(session) => {
                let parsed = Arc::clone(&session.data);
                let current = parsed.active_page().map(|page| page.id.clone());
                *self.lifecycle.write().unwrap() = Lifecycle::Ready(session);
                self.data_tx.send_replace(Some(Arc::clone(&parsed)));
                self.page_tx.send_replace(current);
                tracing::info!(
                    workspace_id = %parsed.workspace_id,
                    pages = parsed.pages.len(),
                    definitions = parsed.definitions.len(),
                    "Website initialized"
                );
                self.emit(
                    RenderingEvent::new(EventKind::InitializationCompleted)
                        .with_message(format!("{} pages", parsed.pages.len())),
                );
                Ok(parsed)
            }
            Err(err) => {
                *self.lifecycle.write().unwrap() = Lifecycle::Uninitialized;
                self.data_tx.send_replace(None);
                self.page_tx.send_replace(None);
                tracing::warn!(workspace_id = %data.workspace_id, error = %err, "Website initialization failed");
                let kind = match &err {
                    SiteError::Validation(_) => ErrorKind::Validation,
                    _ => ErrorKind::Initialization,
                };
                self.record_error(RenderingError::new(kind, err.to_string()));
                self.emit(
                    RenderingEvent::new(EventKind::InitializationFailed).with_message(err.to_string()),
                );
                Err(err)
            }
        }
    }

    fn build_session(&self, data: &IncomingData) -> Result<Arc<Session>, SiteError> {
        let validation = validate_incoming_data(data);
        if !validation.is_valid {
            return Err(SiteError::Validation(validation.errors));
        }
        let parsed = parse_website_data(data)?;

        let cache: Arc<dyn RenderCache> = if self.config.cache.enabled {
            Arc::new(MemoryCache::new(&parsed.workspace_id))
        } else {
            Arc::new(NullCache::new(&parsed.workspace_id))
        };
        for page in &parsed.pages {
            cache.set_component_list(&page.id, page.components.clone());
        }
        let renderer = Arc::new(PageRenderer::new(Arc::clone(&cache), &self.config, &parsed.name));
        let session = Arc::new(Session {
            data: Arc::new(parsed),
            cache,
            renderer,
        });

        if self.config.cache.enabled && self.config.cache.warm_on_init {
            self.warm(&session);
        }
        Ok(session)
    }

    /// Render every page once with default options to fill the caches.
    fn warm(&self, session: &Session) {
        let options = PageRenderOptions::default();
        session.data.pages.par_iter().for_each(|page| {
            let rendered = self.render_processed(session, page, &options);
            tracing::debug!(page_id = %rendered.page_id, "Warmed page");
        });
    }

    fn session(&self) -> Option<Arc<Session>> {
        match &*self.lifecycle.read().unwrap() {
            Lifecycle::Ready(session) => Some(Arc::clone(session)),
            Lifecycle::Uninitialized | Lifecycle::Initializing => None,
        }
    }

    fn ready_session(&self) -> Result<Arc<Session>, SiteError> {
        self.session().ok_or(SiteError::NotInitialized)
    }

    /// Render a page to a complete HTML document.
    ///
    /// Component failures do not fail the page; they are replaced by an error
    /// fragment, reported in [`RenderedPage::warnings`] and logged.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotInitialized`] before initialization and
    /// [`SiteError::PageNotFound`] for an unknown id. Both are also appended
    /// to the error log.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn render_page(&self, page_id: &str, options: &PageRenderOptions) -> Result<RenderedPage, SiteError> {
        match self.ready_session() {
            Ok(session) => self.render_in(&session, page_id, options),
            Err(err) => {
                self.page_failed(page_id, &err);
                Err(err)
            }
        }
    }

    /// Render every page in parallel.
    ///
    /// All-or-nothing: if any page fails, the first failure in page order is
    /// returned and the other results are discarded. Pages rendered before
    /// the failure stay cached.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotInitialized`] before initialization, otherwise
    /// the first failing page's error.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn render_all_pages(&self, options: &PageRenderOptions) -> Result<Vec<RenderedPage>, SiteError> {
        let session = self.ready_session()?;
        let results: Vec<_> = session
            .data
            .pages
            .par_iter()
            .map(|page| self.render_in(&session, &page.id, options))
            .collect();
        results.into_iter().collect()
    }

    /// Render every page in parallel, reporting each outcome separately.
    ///
    /// Outcomes are in page order.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotInitialized`] before initialization.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn render_all_pages_settled(&self, options: &PageRenderOptions) -> Result<Vec<PageOutcome>, SiteError> {
        let session = self.ready_session()?;
        Ok(session
            .data
            .pages
            .par_iter()
            .map(|page| PageOutcome {
                page_id: page.id.clone(),
                result: self.render_in(&session, &page.id, options),
            })
            .collect())
    }

    fn render_in(
        &self,
        session: &Session,
        page_id: &str,
        options: &PageRenderOptions,
    ) -> Result<RenderedPage, SiteError> {
        let Some(page) = session.data.page(page_id) else {
            let err = SiteError::PageNotFound(page_id.to_owned());
            self.page_failed(page_id, &err);
            return Err(err);
        };
        let rendered = self.render_processed(session, page, options);
        self.emit(
            RenderingEvent::new(EventKind::PageRendered)
                .with_page(page_id)
                .with_message(if rendered.from_cache { "cache" } else { "rendered" }),
        );
        Ok(rendered)
    }

    /// Render a known page and log its component warnings.
    fn render_processed(&self, session: &Session, page: &ProcessedPage, options: &PageRenderOptions) -> RenderedPage {
        let _guard = RenderGuard::new(&self.active_renders);
        let rendered = session.renderer.render_page(
            page,
            &session.data.navigation,
            &session.data.pages,
            &session.data.definitions,
            options,
        );
        for warning in &rendered.warnings {
            if let RenderWarning::ComponentFailed { component_id, .. } = warning {
                self.record_error(
                    RenderingError::new(ErrorKind::Component, warning.to_string())
                        .with_page(&page.id)
                        .with_component(component_id),
                );
            }
        }
        rendered
    }

    fn page_failed(&self, page_id: &str, err: &SiteError) {
        tracing::warn!(page_id, error = %err, "Page render failed");
        self.record_error(RenderingError::new(ErrorKind::PageRender, err.to_string()).with_page(page_id));
        self.emit(
            RenderingEvent::new(EventKind::PageRenderFailed)
                .with_page(page_id)
                .with_message(err.to_string()),
        );
    }

    /// Make `page_id` the only active page.
    ///
    /// Returns `false` and changes nothing if no page has that id or no
    /// website is loaded.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn set_current_page(&self, page_id: &str) -> bool {
        let data = {
            let mut lifecycle = self.lifecycle.write().unwrap();
            let Lifecycle::Ready(session) = &*lifecycle else {
                return false;
            };
            let Some(next) = session.data.with_active_page(page_id) else {
                tracing::debug!(page_id, "Ignoring unknown page");
                return false;
            };
            let next = Arc::new(next);
            let updated = Arc::new(Session {
                data: Arc::clone(&next),
                cache: Arc::clone(&session.cache),
                renderer: Arc::clone(&session.renderer),
            });
            *lifecycle = Lifecycle::Ready(updated);
            next
        };
        self.data_tx.send_replace(Some(data));
        self.page_tx.send_replace(Some(page_id.to_owned()));
        self.emit(RenderingEvent::new(EventKind::PageChanged).with_page(page_id));
        true
    }

    /// Current data snapshot.
    #[must_use]
    pub fn data(&self) -> Option<Arc<ParsedWebsiteData>> {
        self.session().map(|session| Arc::clone(&session.data))
    }

    /// Page by id.
    #[must_use]
    pub fn page(&self, page_id: &str) -> Option<ProcessedPage> {
        self.session()?.data.page(page_id).cloned()
    }

    /// Page by route (e.g. `/shop`).
    #[must_use]
    pub fn page_by_route(&self, route: &str) -> Option<ProcessedPage> {
        self.session()?.data.page_by_route(route).cloned()
    }

    /// Component definition by type or catalogue id.
    #[must_use]
    pub fn definition(&self, component_type: &str) -> Option<Arc<ComponentDefinition>> {
        self.session()?.data.definition(component_type).cloned()
    }

    /// Components placed on a page, served from the component-list cache.
    #[must_use]
    pub fn components(&self, page_id: &str) -> Option<Vec<ComponentInstance>> {
        let session = self.session()?;
        if let Some(components) = session.cache.get_component_list(page_id) {
            return Some(components);
        }
        let components = session.data.page(page_id)?.components.clone();
        session.cache.set_component_list(page_id, components.clone());
        Some(components)
    }

    /// Pages listed in the navigation menu.
    #[must_use]
    pub fn navigation_pages(&self) -> Vec<ProcessedPage> {
        self.session().map_or_else(Vec::new, |session| {
            sf_renderer::navigation_pages(&session.data.pages)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    /// Breadcrumb trail HTML for a page.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotInitialized`] or [`SiteError::PageNotFound`].
    pub fn breadcrumbs(&self, page_id: &str) -> Result<String, SiteError> {
        let session = self.ready_session()?;
        let page = session
            .data
            .page(page_id)
            .ok_or_else(|| SiteError::PageNotFound(page_id.to_owned()))?;
        Ok(session
            .renderer
            .navigation()
            .render_breadcrumbs(page, &session.data.pages))
    }

    /// Id of the active page.
    #[must_use]
    pub fn current_page_id(&self) -> Option<String> {
        self.page_tx.borrow().clone()
    }

    /// The active page.
    #[must_use]
    pub fn current_page(&self) -> Option<ProcessedPage> {
        self.session()?.data.active_page().cloned()
    }

    /// Receiver for data snapshots; `None` while no website is loaded.
    #[must_use]
    pub fn watch_data(&self) -> watch::Receiver<Option<Arc<ParsedWebsiteData>>> {
        self.data_tx.subscribe()
    }

    /// Receiver for the active page id.
    #[must_use]
    pub fn watch_current_page(&self) -> watch::Receiver<Option<String>> {
        self.page_tx.subscribe()
    }

    /// Receiver for events emitted from now on.
    #[must_use]
    pub fn subscribe_events(&self) -> broadcast::Receiver<RenderingEvent> {
        self.event_tx.subscribe()
    }

    /// Most recent events, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal `Mutex` is poisoned.
    #[must_use]
    pub fn events(&self) -> Vec<RenderingEvent> {
        self.events.lock().unwrap().snapshot()
    }

    /// Every logged failure, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal `Mutex` is poisoned.
    #[must_use]
    pub fn errors(&self) -> Vec<RenderingError> {
        self.errors.lock().unwrap().clone()
    }

    /// Empty the error log.
    ///
    /// # Panics
    ///
    /// Panics if the internal `Mutex` is poisoned.
    pub fn clear_errors(&self) {
        self.errors.lock().unwrap().clear();
    }

    /// Drop everything rendered for one page.
    pub fn clear_page_cache(&self, page_id: &str) {
        self.clear_cache(&format!("page {page_id}"), |cache| cache.clear_page(page_id));
    }

    /// Drop every fragment of one component type and every page document.
    pub fn clear_component_cache(&self, component_type: &str) {
        self.clear_cache(&format!("component type {component_type}"), |cache| {
            cache.clear_component_type(component_type);
        });
    }

    /// Drop everything cached for a workspace.
    ///
    /// Does nothing unless `workspace_id` is the loaded website's workspace.
    pub fn clear_website_cache(&self, workspace_id: &str) {
        self.clear_cache(&format!("workspace {workspace_id}"), |cache| {
            cache.clear_website(workspace_id);
        });
    }

    /// Drop everything cached and reset statistics.
    pub fn clear_all_cache(&self) {
        self.clear_cache("all", |cache| cache.clear_all());
    }

    fn clear_cache(&self, scope: &str, clear: impl FnOnce(&dyn RenderCache)) {
        let Some(session) = self.session() else {
            return;
        };
        clear(session.cache.as_ref());
        tracing::info!(scope, "Cache cleared");
        self.emit(RenderingEvent::new(EventKind::CacheCleared).with_message(scope));
    }

    /// Evict the oldest entries beyond `max_items` pages and `2 * max_items`
    /// component fragments.
    pub fn optimize_cache(&self, max_items: usize) {
        if let Some(session) = self.session() {
            session.cache.optimize(max_items);
            tracing::debug!(max_items, "Cache optimized");
        }
    }

    /// [`optimize_cache`](Self::optimize_cache) with the configured page limit.
    pub fn optimize_cache_default(&self) {
        self.optimize_cache(self.config.cache.max_pages);
    }

    /// Cache statistics; all zero while no website is loaded.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.session()
            .map_or_else(CacheStats::default, |session| session.cache.stats())
    }

    /// Unload the website and clear its cache.
    ///
    /// Events and logged errors are kept.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    pub fn reset(&self) {
        let previous = std::mem::replace(&mut *self.lifecycle.write().unwrap(), Lifecycle::Uninitialized);
        if let Lifecycle::Ready(session) = previous {
            session.cache.clear_all();
        }
        self.data_tx.send_replace(None);
        self.page_tx.send_replace(None);
        tracing::info!("Website reset");
        self.emit(RenderingEvent::new(EventKind::WebsiteReset));
    }

    fn record_error(&self, error: RenderingError) {
        self.errors.lock().unwrap().push(error);
    }

    fn emit(&self, event: RenderingEvent) {
        self.events.lock().unwrap().push(event.clone());
        // No receivers is fine.
        let _ = self.event_tx.send(event);
    }
}

impl Default for Website {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data() -> IncomingData {
        IncomingData {
            workspace_id: "ws-1".to_owned(),
            name: "Corner Shop".to_owned(),
            website_json: json!({"pages": [
                {"id": "home", "name": "Home", "route": "/", "isDeletable": false, "components": [
                    {"id": "t1", "type": "text-block", "width": 200, "height": 80,
                     "parameters": {"title": "Welcome"}}
                ]},
                {"id": "shop", "name": "Shop", "route": "/shop"}
            ]})
            .to_string(),
            components: json!([{"id": "def-text", "componentType": "text-block"}]),
        }
    }

    #[test]
    fn test_lifecycle_states() {
        let website = Website::default();
        assert_eq!(website.state(), WebsiteState::Uninitialized);

        website.initialize_website(&data()).unwrap();
        assert_eq!(website.state(), WebsiteState::Ready);

        website.reset();
        assert_eq!(website.state(), WebsiteState::Uninitialized);
        assert!(website.data().is_none());
    }

    #[test]
    fn test_render_guard_marks_rendering() {
        let website = Website::default();
        website.initialize_website(&data()).unwrap();

        let guard = RenderGuard::new(&website.active_renders);
        assert_eq!(website.state(), WebsiteState::Rendering);
        drop(guard);
        assert_eq!(website.state(), WebsiteState::Ready);
    }

    #[test]
    fn test_warm_fills_page_cache() {
        let website = Website::default();
        website.initialize_website(&data()).unwrap();

        assert_eq!(website.cache_stats().pages, 2);
        let page = website.render_page("home", &PageRenderOptions::default()).unwrap();
        assert!(page.from_cache);
    }

    #[test]
    fn test_disabled_cache_never_hits() {
        let mut config = EngineConfig::default();
        config.cache.enabled = false;
        let website = Website::new(config);
        website.initialize_website(&data()).unwrap();

        let options = PageRenderOptions::default();
        website.render_page("home", &options).unwrap();
        let second = website.render_page("home", &options).unwrap();

        assert!(!second.from_cache);
        assert_eq!(website.cache_stats(), CacheStats::default());
    }

    #[test]
    fn test_render_before_initialize() {
        let website = Website::default();
        let err = website.render_page("home", &PageRenderOptions::default()).unwrap_err();

        assert!(matches!(err, SiteError::NotInitialized));
        assert_eq!(website.errors()[0].kind, ErrorKind::PageRender);
    }

    #[test]
    fn test_components_falls_back_after_clear() {
        let website = Website::default();
        website.initialize_website(&data()).unwrap();

        website.clear_page_cache("home");
        assert_eq!(website.cache_stats().component_lists, 1);

        let components = website.components("home").unwrap();
        assert_eq!(components[0].id, "t1");
        assert_eq!(website.cache_stats().component_lists, 2);
        assert!(website.components("missing").is_none());
    }

    #[test]
    fn test_event_buffer_is_bounded() {
        let mut config = EngineConfig::default();
        config.events.buffer_size = 3;
        let website = Website::new(config);
        website.initialize_website(&data()).unwrap();

        for _ in 0..5 {
            website.set_current_page("shop");
        }

        let events = website.events();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|event| event.kind == EventKind::PageChanged));
    }
}
