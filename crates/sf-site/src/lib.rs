//! Website loading and page rendering for the storefront engine.
//!
//! This crate provides:
//! - [`validate_incoming_data`]: Checks untrusted website data and reports every problem
//! - [`PageRenderer`]: Assembles components and navigation into standalone HTML documents
//! - [`Website`]: The orchestrator owning the lifecycle, the cache and the event/error logs
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use sf_model::IncomingData;
//! use sf_site::{PageRenderOptions, Website};
//!
//! let website = Website::default();
//! website.initialize_website(&IncomingData {
//!     workspace_id: "ws-1".to_owned(),
//!     name: "Corner Shop".to_owned(),
//!     website_json: r#"{"pages": [{"id": "home", "name": "Home", "route": "/"}]}"#.to_owned(),
//!     components: serde_json::json!([]),
//! })?;
//!
//! let page = website.render_page("home", &PageRenderOptions::default())?;
//! println!("{}", page.html);
//! # Ok(())
//! # }
//! ```

mod document;
mod error;
mod event;
mod loader;
mod page_renderer;
mod validator;
mod website;

pub use error::{ErrorKind, RenderingError, SiteError};
pub use event::{EventKind, RenderingEvent};
pub use page_renderer::{PageRenderOptions, PageRenderer, RenderWarning, RenderedPage};
pub use validator::{ValidationResult, validate_incoming_data};
pub use website::{PageOutcome, Website, WebsiteState};

// Re-export for callers reading cache statistics without depending on sf-cache
pub use sf_cache::CacheStats;
