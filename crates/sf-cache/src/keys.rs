//! Structured cache keys.
//!
//! Keys carry their identifying parts as fields instead of a joined string,
//! so invalidation compares fields exactly rather than matching prefixes.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Number of hex characters kept from the SHA-256 digest.
const DIGEST_LEN: usize = 16;

/// Compute a content digest for cache keys.
///
/// The digest is the hex-encoded SHA-256 of the value's JSON serialization,
/// truncated to 16 characters. JSON objects serialize with sorted keys, so
/// equal parameter sets always produce the same digest.
#[must_use]
pub fn content_digest<T: Serialize + ?Sized>(value: &T) -> String {
    let bytes = serde_json::to_vec(value).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(DIGEST_LEN);
    digest
}

/// Key of a rendered component fragment.
///
/// Content-addressed: two renders of the same component with identical
/// effective parameters and options map to the same key, wherever they were
/// rendered from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ComponentKey {
    /// Component type (definition lookup key).
    pub component_type: String,
    /// Component instance id.
    pub component_id: String,
    /// Digest of effective parameters and render options.
    pub digest: String,
}

impl ComponentKey {
    /// Create a component key.
    #[must_use]
    pub fn new(
        component_type: impl Into<String>,
        component_id: impl Into<String>,
        digest: impl Into<String>,
    ) -> Self {
        Self {
            component_type: component_type.into(),
            component_id: component_id.into(),
            digest: digest.into(),
        }
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}",
            self.component_type, self.component_id, self.digest
        )
    }
}

/// Key of a rendered page document.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PageKey {
    /// Page id.
    pub page_id: String,
    /// Digest of render options and component parameters.
    pub digest: String,
}

impl PageKey {
    /// Create a page key.
    #[must_use]
    pub fn new(page_id: impl Into<String>, digest: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            digest: digest.into(),
        }
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.page_id, self.digest)
    }
}
