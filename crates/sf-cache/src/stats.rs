//! Cache statistics.

use serde::Serialize;

/// Snapshot of cache statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Read attempts that found an entry.
    pub hits: u64,
    /// Read attempts that found nothing.
    pub misses: u64,
    /// Rendered page documents held.
    pub pages: usize,
    /// Rendered component fragments held.
    pub components: usize,
    /// Per-page component lists held.
    pub component_lists: usize,
}

impl CacheStats {
    /// Total read attempts.
    #[must_use]
    pub fn reads(&self) -> u64 {
        self.hits + self.misses
    }

    /// Hit rate as a percentage (0.0 when nothing was read yet).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        match self.reads() {
            0 => 0.0,
            reads => self.hits as f64 * 100.0 / reads as f64,
        }
    }
}
