//! Transient local previews for files that are not yet uploaded.
//!
//! A preview is a displayable location (`blob:vitrine/<uuid>`) backed by the
//! local file payload. Every preview allocated from a [`PreviewPool`] must be
//! released exactly once; releasing an already-released preview is a no-op.

use crate::SourceFile;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

/// Scheme prefix of local preview locations.
pub const PREVIEW_SCHEME: &str = "blob:vitrine/";

/// Handle to one allocated local preview.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalPreview {
    location: String,
}

impl LocalPreview {
    /// Displayable location of this preview.
    pub fn location(&self) -> &str {
        &self.location
    }
}

/// Owner of all live local previews for one draft session.
///
/// # Examples
///
/// ```
/// use vitrine_core::{PreviewPool, SourceFile};
///
/// let pool = PreviewPool::default();
/// let preview = pool.allocate(&SourceFile::new("a.png", vec![1u8]));
/// assert_eq!(pool.live_count(), 1);
///
/// assert!(pool.release(&preview));
/// assert!(!pool.release(&preview)); // second release is a no-op
/// assert_eq!(pool.live_count(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PreviewPool {
    live: Arc<Mutex<HashMap<String, SourceFile>>>,
}

impl PreviewPool {
    /// Allocate a preview location for a local file.
    pub fn allocate(&self, source: &SourceFile) -> LocalPreview {
        let location = format!("{}{}", PREVIEW_SCHEME, Uuid::new_v4());
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(location.clone(), source.clone());
        LocalPreview { location }
    }

    /// Release a preview. Returns `true` if it was live.
    pub fn release(&self, preview: &LocalPreview) -> bool {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&preview.location)
            .is_some()
    }

    /// Resolve a live preview location to its file.
    pub fn resolve(&self, location: &str) -> Option<SourceFile> {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(location)
            .cloned()
    }

    /// Number of previews allocated and not yet released.
    pub fn live_count(&self) -> usize {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locations_are_unique() {
        let pool = PreviewPool::default();
        let file = SourceFile::new("a.png", vec![1u8]);
        let first = pool.allocate(&file);
        let second = pool.allocate(&file);
        assert_ne!(first.location(), second.location());
        assert!(first.location().starts_with(PREVIEW_SCHEME));
        assert_eq!(pool.live_count(), 2);
    }

    #[test]
    fn test_resolve_only_while_live() {
        let pool = PreviewPool::default();
        let preview = pool.allocate(&SourceFile::new("a.png", vec![7u8, 8]));
        let resolved = pool.resolve(preview.location()).unwrap();
        assert_eq!(resolved.bytes(), &[7u8, 8]);

        pool.release(&preview);
        assert!(pool.resolve(preview.location()).is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let pool = PreviewPool::default();
        let view = pool.clone();
        let preview = pool.allocate(&SourceFile::new("a.png", vec![1u8]));
        assert_eq!(view.live_count(), 1);
        assert!(view.release(&preview));
        assert_eq!(pool.live_count(), 0);
    }
}
