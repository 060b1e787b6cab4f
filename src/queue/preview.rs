//! Preview resources owned by queued images.
//!
//! A [`PreviewHandle`] is the only way to hold a preview. It is not `Clone`
//! and releases its resource from `Drop`, so a preview is released exactly
//! once and only when the owning record goes away.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::utils::mime_for;

/// Backing store for preview resources.
pub trait PreviewStore: Send + Sync {
    /// Registers the raw bytes of `source_path` and returns a renderable reference.
    fn acquire(&self, source_path: &str, bytes: Vec<u8>) -> String;

    /// Frees the resource behind `reference`.
    fn release(&self, reference: &str);
}

/// Exclusive ownership token for one preview.
pub struct PreviewHandle {
    reference: String,
    store: Arc<dyn PreviewStore>,
}

impl PreviewHandle {
    pub fn acquire(store: Arc<dyn PreviewStore>, source_path: &str, bytes: Vec<u8>) -> Self {
        let reference = store.acquire(source_path, bytes);
        Self { reference, store }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.store.release(&self.reference);
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle")
            .field("reference", &self.reference)
            .finish()
    }
}

/// Prefix of every reference handed out by [`MemoryPreviewStore`].
pub const PREVIEW_ORIGIN: &str = "preview://localhost/";

/// Registry key of a preview reference or of a request path such as `/3`.
///
/// Webviews that rewrite custom schemes (`http://preview.localhost/3`) keep
/// the key in the path, so both forms resolve.
pub fn preview_key(reference_or_path: &str) -> &str {
    reference_or_path
        .strip_prefix(PREVIEW_ORIGIN)
        .unwrap_or(reference_or_path)
        .trim_matches('/')
}

struct StoredPreview {
    mime: &'static str,
    bytes: Vec<u8>,
}

/// In-memory preview registry.
///
/// References have the form `preview://localhost/<n>` and are keyed by `<n>`,
/// so a custom URI scheme handler can resolve them from the request path.
#[derive(Default)]
pub struct MemoryPreviewStore {
    next: AtomicU64,
    entries: Mutex<HashMap<String, StoredPreview>>,
}

impl MemoryPreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the MIME type and bytes behind a live reference or request path.
    pub fn resolve(&self, reference: &str) -> Option<(&'static str, Vec<u8>)> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(preview_key(reference))
            .map(|p| (p.mime, p.bytes.clone()))
    }

    /// Number of previews currently held.
    pub fn live_count(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl PreviewStore for MemoryPreviewStore {
    fn acquire(&self, source_path: &str, bytes: Vec<u8>) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        let key = n.to_string();
        let reference = format!("{PREVIEW_ORIGIN}{key}");
        let mime = mime_for(source_path);

        debug!("Acquired preview {} ({} bytes, {})", reference, bytes.len(), mime);
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, StoredPreview { mime, bytes });
        reference
    }

    fn release(&self, reference: &str) {
        let removed = self
            .entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(preview_key(reference));

        match removed {
            Some(_) => debug!("Released preview {}", reference),
            None => warn!("Preview {} released twice or never acquired", reference),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_releases_on_drop() {
        let store = Arc::new(MemoryPreviewStore::new());
        let handle = PreviewHandle::acquire(store.clone(), "/a.png", vec![1, 2, 3]);

        let (mime, bytes) = store.resolve(handle.reference()).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, vec![1, 2, 3]);
        assert_eq!(store.live_count(), 1);

        let reference = handle.reference().to_string();
        drop(handle);
        assert_eq!(store.live_count(), 0);
        assert!(store.resolve(&reference).is_none());
    }

    #[test]
    fn references_resolve_from_scheme_request_paths() {
        let store = Arc::new(MemoryPreviewStore::new());
        let _first = PreviewHandle::acquire(store.clone(), "/a.png", vec![1]);
        let second = PreviewHandle::acquire(store.clone(), "/b.jpg", vec![2]);

        assert_eq!(second.reference(), "preview://localhost/1");
        assert_eq!(preview_key(second.reference()), "1");
        assert_eq!(preview_key("/1"), "1");
        assert_eq!(store.resolve("/1"), Some(("image/jpeg", vec![2])));
        assert!(store.resolve("/").is_none());
    }

    #[test]
    fn references_are_unique() {
        let store = Arc::new(MemoryPreviewStore::new());
        let a = PreviewHandle::acquire(store.clone(), "/a.png", vec![]);
        let b = PreviewHandle::acquire(store.clone(), "/a.png", vec![]);
        assert_ne!(a.reference(), b.reference());
    }
}
