//! Application-lifetime wiring.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::bridge::{DropBridge, DropSource};
use crate::core::ConversionSettings;
use crate::processing::ConversionService;
use crate::queue::{ConversionQueue, MemoryPreviewStore};
use crate::utils::ConverterResult;

/// Application state shared by every UI surface.
///
/// Owns the queue, the preview registry and the single drop bridge, so
/// components receive them by injection instead of reaching for globals.
#[derive(Clone)]
pub struct AppState {
    queue: Arc<ConversionQueue>,
    previews: Arc<MemoryPreviewStore>,
    drop_bridge: Arc<DropBridge>,
}

impl AppState {
    pub fn new(
        service: Arc<dyn ConversionService>,
        drop_source: Arc<dyn DropSource>,
        settings: ConversionSettings,
    ) -> Self {
        let previews = Arc::new(MemoryPreviewStore::new());
        let queue = ConversionQueue::with_settings(service, previews.clone(), settings);

        Self {
            queue: Arc::new(queue),
            previews,
            drop_bridge: Arc::new(DropBridge::new(drop_source)),
        }
    }

    pub fn queue(&self) -> &Arc<ConversionQueue> {
        &self.queue
    }

    pub fn previews(&self) -> &Arc<MemoryPreviewStore> {
        &self.previews
    }

    pub fn drop_bridge(&self) -> &Arc<DropBridge> {
        &self.drop_bridge
    }

    /// Routes accepted drops into ingestion and arms the bridge.
    ///
    /// Safe to call from every component that wants drops; only the first
    /// successful call subscribes. Must be called from within a Tokio runtime.
    pub async fn connect_drops(&self) -> ConverterResult<bool> {
        let queue = Arc::clone(&self.queue);
        let runtime = tokio::runtime::Handle::current();

        self.drop_bridge.register_callback(move |paths| {
            let queue = Arc::clone(&queue);
            runtime.spawn(async move {
                let added = queue.submit(paths).await;
                if added.is_empty() {
                    debug!("Drop added no new images");
                }
            });
        });

        self.drop_bridge.arm().await.inspect_err(|e| {
            warn!("Drag and drop unavailable, file picker still works: {}", e);
        })
    }
}
