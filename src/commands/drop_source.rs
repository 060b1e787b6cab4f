use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tauri::{AppHandle, EventId, Listener, Runtime};
use tracing::warn;

use crate::bridge::{DropEvent, DropHandler, DropPayload, DropSource, ListenerId};
use crate::utils::ConverterResult;

const DRAG_DROP_EVENT: &str = "tauri://drag-drop";
const DRAG_OVER_EVENT: &str = "tauri://drag-over";

/// Window drag-and-drop events exposed as a [`DropSource`].
pub struct TauriDropSource<R: Runtime> {
    app: AppHandle<R>,
    next: AtomicU64,
    listeners: Mutex<HashMap<u64, [EventId; 2]>>,
}

impl<R: Runtime> TauriDropSource<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self {
            app,
            next: AtomicU64::new(1),
            listeners: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl<R: Runtime> DropSource for TauriDropSource<R> {
    async fn listen(&self, handler: DropHandler) -> ConverterResult<ListenerId> {
        let on_drop = handler.clone();
        let drop_id = self.app.listen(DRAG_DROP_EVENT, move |event| {
            match serde_json::from_str::<DropPayload>(event.payload()) {
                Ok(payload) => on_drop(DropEvent::Drop(payload)),
                Err(e) => warn!("Unreadable drop payload: {}", e),
            }
        });
        let over_id = self
            .app
            .listen(DRAG_OVER_EVENT, move |_| handler(DropEvent::DragOver));

        let id = self.next.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, [drop_id, over_id]);
        Ok(ListenerId(id))
    }

    fn unlisten(&self, id: ListenerId) {
        let removed = self
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id.0);
        if let Some(events) = removed {
            for event in events {
                self.app.unlisten(event);
            }
        }
    }
}
