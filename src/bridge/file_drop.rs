//! Drag-and-drop delivery into the queue.
//!
//! [`DropBridge`] keeps exactly one live subscription to a [`DropSource`] no
//! matter how many times it is armed, and always forwards to the most
//! recently registered callback.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, trace, warn};

use crate::utils::{ConverterResult, filter_supported};

/// Payload of a completed drop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropPayload {
    #[serde(default)]
    pub paths: Vec<String>,
}

/// Events delivered by a drop source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropEvent {
    /// Files are hovering over the window; visual feedback only
    DragOver,
    Drop(DropPayload),
}

/// Handle identifying one subscription on a [`DropSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

pub type DropHandler = Arc<dyn Fn(DropEvent) + Send + Sync>;
pub type PathsCallback = Arc<dyn Fn(Vec<String>) + Send + Sync>;

/// External drag-and-drop event source.
#[async_trait]
pub trait DropSource: Send + Sync {
    async fn listen(&self, handler: DropHandler) -> ConverterResult<ListenerId>;

    fn unlisten(&self, id: ListenerId);
}

/// Single subscription to a drop source, shared by everything that wants drops.
pub struct DropBridge {
    source: Arc<dyn DropSource>,
    armed: AtomicBool,
    // Held across `listen`, so concurrent `arm` calls wait for the outcome
    listener: Mutex<Option<ListenerId>>,
    callback: Arc<RwLock<Option<PathsCallback>>>,
}

impl DropBridge {
    pub fn new(source: Arc<dyn DropSource>) -> Self {
        Self {
            source,
            armed: AtomicBool::new(false),
            listener: Mutex::new(None),
            callback: Arc::new(RwLock::new(None)),
        }
    }

    /// Replaces the callback that receives accepted paths.
    ///
    /// Takes effect for the next drop without touching the subscription.
    pub fn register_callback<F>(&self, callback: F)
    where
        F: Fn(Vec<String>) + Send + Sync + 'static,
    {
        *self.callback.write().unwrap_or_else(|e| e.into_inner()) = Some(Arc::new(callback));
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Subscribes to the drop source unless a subscription already exists.
    ///
    /// Returns `Ok(true)` when this call created the subscription and
    /// `Ok(false)` when one is live. A call that arrives while another is
    /// setting up waits for it; if that setup failed, the waiting call tries
    /// again itself. Failures leave the bridge unarmed.
    pub async fn arm(&self) -> ConverterResult<bool> {
        let mut listener = self.listener.lock().await;
        if listener.is_some() {
            debug!("File drop listener already set up, skipping");
            return Ok(false);
        }

        let slot = Arc::clone(&self.callback);
        let handler: DropHandler = Arc::new(move |event| dispatch(&slot, event));

        match self.source.listen(handler).await {
            Ok(id) => {
                *listener = Some(id);
                self.armed.store(true, Ordering::Release);
                debug!("File drop listener armed ({:?})", id);
                Ok(true)
            }
            Err(e) => {
                error!("Error setting up file drop listener: {}", e);
                Err(e)
            }
        }
    }

    /// Drops the subscription, if any. A later [`arm`](Self::arm) subscribes again.
    pub async fn disarm(&self) {
        let id = self.listener.lock().await.take();
        if let Some(id) = id {
            self.source.unlisten(id);
            self.armed.store(false, Ordering::Release);
            debug!("File drop listener disarmed ({:?})", id);
        }
    }
}

fn dispatch(slot: &RwLock<Option<PathsCallback>>, event: DropEvent) {
    let payload = match event {
        DropEvent::DragOver => {
            trace!("Drag over");
            return;
        }
        DropEvent::Drop(payload) => payload,
    };

    let total = payload.paths.len();
    let accepted = filter_supported(payload.paths);
    if accepted.is_empty() {
        debug!("Drop of {} path(s) contained no supported images", total);
        return;
    }

    // Clone out of the lock so a callback may re-register itself
    let callback = slot.read().unwrap_or_else(|e| e.into_inner()).clone();
    match callback {
        Some(callback) => {
            debug!("Forwarding {} of {} dropped path(s)", accepted.len(), total);
            callback(accepted);
        }
        None => warn!("Dropped {} image(s) but no callback is registered", accepted.len()),
    }
}
