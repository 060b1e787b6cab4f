//! Sequential conversion of queued images.
//!
//! Images are converted one at a time in insertion order. The conversion
//! service is assumed to serialise its disk writes, and progress is only
//! defined for a single ordered pass, so runs never overlap.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use futures::FutureExt;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::core::{
    ConversionSettings, ImageId, ImageStatus, ImageView, NamingOptions, Progress, ProgressType,
    QueueEvent, RecordPatch, RunId, RunOutcome, RunSummary,
};
use crate::processing::{ConversionRequest, ConversionResult, ConversionService};
use crate::queue::{ImageStore, PreviewStore};
use crate::utils::{ConverterError, ConverterResult, validate_naming, validate_quality};

const EVENT_CAPACITY: usize = 256;

pub(crate) struct QueueState {
    pub(crate) store: ImageStore,
    converting: bool,
    runs_started: u64,
}

/// Read-only view of the whole queue for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSnapshot {
    pub images: Vec<ImageView>,
    pub is_converting: bool,
    pub progress: usize,
    pub total_progress: usize,
    pub quality: u8,
    pub naming_options: NamingOptions,
}

/// Owner of the image store and driver of conversion runs.
pub struct ConversionQueue {
    state: Mutex<QueueState>,
    settings: RwLock<ConversionSettings>,
    service: Arc<dyn ConversionService>,
    pub(crate) previews: Arc<dyn PreviewStore>,
    events: broadcast::Sender<QueueEvent>,
    next_id: AtomicU64,
}

impl ConversionQueue {
    pub fn new(service: Arc<dyn ConversionService>, previews: Arc<dyn PreviewStore>) -> Self {
        Self::with_settings(service, previews, ConversionSettings::default())
    }

    pub fn with_settings(
        service: Arc<dyn ConversionService>,
        previews: Arc<dyn PreviewStore>,
        settings: ConversionSettings,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Mutex::new(QueueState {
                store: ImageStore::new(),
                converting: false,
                runs_started: 0,
            }),
            settings: RwLock::new(settings),
            service,
            previews,
            events,
            next_id: AtomicU64::new(1),
        }
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn next_image_id(&self) -> ImageId {
        ImageId::from_raw(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn emit(&self, event: QueueEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Subscribes to queue change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.events.subscribe()
    }

    pub fn get(&self, id: ImageId) -> Option<ImageView> {
        self.state().store.get(id).map(|r| r.view())
    }

    pub fn image_count(&self) -> usize {
        self.state().store.len()
    }

    pub fn is_converting(&self) -> bool {
        self.state().converting
    }

    /// `(progress, total_progress)` of the current or last run.
    pub fn progress(&self) -> (usize, usize) {
        self.state().store.run_progress()
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        let settings = self.settings();
        let state = self.state();
        let (progress, total_progress) = state.store.run_progress();
        QueueSnapshot {
            images: state.store.iter().map(|r| r.view()).collect(),
            is_converting: state.converting,
            progress,
            total_progress,
            quality: settings.quality,
            naming_options: settings.naming,
        }
    }

    pub fn settings(&self) -> ConversionSettings {
        self.settings.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn set_quality(&self, quality: u8) -> ConverterResult<()> {
        validate_quality(quality)?;
        self.settings.write().unwrap_or_else(|e| e.into_inner()).quality = quality;
        debug!("Quality set to {}", quality);
        Ok(())
    }

    pub fn set_naming_options(&self, naming: NamingOptions) -> ConverterResult<()> {
        validate_naming(&naming)?;
        debug!("Naming scheme set to {:?}", naming.scheme);
        self.settings.write().unwrap_or_else(|e| e.into_inner()).naming = naming;
        Ok(())
    }

    /// Removes one image and releases its preview.
    ///
    /// Allowed during a run: a record removed before its turn is skipped, and
    /// the result of a record removed mid-conversion is discarded.
    pub fn remove(&self, id: ImageId) -> ConverterResult<()> {
        self.state().store.remove(id)?;
        self.emit(QueueEvent::ImageRemoved { id });
        Ok(())
    }

    /// Removes every image and releases all previews.
    pub fn clear(&self) -> usize {
        let removed = self.state().store.clear();
        debug!("Cleared {} image(s)", removed);
        self.emit(QueueEvent::QueueCleared);
        removed
    }

    /// Converts every image that is pending at call time.
    ///
    /// Returns `AlreadyRunning` without touching the store if a run is in
    /// progress, and `NothingPending` if there is nothing to do. Individual
    /// failures never end the run early.
    pub async fn run_conversion(&self) -> RunOutcome {
        let (snapshot, settings) = {
            let mut state = self.state();
            if state.converting {
                debug!("Conversion already running, ignoring request");
                return RunOutcome::AlreadyRunning;
            }
            if state.store.pending_records().next().is_none() {
                debug!("No pending images to convert");
                return RunOutcome::NothingPending;
            }

            state.converting = true;
            state.runs_started += 1;
            let run = RunId(state.runs_started);
            (state.store.begin_run(run), self.settings())
        };

        let mut guard = RunGuard { queue: self, in_flight: None };
        let quality = settings.normalized_quality();
        info!("Converting {} image(s) at quality {}", snapshot.len(), settings.quality);
        self.emit_progress(ProgressType::Start, "starting", None, None);

        let mut summary = RunSummary::default();

        for (index, (id, source_path)) in snapshot.into_iter().enumerate() {
            let Some(original_size) = self.begin_item(id) else {
                debug!("{} was removed before its turn, skipping", id);
                summary.abandoned += 1;
                continue;
            };
            guard.in_flight = Some(id);

            let request = ConversionRequest {
                source_path,
                quality,
                naming_options: settings.naming.clone(),
                sequence: index + 1,
            };
            let patch = outcome_patch(self.invoke(request).await);
            let error = match &patch {
                RecordPatch::Failed { error } => Some(error.clone()),
                _ => None,
            };

            guard.in_flight = None;
            match self.finish_item(id, patch) {
                Some(view) if view.status == ImageStatus::Completed => {
                    summary.processed += 1;
                    summary.succeeded += 1;
                    summary.original_bytes += original_size;
                    summary.compressed_bytes += view.compressed_size.unwrap_or(0);
                }
                Some(view) => {
                    warn!("Conversion failed for {}: {}", view.display_name, error.as_deref().unwrap_or(""));
                    summary.processed += 1;
                    summary.failed += 1;
                }
                None => {
                    debug!("{} was removed while converting, result discarded", id);
                    summary.abandoned += 1;
                }
            }

            let progress_type = if error.is_some() { ProgressType::Error } else { ProgressType::Progress };
            self.emit_progress(progress_type, "processing", Some(id), error);
        }

        drop(guard);

        self.emit_progress(ProgressType::Complete, "complete", None, None);
        info!(
            "Run finished: {} succeeded, {} failed, {} abandoned",
            summary.succeeded, summary.failed, summary.abandoned
        );
        RunOutcome::Finished(summary)
    }

    /// Emits a progress event with both counters taken from the store.
    fn emit_progress(&self, progress_type: ProgressType, status: &str, id: Option<ImageId>, error: Option<String>) {
        let (done, total) = self.progress();
        let mut progress = Progress::new(progress_type, done, total, status);
        if let Some(id) = id {
            progress = progress.for_image(id);
        }
        if let Some(error) = error {
            progress = progress.with_error(error);
        }
        self.emit(QueueEvent::Progress(progress));
    }

    /// Moves a record to `Converting`; `None` if it no longer exists.
    fn begin_item(&self, id: ImageId) -> Option<u64> {
        let view = {
            let mut state = self.state();
            state.store.get(id)?;
            match state.store.mutate(id, RecordPatch::Converting) {
                Ok(record) => record.view(),
                Err(e) => {
                    warn!("Cannot start conversion of {}: {}", id, e);
                    return None;
                }
            }
        };
        let original_size = view.original_size;
        self.emit(QueueEvent::ImageUpdated(view));
        Some(original_size)
    }

    /// Records the outcome of a conversion; `None` if the record is gone.
    fn finish_item(&self, id: ImageId, patch: RecordPatch) -> Option<ImageView> {
        let view = {
            let mut state = self.state();
            state.store.get(id)?;
            match state.store.mutate(id, patch) {
                Ok(record) => record.view(),
                Err(e) => {
                    warn!("Cannot record result for {}: {}", id, e);
                    return None;
                }
            }
        };
        self.emit(QueueEvent::ImageUpdated(view.clone()));
        Some(view)
    }

    /// Calls the service inline, so dropping the run also drops the call.
    /// A panic in the service surfaces as an error.
    async fn invoke(&self, request: ConversionRequest) -> ConverterResult<ConversionResult> {
        AssertUnwindSafe(self.service.convert(request))
            .catch_unwind()
            .await
            .map_err(|payload| {
                ConverterError::processing(format!("Conversion panicked: {}", panic_message(payload.as_ref())))
            })?
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Maps a service outcome to the terminal patch for the record.
fn outcome_patch(outcome: ConverterResult<ConversionResult>) -> RecordPatch {
    match outcome {
        Ok(result) if result.success => RecordPatch::Completed {
            output_path: result.output_path,
            compressed_size: result.new_size,
            result_payload: result.base64_data,
        },
        Ok(result) => RecordPatch::Failed {
            error: result.error.unwrap_or_else(|| "Conversion failed".to_string()),
        },
        Err(e) => RecordPatch::Failed { error: e.to_string() },
    }
}

/// Clears the converting flag when a run ends, including when its future is
/// dropped part-way. An interrupted in-flight record is marked failed so it
/// never stays `Converting`.
struct RunGuard<'a> {
    queue: &'a ConversionQueue,
    in_flight: Option<ImageId>,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let interrupted = {
            let mut state = self.queue.state();
            state.converting = false;
            self.in_flight.and_then(|id| {
                let still_converting = state
                    .store
                    .get(id)
                    .is_some_and(|r| r.status == ImageStatus::Converting);
                if !still_converting {
                    return None;
                }
                let patch = RecordPatch::Failed { error: "Conversion interrupted".to_string() };
                state.store.mutate(id, patch).ok().map(|r| r.view())
            })
        };
        if let Some(view) = interrupted {
            warn!("Run interrupted while converting {}", view.display_name);
            self.queue.emit(QueueEvent::ImageUpdated(view));
        }
    }
}
