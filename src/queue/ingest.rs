//! Turning submitted paths into queued records.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::bridge::FilePicker;
use crate::core::{ImageId, ImageRecord, QueueEvent};
use crate::queue::{ConversionQueue, PreviewHandle};
use crate::utils::{ConverterResult, extract_filename, read_file};

impl ConversionQueue {
    /// Adds new images to the queue and returns the ids of the created records.
    ///
    /// Paths already queued (or repeated within `paths`) are dropped silently.
    /// A path that cannot be read is logged and skipped without affecting the
    /// rest of the batch. All created records become visible at once.
    pub async fn submit<I, S>(&self, paths: I) -> Vec<ImageId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique = {
            let state = self.state();
            let mut seen: HashSet<String> = state
                .store
                .source_paths()
                .into_iter()
                .map(str::to_owned)
                .collect();
            paths
                .into_iter()
                .map(Into::into)
                .filter(|p| seen.insert(p.clone()))
                .collect::<Vec<String>>()
        };

        if unique.is_empty() {
            debug!("All files already added, skipping duplicates");
            return Vec::new();
        }

        let mut batch = Vec::with_capacity(unique.len());
        for path in unique {
            match read_file(&path).await {
                Ok(bytes) => batch.push(self.materialize(path, bytes)),
                Err(e) => warn!("Skipping {}: {}", path, e),
            }
        }

        if batch.is_empty() {
            return Vec::new();
        }

        let ids = {
            let mut state = self.state();
            // A concurrent submission may have queued the same path while we were reading
            batch.retain(|record| {
                let taken = state.store.contains_source(&record.source_path);
                if taken {
                    debug!("{} was queued concurrently, dropping", record.source_path);
                }
                !taken
            });
            let ids: Vec<ImageId> = batch.iter().map(|r| r.id).collect();
            if let Err(e) = state.store.insert_batch(batch) {
                warn!("Rejected batch: {}", e);
                return Vec::new();
            }
            ids
        };

        if !ids.is_empty() {
            info!("Added {} new image(s)", ids.len());
            self.emit(QueueEvent::ImagesAdded { ids: ids.clone() });
        }
        ids
    }

    /// Asks `picker` for images and submits whatever was chosen.
    pub async fn submit_from_picker(&self, picker: &dyn FilePicker) -> ConverterResult<Vec<ImageId>> {
        let selection = picker.pick_images().await?;
        let paths = selection.into_paths();
        if paths.is_empty() {
            debug!("File picker closed without a selection");
            return Ok(Vec::new());
        }
        Ok(self.submit(paths).await)
    }

    fn materialize(&self, path: String, bytes: Vec<u8>) -> ImageRecord {
        let original_size = bytes.len() as u64;
        let display_name = extract_filename(&path).to_string();
        let preview = PreviewHandle::acquire(Arc::clone(&self.previews), &path, bytes);
        ImageRecord::new(self.next_image_id(), path, display_name, preview, original_size)
    }
}
