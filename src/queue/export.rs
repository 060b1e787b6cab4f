//! Saving finished conversions somewhere the user chose.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::core::{ImageId, ImageStatus};
use crate::processing::save_payload;
use crate::queue::ConversionQueue;
use crate::utils::extract_filename;

const FALLBACK_NAME: &str = "image.webp";

impl ConversionQueue {
    /// Completed images that still carry a result payload.
    pub fn completed_count(&self) -> usize {
        self.state()
            .store
            .iter()
            .filter(|r| r.status == ImageStatus::Completed && r.result_payload.is_some())
            .count()
    }

    /// Writes every completed payload into `dir`, named after its output file.
    ///
    /// A file that cannot be written is logged and skipped. Returns the paths
    /// that were written, in queue order.
    pub async fn save_completed(&self, dir: impl AsRef<Path>) -> Vec<PathBuf> {
        let dir = dir.as_ref();
        let jobs: Vec<(ImageId, String, String)> = {
            let state = self.state();
            state
                .store
                .iter()
                .filter(|r| r.status == ImageStatus::Completed)
                .filter_map(|r| {
                    let payload = r.result_payload.clone()?;
                    let name = r
                        .output_path
                        .as_deref()
                        .map(extract_filename)
                        .filter(|name| !name.is_empty())
                        .unwrap_or(FALLBACK_NAME)
                        .to_string();
                    Some((r.id, name, payload))
                })
                .collect()
        };

        let mut saved = Vec::with_capacity(jobs.len());
        for (id, name, payload) in jobs {
            let target = dir.join(&name);
            match save_payload(&payload, &target).await {
                Ok(()) => saved.push(target),
                Err(e) => warn!("Could not save {} as {}: {}", id, target.display(), e),
            }
        }
        info!("Saved {} converted image(s) to {}", saved.len(), dir.display());
        saved
    }
}
