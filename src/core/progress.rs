use serde::{Deserialize, Serialize};

use crate::core::{ImageId, ImageView};

/// Progress message type
#[derive(Debug, Deserialize, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ProgressType {
    Start,
    Progress,
    Complete,
    Error,
}

/// Progress of a conversion run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Progress type (start, progress, complete, error)
    pub progress_type: ProgressType,
    /// Number of processed images, successful or not
    pub completed_tasks: usize,
    /// Number of images in the run snapshot
    pub total_tasks: usize,
    /// Progress percentage (0-100)
    pub progress_percentage: usize,
    /// Current status message
    pub status: String,
    /// Image the update refers to
    #[serde(default)]
    pub image_id: Option<ImageId>,
    /// Error message for failed images
    #[serde(default)]
    pub error: Option<String>,
}

impl Progress {
    /// Create a new Progress instance with basic information
    pub fn new(
        progress_type: ProgressType,
        completed_tasks: usize,
        total_tasks: usize,
        status: &str,
    ) -> Self {
        let progress_percentage = if total_tasks > 0 {
            (completed_tasks * 100) / total_tasks
        } else {
            0
        };

        Self {
            progress_type,
            completed_tasks,
            total_tasks,
            progress_percentage,
            status: status.to_string(),
            image_id: None,
            error: None,
        }
    }

    pub fn for_image(mut self, id: ImageId) -> Self {
        self.image_id = Some(id);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Totals of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// Images the run attempted
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Images removed from the queue before their result was recorded
    pub abandoned: usize,
    pub original_bytes: u64,
    pub compressed_bytes: u64,
}

/// What a `run_conversion` call did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum RunOutcome {
    /// Another run was active; nothing was touched
    AlreadyRunning,
    /// No pending images at call time
    NothingPending,
    Finished(RunSummary),
}

/// Notification emitted whenever queue state changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "payload")]
pub enum QueueEvent {
    ImagesAdded { ids: Vec<ImageId> },
    ImageRemoved { id: ImageId },
    QueueCleared,
    ImageUpdated(ImageView),
    Progress(Progress),
}
