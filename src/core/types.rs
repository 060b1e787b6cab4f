//! Image records and their lifecycle.

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::queue::PreviewHandle;

/// Opaque identifier of a queued image, stable for the record's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(u64);

impl ImageId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "img-{}", self.0)
    }
}

/// Identifier of one conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub(crate) u64);

/// Lifecycle state of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStatus {
    Pending,
    Converting,
    Completed,
    Failed,
}

impl ImageStatus {
    /// `Pending -> Converting -> {Completed, Failed}` and nothing else.
    pub fn can_transition_to(self, next: ImageStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Converting)
                | (Self::Converting, Self::Completed)
                | (Self::Converting, Self::Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// One tracked image.
///
/// The record owns its preview handle exclusively; dropping the record
/// releases the preview.
#[derive(Debug)]
pub struct ImageRecord {
    pub id: ImageId,
    /// Absolute source path, the deduplication key
    pub source_path: String,
    pub display_name: String,
    pub preview: PreviewHandle,
    pub status: ImageStatus,
    /// Source size in bytes, captured at ingestion
    pub original_size: u64,
    pub output_path: Option<String>,
    pub compressed_size: Option<u64>,
    /// Base64 encoded output for client-side saving
    pub result_payload: Option<String>,
    pub error_message: Option<String>,
    /// Run that picked this record up, if any
    pub run: Option<RunId>,
}

impl ImageRecord {
    pub fn new(
        id: ImageId,
        source_path: String,
        display_name: String,
        preview: PreviewHandle,
        original_size: u64,
    ) -> Self {
        Self {
            id,
            source_path,
            display_name,
            preview,
            status: ImageStatus::Pending,
            original_size,
            output_path: None,
            compressed_size: None,
            result_payload: None,
            error_message: None,
            run: None,
        }
    }

    pub fn view(&self) -> ImageView {
        ImageView {
            id: self.id,
            source_path: self.source_path.clone(),
            display_name: self.display_name.clone(),
            preview: self.preview.reference().to_string(),
            status: self.status,
            original_size: self.original_size,
            output_path: self.output_path.clone(),
            compressed_size: self.compressed_size,
            result_payload: self.result_payload.clone(),
            error_message: self.error_message.clone(),
        }
    }

    /// Applies a lifecycle patch, rejecting transitions outside the lifecycle.
    pub(crate) fn apply(&mut self, patch: RecordPatch) -> Result<(), (ImageStatus, ImageStatus)> {
        let next = patch.status();
        if !self.status.can_transition_to(next) {
            return Err((self.status, next));
        }
        self.status = next;

        match patch {
            RecordPatch::Converting => {}
            RecordPatch::Completed { output_path, compressed_size, result_payload } => {
                self.output_path = Some(output_path);
                self.compressed_size = Some(compressed_size);
                self.result_payload = result_payload;
                self.error_message = None;
            }
            RecordPatch::Failed { error } => {
                self.error_message = Some(error);
            }
        }
        Ok(())
    }
}

/// Status/result change applied by the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordPatch {
    Converting,
    Completed {
        output_path: String,
        compressed_size: u64,
        result_payload: Option<String>,
    },
    Failed {
        error: String,
    },
}

impl RecordPatch {
    pub fn status(&self) -> ImageStatus {
        match self {
            Self::Converting => ImageStatus::Converting,
            Self::Completed { .. } => ImageStatus::Completed,
            Self::Failed { .. } => ImageStatus::Failed,
        }
    }
}

/// Read-only rendering of a record for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageView {
    pub id: ImageId,
    pub source_path: String,
    pub display_name: String,
    /// Preview reference, resolvable through the preview store
    pub preview: String,
    pub status: ImageStatus,
    pub original_size: u64,
    pub output_path: Option<String>,
    pub compressed_size: Option<u64>,
    pub result_payload: Option<String>,
    pub error_message: Option<String>,
}
