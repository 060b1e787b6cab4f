//! In-memory table of queued images.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::core::{ImageId, ImageRecord, ImageStatus, RecordPatch, RunId};
use crate::utils::{ConverterError, ConverterResult};

/// Insertion-ordered record table.
///
/// Every mutation of a record goes through this type. Run progress is not
/// stored anywhere; it is counted from the records tagged with the active run.
#[derive(Debug, Default)]
pub struct ImageStore {
    records: Vec<ImageRecord>,
    active_run: Option<RunId>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ImageRecord> + Clone {
        self.records.iter()
    }

    pub fn contains_source(&self, source_path: &str) -> bool {
        self.records.iter().any(|r| r.source_path == source_path)
    }

    pub fn source_paths(&self) -> HashSet<&str> {
        self.records.iter().map(|r| r.source_path.as_str()).collect()
    }

    pub fn get(&self, id: ImageId) -> Option<&ImageRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    fn position(&self, id: ImageId) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    /// Appends one record.
    pub fn insert(&mut self, record: ImageRecord) -> ConverterResult<()> {
        if self.contains_source(&record.source_path) {
            return Err(ConverterError::DuplicateSource(record.source_path.clone()));
        }
        self.records.push(record);
        Ok(())
    }

    /// Appends all records or none of them.
    ///
    /// Fails with `DuplicateSource` if any record collides with the store or
    /// with an earlier record of the same batch.
    pub fn insert_batch(&mut self, batch: Vec<ImageRecord>) -> ConverterResult<()> {
        {
            let mut seen = self.source_paths();
            for record in &batch {
                if !seen.insert(record.source_path.as_str()) {
                    return Err(ConverterError::DuplicateSource(record.source_path.clone()));
                }
            }
        }
        self.records.extend(batch);
        Ok(())
    }

    /// Removes a record, releasing its preview.
    pub fn remove(&mut self, id: ImageId) -> ConverterResult<()> {
        let index = self.position(id).ok_or(ConverterError::UnknownImage(id))?;
        let record = self.records.remove(index);
        debug!("Removed {} ({})", record.id, record.display_name);
        drop(record);
        Ok(())
    }

    /// Removes every record, releasing all previews. Returns how many were removed.
    ///
    /// The active run tag is kept, so a run in progress keeps counting the
    /// records it still finds.
    pub fn clear(&mut self) -> usize {
        let count = self.records.len();
        self.records.clear();
        count
    }

    /// Applies a lifecycle patch to one record.
    pub fn mutate(&mut self, id: ImageId, patch: RecordPatch) -> ConverterResult<&ImageRecord> {
        let Some(index) = self.position(id) else {
            warn!("Patch {:?} targets missing record {}", patch.status(), id);
            return Err(ConverterError::UnknownImage(id));
        };

        let record = &mut self.records[index];
        record
            .apply(patch)
            .map_err(|(from, to)| ConverterError::InvalidTransition { id, from, to })?;
        Ok(&self.records[index])
    }

    /// Pending records in insertion order.
    ///
    /// The iterator is `Clone`, so it can be restarted without rescanning
    /// from the caller's side.
    pub fn pending_records(&self) -> impl Iterator<Item = &ImageRecord> + Clone {
        self.records
            .iter()
            .filter(|r| r.status == ImageStatus::Pending)
    }

    /// Tags every pending record with `run` and returns the snapshot as
    /// `(id, source_path)` pairs in processing order.
    pub(crate) fn begin_run(&mut self, run: RunId) -> Vec<(ImageId, String)> {
        self.active_run = Some(run);
        self.records
            .iter_mut()
            .filter(|r| r.status == ImageStatus::Pending)
            .map(|r| {
                r.run = Some(run);
                (r.id, r.source_path.clone())
            })
            .collect()
    }

    /// `(processed, total)` for the active run, counted from the records.
    pub fn run_progress(&self) -> (usize, usize) {
        let Some(run) = self.active_run else {
            return (0, 0);
        };
        self.records
            .iter()
            .filter(|r| r.run == Some(run))
            .fold((0, 0), |(done, total), r| {
                (done + usize::from(r.status.is_terminal()), total + 1)
            })
    }
}
