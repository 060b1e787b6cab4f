//! The conversion queue: record store, previews, ingestion, the run driver
//! and export of finished results.

mod export;
mod ingest;
mod orchestrator;
mod preview;
mod store;

pub use orchestrator::{ConversionQueue, QueueSnapshot};
pub use preview::{MemoryPreviewStore, PREVIEW_ORIGIN, PreviewHandle, PreviewStore, preview_key};
pub use store::ImageStore;
