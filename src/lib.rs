// Module declarations in dependency order
pub mod utils;
pub mod core;
pub mod processing;
pub mod queue;
pub mod bridge;
#[cfg(feature = "desktop")]
pub mod commands;

// Public exports for external consumers
pub use crate::core::{
    AppState, ConversionSettings, DEFAULT_QUALITY, ImageId, ImageStatus, ImageView, NamingOptions, NamingScheme,
    Progress, ProgressType, QueueEvent, RunOutcome, RunSummary,
};
pub use crate::bridge::{DropBridge, DropEvent, DropPayload, DropSource, FilePicker, PickerSelection};
pub use crate::processing::{ConversionRequest, ConversionResult, ConversionService, WebpConverter, WebpConverterConfig};
pub use crate::queue::{ConversionQueue, MemoryPreviewStore, PreviewHandle, PreviewStore, QueueSnapshot};
pub use crate::utils::{ConverterError, ConverterResult};
