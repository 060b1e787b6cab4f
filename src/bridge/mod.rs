//! Adapters for the external path sources: drag-and-drop and the file picker.

mod file_drop;
mod picker;

pub use file_drop::{DropBridge, DropEvent, DropHandler, DropPayload, DropSource, ListenerId, PathsCallback};
pub use picker::{FilePicker, PickerSelection};
