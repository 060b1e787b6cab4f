//! Tauri command handlers for the image queue.

use std::path::PathBuf;

use tauri::{AppHandle, Runtime, State};
use tracing::debug;

use crate::core::{AppState, ImageId, NamingOptions, RunOutcome};
use crate::processing::save_payload;
use crate::queue::QueueSnapshot;
use crate::utils::ConverterResult;

use super::picker::DialogPicker;

/// Queues the given paths, skipping duplicates and unreadable files.
///
/// # Returns
/// Ids of the newly created records, in input order.
#[tauri::command]
pub async fn add_image_paths(
    state: State<'_, AppState>,
    paths: Vec<String>,
) -> ConverterResult<Vec<ImageId>> {
    debug!("Received add_image_paths command for {} path(s)", paths.len());
    Ok(state.queue().submit(paths).await)
}

/// Opens the multi-select image dialog and queues the selection.
#[tauri::command]
pub async fn pick_images<R: Runtime>(
    app: AppHandle<R>,
    state: State<'_, AppState>,
) -> ConverterResult<Vec<ImageId>> {
    let picker = DialogPicker::new(app);
    state.queue().submit_from_picker(&picker).await
}

#[tauri::command]
pub fn remove_image(state: State<'_, AppState>, id: ImageId) -> ConverterResult<()> {
    state.queue().remove(id)
}

#[tauri::command]
pub fn clear_images(state: State<'_, AppState>) -> usize {
    state.queue().clear()
}

#[tauri::command]
pub fn set_quality(state: State<'_, AppState>, quality: u8) -> ConverterResult<()> {
    state.queue().set_quality(quality)
}

#[tauri::command]
pub fn set_naming_options(state: State<'_, AppState>, options: NamingOptions) -> ConverterResult<()> {
    state.queue().set_naming_options(options)
}

#[tauri::command]
pub fn get_queue(state: State<'_, AppState>) -> QueueSnapshot {
    state.queue().snapshot()
}

/// Converts every pending image.
///
/// # Events Emitted
/// * `queue-event` - record updates and run progress, see [`QueueEvent`](crate::core::QueueEvent)
#[tauri::command]
pub async fn convert_images(state: State<'_, AppState>) -> ConverterResult<RunOutcome> {
    Ok(state.queue().run_conversion().await)
}

/// Writes a converted image's base64 payload to a user-chosen path.
#[tauri::command]
pub async fn save_converted_image(base64_data: String, file_path: String) -> ConverterResult<bool> {
    save_payload(&base64_data, &file_path).await?;
    Ok(true)
}

/// Saves every completed image into `dir`.
///
/// # Returns
/// Paths that were written; failures are logged and skipped.
#[tauri::command]
pub async fn save_completed_images(state: State<'_, AppState>, dir: String) -> ConverterResult<Vec<PathBuf>> {
    debug!("Received save_completed_images command for {}", dir);
    Ok(state.queue().save_completed(dir).await)
}
